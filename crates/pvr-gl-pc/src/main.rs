//! PC debug host for the vertex pipeline.
//!
//! Runs a demo scene for a number of frames, submits each frame through a
//! dump transport and reports the record stream. `RUST_LOG=trace` prints
//! every record.

mod scene;
mod transport;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;

use pvr_gl_core::gpu::TaDriver;
use pvr_gl_core::{Context, ContextConfig};

use scene::Scene;
use transport::DumpTransport;

#[derive(Parser)]
#[command(name = "pvr-gl-pc")]
#[command(about = "Run demo scenes through the TA vertex pipeline", long_about = None)]
#[command(version)]
struct Cli {
    /// Scene to draw
    #[arg(short, long, value_enum, default_value = "all")]
    scene: Scene,

    /// Number of frames to run
    #[arg(short, long, default_value = "1")]
    frames: u64,

    /// Output arena capacity in vertices
    #[arg(long, default_value_t = pvr_gl_core::config::DEFAULT_MAX_VERTICES)]
    max_vertices: usize,

    /// Near-plane W threshold for clipping
    #[arg(long, default_value_t = pvr_gl_core::config::DEFAULT_NEAR_W)]
    near_w: f32,

    /// Half-size of immediate-mode points in clip units
    #[arg(long, default_value_t = pvr_gl_core::config::DEFAULT_POINT_SIZE)]
    point_size: f32,

    /// Draw without near-plane clipping
    #[arg(long)]
    no_clip: bool,

    /// Write every record as a hex line to this file
    #[arg(short, long)]
    dump: Option<PathBuf>,

    /// Suppress progress output (only show errors)
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if !cli.quiet {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Info)
            .parse_default_env()
            .init();
    }

    let config = ContextConfig {
        max_vertices: cli.max_vertices,
        near_w: cli.near_w,
        point_size: cli.point_size,
        ..ContextConfig::default()
    };
    log::info!(
        "pvr-gl-pc: {:?} for {} frame(s), {} vertex arena",
        cli.scene,
        cli.frames,
        config.max_vertices
    );

    let transport = match &cli.dump {
        Some(path) => DumpTransport::to_file(path)
            .with_context(|| format!("creating dump file {}", path.display()))?,
        None => DumpTransport::new(),
    };
    let mut driver = TaDriver::new(transport);
    let mut ctx = Context::new(config);
    scene::register_textures(&mut ctx);
    ctx.clear_color(0.1, 0.1, 0.2, 1.0);

    for frame in 0..cli.frames {
        cli.scene.draw(&mut ctx, frame, !cli.no_clip);
        log::debug!("frame {frame}: {} vertices queued", ctx.output().len());
        ctx.finish_frame(&mut driver)
            .with_context(|| format!("submitting frame {frame}"))?;
    }

    let mut transport = driver.into_inner();
    transport.close().context("flushing dump file")?;
    if !cli.quiet {
        eprintln!(
            "{} frame(s), last frame {} records ({} vertices, {} strips)",
            transport.frames(),
            transport.stats().records(),
            transport.stats().vertices,
            transport.stats().strips
        );
    }
    Ok(())
}
