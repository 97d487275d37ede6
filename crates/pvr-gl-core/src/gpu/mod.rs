pub mod driver;
pub mod header;
pub mod registers;
pub mod vertex;

pub use driver::{SubmitError, TaDriver};
pub use header::{PolyHeader, TextureHeader};
pub use vertex::{TexCoord, Vertex, VertexFlag};
