//! Error codes and the context's latched error slot.

/// Errors raised by API entry points.
///
/// These are never returned to the caller directly; they are latched in the
/// context and read back with [`crate::Context::get_error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GlError {
    /// An enumerated argument (mode, element type, texture unit) is not accepted.
    #[error("invalid enum")]
    InvalidEnum,
    /// A numeric argument (size, stride, count, range) is out of range.
    #[error("invalid value")]
    InvalidValue,
    /// The call is not allowed in the current state.
    #[error("invalid operation")]
    InvalidOperation,
    /// The request does not fit the fixed vertex capacity.
    #[error("out of memory")]
    OutOfMemory,
}

impl GlError {
    /// Numeric error code as reported by the classic API.
    pub const fn code(self) -> u32 {
        match self {
            GlError::InvalidEnum => 0x0500,
            GlError::InvalidValue => 0x0501,
            GlError::InvalidOperation => 0x0502,
            GlError::OutOfMemory => 0x0505,
        }
    }
}

/// Holds the first error raised since the last read.
#[derive(Debug, Default)]
pub struct ErrorSlot {
    latched: Option<GlError>,
}

impl ErrorSlot {
    /// Record `error` raised by `operation`. Later errors do not replace an
    /// unread one.
    pub fn raise(&mut self, error: GlError, operation: &'static str) {
        log::warn!("{operation}: {error}");
        if self.latched.is_none() {
            self.latched = Some(error);
        }
    }

    /// Latch the error of a failed `result`, passing the value through otherwise.
    pub fn record<T>(&mut self, result: Result<T, GlError>, operation: &'static str) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.raise(error, operation);
                None
            }
        }
    }

    /// Read and clear the latched error.
    pub fn take(&mut self) -> Option<GlError> {
        self.latched.take()
    }

    /// Read the latched error without clearing it.
    pub fn peek(&self) -> Option<GlError> {
        self.latched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_error_wins() {
        let mut slot = ErrorSlot::default();
        slot.raise(GlError::InvalidValue, "a");
        slot.raise(GlError::InvalidEnum, "b");
        assert_eq!(slot.take(), Some(GlError::InvalidValue));
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn record_passes_values_through() {
        let mut slot = ErrorSlot::default();
        assert_eq!(slot.record(Ok::<u8, GlError>(7), "op"), Some(7));
        assert_eq!(slot.peek(), None);
        assert_eq!(slot.record::<u8>(Err(GlError::OutOfMemory), "op"), None);
        assert_eq!(slot.peek(), Some(GlError::OutOfMemory));
    }
}
