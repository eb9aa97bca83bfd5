//! Error types for strata.
//!
//! Creation of layers and buffers is the only fallible surface; everything
//! else clamps or no-ops on bad input so that handlers running inside a live
//! event loop never unwind the session. Each error carries a stable numeric
//! code so hosts can pass failures across FFI or log sinks and translate
//! them back to text with [`StrataError::describe`].

use thiserror::Error;

/// Errors returned by layer/buffer creation and initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StrataError {
    /// A layer or framebuffer was requested with a zero width or height.
    #[error("layer dimensions must be non-zero")]
    ZeroDimension,

    /// The pixel buffer allocation failed.
    #[error("cannot allocate pixel buffer")]
    OutOfMemory,

    /// The operation referenced a destroyed or never-created layer handle.
    #[error("unknown or destroyed layer handle")]
    UnknownLayer,
}

impl StrataError {
    /// Stable numeric code for this error. `0` is reserved for "no error".
    pub const fn code(&self) -> u32 {
        match self {
            Self::ZeroDimension => 1,
            Self::OutOfMemory => 2,
            Self::UnknownLayer => 3,
        }
    }

    /// Translate a numeric code back to a human readable description.
    pub const fn describe(code: u32) -> &'static str {
        match code {
            0 => "no error",
            1 => "layer dimensions must be non-zero",
            2 => "cannot allocate pixel buffer",
            3 => "unknown or destroyed layer handle",
            _ => "unknown error code",
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for err in [
            StrataError::ZeroDimension,
            StrataError::OutOfMemory,
            StrataError::UnknownLayer,
        ] {
            assert_eq!(StrataError::describe(err.code()), err.to_string());
        }
    }

    #[test]
    fn test_reserved_and_unknown_codes() {
        assert_eq!(StrataError::describe(0), "no error");
        assert_eq!(StrataError::describe(999), "unknown error code");
    }
}
