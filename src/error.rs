//! Grepable error codes shared by every error type in the crate.

/// Attach a stable, grepable code to an error.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;
}
