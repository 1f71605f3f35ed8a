//! Stable error codes shared by every fallible layer.

/// Machine-readable classification for user-facing errors.
///
/// Nothing in this crate retries automatically, so `retryable` reports
/// whether re-invoking the same operation by hand could plausibly succeed.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}
