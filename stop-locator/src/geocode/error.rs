//! Reverse-geocoding error types.

/// Errors from the reverse-geocoding service.
///
/// [`ReverseGeocodeCache`](super::ReverseGeocodeCache) absorbs all of these
/// and reports "no place name" instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeocodeError {
    /// Request exceeded its deadline
    #[error("reverse geocoding timed out")]
    Timeout,

    /// Connection failed or the body could not be read
    #[error("reverse geocoding connection failed: {0}")]
    NetworkFailure(String),

    /// Non-2xx status
    #[error("reverse geocoding returned status {status}")]
    Status { status: u16 },

    /// Body was not the expected JSON, or held no usable label
    #[error("reverse geocoding parse error: {0}")]
    MalformedResponse(String),
}
