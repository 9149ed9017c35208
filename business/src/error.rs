use thiserror::Error;

/// Failure surface of a single API call.
///
/// Every variant degrades to a banner message upstream; none of them are ever
/// thrown into the render path.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("request failed: {0}")]
    Transport(String),

    /// The server answered outside the 2xx range.
    #[error("API returned status {0}")]
    Status(u16),

    /// The body did not match the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    pub(crate) fn decode(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
