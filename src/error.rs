use thiserror::Error;

/// Errors produced while encoding or decoding a session cookie.
///
/// A missing request, response or cookie is never reported through this type; those resolve to
/// empty sessions or no-ops.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("failed to encode session: {0}")]
    Encode(String),

    #[error("failed to decode session: {0}")]
    Decode(String),

    #[error("session cookie value exceeds max length ({len} > {max})")]
    TooLong { len: usize, max: usize },

    #[error("session cookie failed authentication")]
    Tampered,

    #[error("session cookie has expired")]
    Expired,

    #[error("session cookie timestamp is too new")]
    TooNew,

    #[error("unsupported cookie session version: {0}")]
    UnsupportedVersion(u8),
}

impl Error {
    /// Whether this error came from a cookie that was present but could not be trusted.
    pub fn is_decode(&self) -> bool {
        !matches!(self, Error::Encode(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
