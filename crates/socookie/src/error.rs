//! Error types for discriminator retrieval.

/// Errors produced while querying a socket's discriminator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CookieError {
    #[error("error in getsockopt(SO_COOKIE): errno={errno}")]
    DiscriminatorUnavailable { errno: i32 },

    #[error("getsockopt(SO_COOKIE) wrote {len} bytes, expected 8")]
    ShortRead { len: usize },
}

impl CookieError {
    /// The OS error code behind this failure, if any.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            CookieError::DiscriminatorUnavailable { errno } => Some(*errno),
            CookieError::ShortRead { .. } => None,
        }
    }
}
