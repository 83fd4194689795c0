//! Error types for identifier construction.

use std::io;
use std::sync::Arc;

use sockid_prefix::PrefixError;
use sockid_socookie::CookieError;

/// Returned in place of an identifier (or prefix) whenever one cannot be
/// produced.
pub const INVALID_IDENTIFIER: &str = "INVALID_UUID";

/// The prefix source could not be read.
///
/// Cloneable so that every caller of a failed cache observes the same error.
#[derive(Debug, Clone, thiserror::Error)]
#[error("could not read prefix from {location}: {source}")]
pub struct SourceError {
    location: String,
    #[source]
    source: Arc<io::Error>,
}

impl SourceError {
    pub fn new(location: impl Into<String>, source: io::Error) -> Self {
        Self {
            location: location.into(),
            source: Arc::new(source),
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn kind(&self) -> io::ErrorKind {
        self.source.kind()
    }

    /// The prefix stand-in cached alongside this error.
    pub fn placeholder(&self) -> &'static str {
        INVALID_IDENTIFIER
    }
}

/// Errors produced while building an identifier.
#[derive(Debug, Clone, thiserror::Error)]
pub enum IdentifierError {
    #[error(transparent)]
    PrefixSourceUnreadable(#[from] SourceError),

    #[error(transparent)]
    Discriminator(#[from] CookieError),
}

impl IdentifierError {
    /// The identifier stand-in returned alongside this error.
    pub fn placeholder(&self) -> &'static str {
        INVALID_IDENTIFIER
    }
}

/// Collapses a result into its value or the error's placeholder.
///
/// For callers that must produce *some* string (a log field, a file name)
/// and would rather see a tagged defect than an empty value.
pub trait OrPlaceholder {
    fn or_placeholder(self) -> String;
}

impl OrPlaceholder for Result<String, IdentifierError> {
    fn or_placeholder(self) -> String {
        self.unwrap_or_else(|err| err.placeholder().to_string())
    }
}

impl OrPlaceholder for Result<Arc<str>, SourceError> {
    fn or_placeholder(self) -> String {
        match self {
            Ok(prefix) => prefix.to_string(),
            Err(err) => err.placeholder().to_string(),
        }
    }
}

impl OrPlaceholder for Result<String, PrefixError> {
    fn or_placeholder(self) -> String {
        self.unwrap_or_else(|err| err.placeholder())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_error_message_names_location() {
        let err = SourceError::new(
            "/var/local/uuid/prefix",
            io::Error::from(io::ErrorKind::NotFound),
        );
        assert!(err.to_string().contains("/var/local/uuid/prefix"));
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert_eq!(err.placeholder(), "INVALID_UUID");
    }

    #[test]
    fn cloned_source_error_shares_cause() {
        let err = SourceError::new("x", io::Error::other("boom"));
        let clone = err.clone();
        assert!(Arc::ptr_eq(&err.source, &clone.source));
    }

    #[test]
    fn identifier_error_placeholder() {
        let err = IdentifierError::from(CookieError::DiscriminatorUnavailable { errno: 9 });
        assert_eq!(err.placeholder(), INVALID_IDENTIFIER);
        assert!(err.to_string().contains("errno=9"));
    }

    #[test]
    fn or_placeholder_never_empty() {
        let failed: Result<String, IdentifierError> =
            Err(SourceError::new("x", io::Error::other("boom")).into());
        assert_eq!(failed.or_placeholder(), "INVALID_UUID");

        let ok: Result<String, IdentifierError> = Ok("p_0000000000000001".into());
        assert_eq!(ok.or_placeholder(), "p_0000000000000001");

        let prefix: Result<String, PrefixError> = Err(PrefixError::HostnameUnavailable {
            source: io::Error::other("boom"),
        });
        assert_eq!(prefix.or_placeholder(), "BADHOSTNAME");
    }
}
