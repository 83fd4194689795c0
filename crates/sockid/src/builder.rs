//! Combining the cached prefix with a socket discriminator.

use std::sync::Arc;

use sockid_socookie::{AsSocket, PlatformSource, SocketDiscriminator, borrow_socket};

use crate::cache::IdentityCache;
use crate::error::IdentifierError;

/// Formats `<prefix>_<discriminator>` with the discriminator as 16
/// zero-padded uppercase hex digits.
pub fn format_identifier(prefix: &str, discriminator: u64) -> String {
    format!("{prefix}_{discriminator:016X}")
}

/// Builds socket identifiers from a shared [`IdentityCache`].
///
/// Every method returns `Err` rather than an empty string on failure; the
/// error's `placeholder()` is `INVALID_UUID`.
#[derive(Debug)]
pub struct IdentifierBuilder<D = PlatformSource> {
    cache: Arc<IdentityCache>,
    discriminator: D,
}

impl IdentifierBuilder<PlatformSource> {
    /// Uses the platform's default discriminator source.
    pub fn new(cache: Arc<IdentityCache>) -> Self {
        Self::with_discriminator(cache, PlatformSource::default())
    }
}

impl<D: SocketDiscriminator> IdentifierBuilder<D> {
    pub fn with_discriminator(cache: Arc<IdentityCache>, discriminator: D) -> Self {
        Self {
            cache,
            discriminator,
        }
    }

    pub fn cache(&self) -> &IdentityCache {
        &self.cache
    }

    pub fn discriminator(&self) -> &D {
        &self.discriminator
    }

    /// Returns the identifier for an open socket.
    pub fn identifier_for<S: AsSocket + ?Sized>(
        &self,
        socket: &S,
    ) -> Result<String, IdentifierError> {
        let discriminator = self.discriminator.discriminate(borrow_socket(socket))?;
        self.build(discriminator)
    }

    /// Returns the identifier for a discriminator obtained elsewhere, e.g. a
    /// cookie reported by `sock_diag` or eBPF.
    pub fn identifier_from_discriminator(
        &self,
        discriminator: u64,
    ) -> Result<String, IdentifierError> {
        self.build(discriminator)
    }

    /// Resolves the prefix (reading it on first use) and formats the
    /// identifier.
    pub fn build(&self, discriminator: u64) -> Result<String, IdentifierError> {
        let prefix = self.cache.resolve()?;
        Ok(format_identifier(&prefix, discriminator))
    }
}
