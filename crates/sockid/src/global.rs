//! Process-wide convenience API.
//!
//! Backed by a lazily created [`IdentifierBuilder`] reading the prefix file
//! named by `UUID_PREFIX_FILE` (default `/var/local/uuid/prefix`) with the
//! platform discriminator. Services that want isolation, e.g. tests, should
//! construct their own [`IdentityCache`] instead.

use std::path::Path;
use std::sync::{Arc, OnceLock};

use sockid_socookie::AsSocket;

use crate::builder::IdentifierBuilder;
use crate::cache::IdentityCache;
use crate::config::CacheConfig;
use crate::error::{IdentifierError, SourceError};

static GLOBAL: OnceLock<IdentifierBuilder> = OnceLock::new();

/// Returns the process-wide builder, creating it on first use.
pub fn builder() -> &'static IdentifierBuilder {
    GLOBAL.get_or_init(|| {
        let config = CacheConfig::from_env();
        tracing::debug!(
            location = %config.source_location.display(),
            "initializing global identity cache"
        );
        IdentifierBuilder::new(Arc::new(IdentityCache::new(&config)))
    })
}

/// Reads the prefix from `path` and makes it the process-wide prefix.
///
/// Call before handing out identifiers; identifiers produced earlier keep
/// the old prefix.
pub fn set_prefix_file(path: impl AsRef<Path>) -> Result<(), SourceError> {
    builder().cache().resolve_from(path)
}

/// Returns the globally unique identifier of an open socket.
pub fn identifier_for<S: AsSocket + ?Sized>(socket: &S) -> Result<String, IdentifierError> {
    builder().identifier_for(socket)
}

/// Returns the globally unique identifier for a known discriminator.
pub fn identifier_from_discriminator(discriminator: u64) -> Result<String, IdentifierError> {
    builder().identifier_from_discriminator(discriminator)
}
