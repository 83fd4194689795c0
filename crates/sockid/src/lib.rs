//! Globally unique identifiers for TCP sockets.
//!
//! An identifier is `<prefix>_<cookie>`: the boot-scoped prefix written by
//! the bootstrap step (see [`prefix`]) followed by the socket's 64-bit
//! discriminator as 16 uppercase hex digits, e.g.
//! `host.example.com_1552945174_0000000000004A1F`.
//!
//! The prefix file must exist before the first identifier is requested. It
//! is read once per [`IdentityCache`] and the outcome, success or failure, is
//! kept for the life of the cache.
//!
//! No function here returns an empty identifier. Failures carry the
//! `INVALID_UUID` placeholder, so a file named after an unchecked identifier
//! ends up as `INVALID_UUID.gz` rather than `.gz`.

pub mod builder;
pub mod cache;
pub mod config;
pub mod error;
pub mod global;
pub mod source;

pub use sockid_prefix as prefix;
pub use sockid_socookie as socookie;

pub use builder::{IdentifierBuilder, format_identifier};
pub use cache::IdentityCache;
pub use config::CacheConfig;
pub use error::{INVALID_IDENTIFIER, IdentifierError, OrPlaceholder, SourceError};
pub use global::{identifier_for, identifier_from_discriminator, set_prefix_file};
pub use source::{FileSource, PrefixSource};
