//! Boot-scoped identifier prefixes.
//!
//! A prefix names "this host (or pod), this boot": the host identity joined
//! with the boot epoch in unix seconds, e.g. `host.example.com_1552945174`.
//! It is generated once by a bootstrap step, written to a well-known file and
//! then read by every process that hands out socket identifiers.
//!
//! Generation never yields an empty string. Every failure carries a
//! placeholder (`BADHOSTNAME`, `<identity>_BADBOOTTIME`, ...) so that a value
//! used without checking the error is visibly broken downstream.

pub mod error;
pub mod file;
pub mod generator;

pub use error::{BootTimeFault, PrefixError};
pub use file::{unsafe_fallback, write_prefix_file};
pub use generator::PrefixGenerator;

/// Well-known location of the prefix file.
pub const DEFAULT_PREFIX_FILE: &str = "/var/local/uuid/prefix";

/// Kernel source for seconds elapsed since boot.
pub const DEFAULT_UPTIME_SOURCE: &str = "/proc/uptime";

/// Environment variable naming the orchestration-supplied host identity.
pub const IDENTITY_OVERRIDE_ENV: &str = "POD_NAME";

/// Tag appended to best-effort prefixes produced without a bootstrap step.
pub const UNSAFE_TAG: &str = "unsafe";

/// Separator between prefix segments.
pub const SEPARATOR: &str = "_";
