//! Error types for prefix generation.

use std::io;
use std::path::PathBuf;

/// Placeholder returned when the host identity cannot be determined.
pub const BAD_HOSTNAME: &str = "BADHOSTNAME";

/// Tag appended to the host identity when the boot time cannot be derived.
pub const BAD_BOOT_TIME: &str = "BADBOOTTIME";

/// Placeholder returned when the prefix file cannot be written.
pub const BAD_DESTINATION: &str = "BADDESTINATION";

/// Errors produced while generating or persisting a prefix.
#[derive(Debug, thiserror::Error)]
pub enum PrefixError {
    #[error("hostname unavailable: {source}")]
    HostnameUnavailable {
        #[source]
        source: io::Error,
    },

    #[error("boot time unavailable from {}: {fault}", .path.display())]
    BootTimeUnavailable {
        identity: String,
        path: PathBuf,
        #[source]
        fault: BootTimeFault,
    },

    #[error("could not write prefix file {}: {source}", .path.display())]
    DestinationUnwritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PrefixError {
    /// The non-empty, tagged value that stands in for a prefix on this
    /// failure path.
    pub fn placeholder(&self) -> String {
        match self {
            PrefixError::HostnameUnavailable { .. } => BAD_HOSTNAME.to_string(),
            PrefixError::BootTimeUnavailable { identity, .. } => {
                format!("{identity}_{BAD_BOOT_TIME}")
            }
            PrefixError::DestinationUnwritable { .. } => BAD_DESTINATION.to_string(),
        }
    }
}

/// Why the uptime source could not be turned into a boot time.
#[derive(Debug, thiserror::Error)]
pub enum BootTimeFault {
    #[error("could not read uptime source: {0}")]
    Read(#[from] io::Error),

    #[error("could not tokenize uptime contents")]
    Tokenize,

    #[error("could not parse uptime value {0:?}")]
    Parse(String),
}
