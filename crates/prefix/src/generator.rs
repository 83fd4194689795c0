//! Prefix generation from host identity and boot time.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{BootTimeFault, PrefixError};
use crate::{DEFAULT_UPTIME_SOURCE, IDENTITY_OVERRIDE_ENV, SEPARATOR};

/// Returns the operating system hostname.
pub type HostnameProvider = fn() -> io::Result<OsString>;

/// Returns the current wall-clock time.
pub type Clock = fn() -> SystemTime;

const MICROS_PER_SEC: i128 = 1_000_000;

/// Computes `HostIdentity_BootEpoch[_tag]*` prefixes.
///
/// The defaults read the OS hostname, `/proc/uptime` and the system clock.
/// Every source can be replaced through the `with_*` builders, which is how
/// tests exercise the failure paths without touching the process
/// environment.
#[derive(Debug, Clone)]
pub struct PrefixGenerator {
    identity_override: Option<String>,
    uptime_source: PathBuf,
    hostname: HostnameProvider,
    clock: Clock,
}

impl Default for PrefixGenerator {
    fn default() -> Self {
        Self {
            identity_override: None,
            uptime_source: PathBuf::from(DEFAULT_UPTIME_SOURCE),
            hostname: hostname::get,
            clock: SystemTime::now,
        }
    }
}

impl PrefixGenerator {
    /// Creates a generator that ignores `POD_NAME`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a generator that prefers `POD_NAME` over the hostname.
    pub fn from_env() -> Self {
        Self::default().with_identity_override(std::env::var(IDENTITY_OVERRIDE_ENV).ok())
    }

    /// Sets the orchestration-supplied identity. `None` or an empty string
    /// falls back to the hostname.
    pub fn with_identity_override(mut self, identity: Option<String>) -> Self {
        self.identity_override = identity;
        self
    }

    pub fn with_uptime_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.uptime_source = path.into();
        self
    }

    pub fn with_hostname_provider(mut self, provider: HostnameProvider) -> Self {
        self.hostname = provider;
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Resolves the host identity: the override when present and non-empty,
    /// otherwise the OS hostname.
    pub fn host_identity(&self) -> Result<String, PrefixError> {
        if let Some(identity) = self.identity_override.as_deref().filter(|s| !s.is_empty()) {
            return Ok(identity.to_owned());
        }

        let raw = (self.hostname)().map_err(|source| PrefixError::HostnameUnavailable { source })?;
        let name = raw.into_string().map_err(|raw| PrefixError::HostnameUnavailable {
            source: io::Error::new(
                io::ErrorKind::InvalidData,
                format!("hostname is not valid UTF-8: {raw:?}"),
            ),
        })?;
        if name.is_empty() {
            return Err(PrefixError::HostnameUnavailable {
                source: io::Error::new(io::ErrorKind::InvalidData, "hostname is empty"),
            });
        }
        Ok(name)
    }

    /// Generates a prefix with the given extra tags appended.
    ///
    /// On failure the error's [`PrefixError::placeholder`] is the value a
    /// careless caller should end up with: `BADHOSTNAME` or
    /// `<identity>_BADBOOTTIME`.
    pub fn generate(&self, extra_tags: &[&str]) -> Result<String, PrefixError> {
        let identity = self.host_identity()?;
        let now = (self.clock)();

        let epoch = read_uptime(&self.uptime_source)
            .and_then(|uptime| boot_epoch(now, uptime))
            .map_err(|fault| PrefixError::BootTimeUnavailable {
                identity: identity.clone(),
                path: self.uptime_source.clone(),
                fault,
            })?
            .to_string();

        let mut pieces: Vec<&str> = Vec::with_capacity(2 + extra_tags.len());
        pieces.push(&identity);
        pieces.push(&epoch);
        pieces.extend_from_slice(extra_tags);
        Ok(pieces.join(SEPARATOR))
    }
}

/// Reads seconds since boot from the first field of an uptime source.
fn read_uptime(path: &Path) -> Result<f64, BootTimeFault> {
    let contents = std::fs::read_to_string(path)?;

    let mut tokens = contents.split_whitespace();
    let (Some(first), Some(_)) = (tokens.next(), tokens.next()) else {
        return Err(BootTimeFault::Tokenize);
    };

    let uptime: f64 = first
        .parse()
        .map_err(|_| BootTimeFault::Parse(first.to_owned()))?;
    if !uptime.is_finite() || uptime < 0.0 {
        return Err(BootTimeFault::Parse(first.to_owned()));
    }
    Ok(uptime)
}

/// Wall-clock time minus uptime, truncated to whole unix seconds.
///
/// Uptimes that overflow the microsecond arithmetic, or that place the boot
/// before the unix epoch, are rejected rather than wrapped.
fn boot_epoch(now: SystemTime, uptime_secs: f64) -> Result<i64, BootTimeFault> {
    let out_of_range = || BootTimeFault::Parse(uptime_secs.to_string());

    let now_micros = match now.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_micros() as i128,
        Err(e) => -(e.duration().as_micros() as i128),
    };

    let uptime_micros = uptime_secs * MICROS_PER_SEC as f64;
    if !(0.0..i64::MAX as f64).contains(&uptime_micros) {
        return Err(out_of_range());
    }

    let epoch = (now_micros - uptime_micros as i128).div_euclid(MICROS_PER_SEC);
    if epoch < 0 {
        return Err(out_of_range());
    }
    i64::try_from(epoch).map_err(|_| out_of_range())
}
