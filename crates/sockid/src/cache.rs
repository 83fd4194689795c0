//! Process-lifetime cache of the resolved prefix.
//!
//! The prefix source is read at most once. Concurrent first callers block on
//! a condition variable until the single in-flight read finishes, then all of
//! them (and every later caller) observe the same outcome. A failure is as
//! permanent as a success; nothing retries automatically. Only
//! [`IdentityCache::resolve_from`] replaces the cached outcome.

use std::fmt;
use std::path::Path;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use crate::config::CacheConfig;
use crate::error::SourceError;
use crate::source::{FileSource, PrefixSource};

#[derive(Debug, Clone)]
enum State {
    Uninitialized,
    Resolving,
    Resolved(Arc<str>),
    Failed(SourceError),
}

impl State {
    fn outcome(&self) -> Option<Result<Arc<str>, SourceError>> {
        match self {
            State::Resolved(prefix) => Some(Ok(Arc::clone(prefix))),
            State::Failed(err) => Some(Err(err.clone())),
            State::Uninitialized | State::Resolving => None,
        }
    }
}

/// Lazily resolved, read-once holder of the prefix.
pub struct IdentityCache {
    source: Box<dyn PrefixSource>,
    state: Mutex<State>,
    ready: Condvar,
}

impl IdentityCache {
    /// Creates a cache reading the file named by `config`.
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_source(FileSource::new(&config.source_location))
    }

    /// Creates a cache reading from an arbitrary source.
    pub fn with_source(source: impl PrefixSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            state: Mutex::new(State::Uninitialized),
            ready: Condvar::new(),
        }
    }

    /// Starts the cache already resolved to `prefix`, so the source is never
    /// read unless [`resolve_from`](Self::resolve_from) replaces it.
    ///
    /// Meant for pre-bootstrap defaults such as
    /// [`unsafe_fallback`](sockid_prefix::unsafe_fallback).
    pub fn preseeded(self, prefix: impl Into<String>) -> Self {
        let prefix: Arc<str> = Arc::from(prefix.into());
        *self.lock() = State::Resolved(prefix);
        self
    }

    /// Returns the cached prefix, reading the source on first use.
    pub fn resolve(&self) -> Result<Arc<str>, SourceError> {
        let mut state = self.lock();
        loop {
            if let Some(outcome) = state.outcome() {
                return outcome;
            }
            match *state {
                State::Resolving => {
                    state = self
                        .ready
                        .wait(state)
                        .unwrap_or_else(PoisonError::into_inner);
                }
                _ => break,
            }
        }
        *state = State::Resolving;
        drop(state);

        let guard = ResolvingGuard { cache: self };
        tracing::debug!(location = %self.source.location(), "resolving prefix");
        let outcome = read(self.source.as_ref());
        std::mem::forget(guard);

        let mut state = self.lock();
        // An override may have landed while the read was in flight.
        if matches!(*state, State::Resolving) {
            *state = match &outcome {
                Ok(prefix) => State::Resolved(Arc::clone(prefix)),
                Err(err) => State::Failed(err.clone()),
            };
            match &outcome {
                Ok(prefix) => tracing::debug!(%prefix, "prefix resolved"),
                Err(err) => tracing::debug!(error = %err, "prefix resolution failed"),
            }
        }
        let current = state.outcome().unwrap_or(outcome);
        drop(state);
        self.ready.notify_all();
        current
    }

    /// Reads `path` and, on success, replaces whatever the cache holds.
    ///
    /// On failure the previous state is left untouched and the error is
    /// returned.
    pub fn resolve_from(&self, path: impl AsRef<Path>) -> Result<(), SourceError> {
        let source = FileSource::new(path.as_ref());
        let prefix = read(&source)?;
        tracing::debug!(location = %source.location(), %prefix, "prefix overridden");

        *self.lock() = State::Resolved(prefix);
        self.ready.notify_all();
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for IdentityCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityCache")
            .field("source", &self.source.location())
            .field("state", &*self.lock())
            .finish()
    }
}

fn read(source: &dyn PrefixSource) -> Result<Arc<str>, SourceError> {
    source
        .read_prefix()
        .map(Arc::from)
        .map_err(|err| SourceError::new(source.location(), err))
}

/// Rolls a panicking read back to `Uninitialized` so waiters do not block
/// forever.
struct ResolvingGuard<'a> {
    cache: &'a IdentityCache,
}

impl Drop for ResolvingGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.cache.lock();
        if matches!(*state, State::Resolving) {
            *state = State::Uninitialized;
        }
        drop(state);
        self.cache.ready.notify_all();
    }
}
