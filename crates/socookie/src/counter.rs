//! In-process counter standing in for kernel socket cookies.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::CookieError;
use crate::{BorrowedSocket, SocketDiscriminator};

/// Shared by every `CounterFallbackSource` in the process.
static COOKIE_GEN: AtomicU64 = AtomicU64::new(0);

/// Emulates socket cookies with a process-wide counter starting at 1.
///
/// Values are unique within the current process only: they restart with the
/// process and say nothing about sockets owned by other processes. Use at
/// your own risk.
#[derive(Debug, Clone, Copy, Default)]
pub struct CounterFallbackSource;

impl CounterFallbackSource {
    pub fn new() -> Self {
        Self
    }

    /// Returns the next counter value.
    pub fn next_value(&self) -> u64 {
        COOKIE_GEN.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
    }
}

impl SocketDiscriminator for CounterFallbackSource {
    fn discriminate(&self, _socket: BorrowedSocket<'_>) -> Result<u64, CookieError> {
        Ok(self.next_value())
    }

    fn is_authoritative(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::net::TcpListener;
    use std::thread;

    use super::*;
    use crate::borrow_socket;

    #[test]
    fn values_start_above_zero_and_increase() {
        let source = CounterFallbackSource::new();
        let a = source.next_value();
        let b = source.next_value();
        assert!(a >= 1);
        assert!(b > a);
    }

    #[test]
    fn same_socket_gets_fresh_values() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let source = CounterFallbackSource::new();
        let a = source.discriminate(borrow_socket(&listener)).unwrap();
        let b = source.discriminate(borrow_socket(&listener)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn not_authoritative() {
        assert!(!CounterFallbackSource::new().is_authoritative());
    }

    #[test]
    fn concurrent_values_are_unique() {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                thread::spawn(|| {
                    let source = CounterFallbackSource::new();
                    (0..1000).map(|_| source.next_value()).collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for value in handle.join().unwrap() {
                assert!(seen.insert(value), "duplicate value {value}");
            }
        }
        assert_eq!(seen.len(), 8000);
    }
}
