//! Per-socket discriminators.
//!
//! A discriminator is a 64-bit value unique per socket for the lifetime of
//! the current boot. On Linux it is the kernel's socket cookie (`SO_COOKIE`),
//! assigned when the socket is created and never reused until reboot (or
//! 2^64 sockets later). Other platforms get a process-wide counter which
//! cannot be relied upon across processes; use it at your own risk.

mod counter;
pub mod error;

#[cfg(target_os = "linux")]
#[path = "cookie_linux.rs"]
mod kernel;

pub use counter::CounterFallbackSource;
pub use error::CookieError;
#[cfg(target_os = "linux")]
pub use kernel::KernelCookieSource;

#[cfg(unix)]
pub use std::os::fd::{AsFd as AsSocket, BorrowedFd as BorrowedSocket};
#[cfg(windows)]
pub use std::os::windows::io::{AsSocket, BorrowedSocket};

/// The discriminator source used by default on this platform.
#[cfg(target_os = "linux")]
pub type PlatformSource = KernelCookieSource;

/// The discriminator source used by default on this platform.
#[cfg(not(target_os = "linux"))]
pub type PlatformSource = CounterFallbackSource;

/// Yields a fresh discriminator for an open socket.
///
/// Implementations must not memoize per handle: every call performs a new
/// query (or increment).
pub trait SocketDiscriminator: Send + Sync {
    fn discriminate(&self, socket: BorrowedSocket<'_>) -> Result<u64, CookieError>;

    /// Whether values are unique across every socket on the host for the
    /// current boot. `false` means unique within this process only.
    fn is_authoritative(&self) -> bool;
}

/// Borrows the OS-level handle of any socket-like value.
pub fn borrow_socket<S: AsSocket + ?Sized>(socket: &S) -> BorrowedSocket<'_> {
    #[cfg(unix)]
    {
        socket.as_fd()
    }
    #[cfg(windows)]
    {
        socket.as_socket()
    }
}

/// Returns the discriminator for `socket` using [`PlatformSource`].
pub fn get<S: AsSocket + ?Sized>(socket: &S) -> Result<u64, CookieError> {
    PlatformSource::default().discriminate(borrow_socket(socket))
}

#[cfg(test)]
mod tests {
    use std::net::{TcpListener, TcpStream};

    use super::*;

    #[test]
    fn get_distinguishes_sockets() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let client = TcpStream::connect(listener.local_addr().unwrap()).unwrap();
        let (server, _) = listener.accept().unwrap();

        let a = get(&client).unwrap();
        let b = get(&server).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn platform_source_authority() {
        let authoritative = PlatformSource::default().is_authoritative();
        assert_eq!(authoritative, cfg!(target_os = "linux"));
    }
}
