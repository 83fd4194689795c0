//! Linux socket cookies via `getsockopt(SOL_SOCKET, SO_COOKIE)`.

use std::io;
use std::mem;
use std::os::fd::{AsRawFd, BorrowedFd};

use crate::SocketDiscriminator;
use crate::error::CookieError;

/// Reads the kernel-assigned cookie of a socket.
///
/// The cookie is unique among all sockets created since the last boot and
/// stable for the lifetime of the socket.
#[derive(Debug, Clone, Copy, Default)]
pub struct KernelCookieSource;

impl KernelCookieSource {
    pub fn new() -> Self {
        Self
    }
}

impl SocketDiscriminator for KernelCookieSource {
    fn discriminate(&self, socket: BorrowedFd<'_>) -> Result<u64, CookieError> {
        getsockopt_u64(socket, libc::SOL_SOCKET, libc::SO_COOKIE)
    }

    fn is_authoritative(&self) -> bool {
        true
    }
}

/// Reads a 64-bit socket option. `getsockopt` wrappers in std and libc only
/// cover `c_int`-sized values, so this marshals the buffer by hand.
fn getsockopt_u64(
    socket: BorrowedFd<'_>,
    level: libc::c_int,
    name: libc::c_int,
) -> Result<u64, CookieError> {
    let mut value: u64 = 0;
    let mut len = mem::size_of::<u64>() as libc::socklen_t;

    // SAFETY: `socket` is open for the duration of the borrow, and `value`
    // and `len` are valid writable storage of the advertised sizes.
    let ret = unsafe {
        libc::getsockopt(
            socket.as_raw_fd(),
            level,
            name,
            (&mut value as *mut u64).cast::<libc::c_void>(),
            &mut len,
        )
    };

    if ret != 0 {
        let errno = io::Error::last_os_error().raw_os_error().unwrap_or(0);
        return Err(CookieError::DiscriminatorUnavailable { errno });
    }
    if len as usize != mem::size_of::<u64>() {
        return Err(CookieError::ShortRead { len: len as usize });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::net::{TcpListener, TcpStream};
    use std::os::fd::AsFd;

    use super::*;

    fn connected_pair(listener: &TcpListener) -> (TcpStream, TcpStream) {
        let client = TcpStream::connect(listener.local_addr().unwrap()).unwrap();
        let (server, _) = listener.accept().unwrap();
        (client, server)
    }

    #[test]
    fn accepted_sockets_have_distinct_cookies() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let (_c1, conn1) = connected_pair(&listener);
        let (_c2, conn2) = connected_pair(&listener);

        let source = KernelCookieSource::new();
        let a = source.discriminate(conn1.as_fd()).unwrap();
        let b = source.discriminate(conn2.as_fd()).unwrap();
        assert_ne!(a, 0);
        assert_ne!(b, 0);
        assert_ne!(a, b);
    }

    #[test]
    fn cookie_is_stable_for_a_socket() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let source = KernelCookieSource::new();
        let a = source.discriminate(listener.as_fd()).unwrap();
        let b = source.discriminate(listener.as_fd()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn cloned_handle_shares_cookie() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let (_client, conn) = connected_pair(&listener);
        let dup = conn.try_clone().unwrap();

        let source = KernelCookieSource::new();
        assert_eq!(
            source.discriminate(conn.as_fd()).unwrap(),
            source.discriminate(dup.as_fd()).unwrap()
        );
    }

    #[test]
    fn regular_file_is_not_a_socket() {
        let file = tempfile::tempfile().unwrap();
        let err = KernelCookieSource::new()
            .discriminate(file.as_fd())
            .unwrap_err();
        assert_eq!(
            err,
            CookieError::DiscriminatorUnavailable {
                errno: libc::ENOTSOCK
            }
        );
    }
}
