// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Optional close capability for readers.
//!
//! Rust readers usually release their resources on drop, so closing is an
//! opt-in capability here. The default body of [`Close::close`] reports
//! success, which is how a reader without a meaningful close (an in-memory
//! buffer, say) expresses "nothing to close".

use std::{
    collections::VecDeque,
    fs::File,
    io::{self, BufReader, Chain, Cursor, Empty, Repeat, Stdin, StdinLock, Take},
    net::{Shutdown, TcpStream},
    process::{ChildStderr, ChildStdout},
};

/// A reader that can be explicitly closed.
pub trait Close {
    /// Closes the underlying resource.
    ///
    /// The default implementation does nothing and returns `Ok(())`.
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Close for &[u8] {}

impl Close for VecDeque<u8> {}

impl<T> Close for Cursor<T> {}

impl Close for Empty {}

impl Close for Repeat {}

/// The descriptor is released when the `File` is dropped.
impl Close for File {}

impl Close for &File {}

impl Close for Stdin {}

impl Close for StdinLock<'_> {}

impl Close for ChildStdout {}

impl Close for ChildStderr {}

/// Shuts down the read half. A peer that already disconnected counts as closed.
impl Close for TcpStream {
    fn close(&mut self) -> io::Result<()> {
        shutdown_read(self.shutdown(Shutdown::Read))
    }
}

#[cfg(unix)]
impl Close for std::os::unix::net::UnixStream {
    fn close(&mut self) -> io::Result<()> {
        shutdown_read(self.shutdown(Shutdown::Read))
    }
}

fn shutdown_read(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
        other => other,
    }
}

impl<R: Close> Close for Take<R> {
    fn close(&mut self) -> io::Result<()> {
        self.get_mut().close()
    }
}

impl<R: Close> Close for BufReader<R> {
    fn close(&mut self) -> io::Result<()> {
        self.get_mut().close()
    }
}

/// Closes both halves; the first error wins.
impl<A: Close, B: Close> Close for Chain<A, B> {
    fn close(&mut self) -> io::Result<()> {
        let (first, second) = self.get_mut();
        let first = first.close();
        let second = second.close();
        first.and(second)
    }
}

impl<R: Close + ?Sized> Close for Box<R> {
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

impl<R: Close + ?Sized> Close for &mut R {
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

// tokio readers. The sockets have no read-side shutdown and close on drop.

impl Close for tokio::io::Empty {}

impl Close for tokio::io::Repeat {}

impl Close for tokio::io::DuplexStream {}

impl<T> Close for tokio::io::ReadHalf<T> {}

impl Close for tokio::net::TcpStream {}

impl Close for tokio::net::tcp::OwnedReadHalf {}

#[cfg(unix)]
impl Close for tokio::net::UnixStream {}

impl<R: Close + tokio::io::AsyncRead> Close for tokio::io::BufReader<R> {
    fn close(&mut self) -> io::Result<()> {
        self.get_mut().close()
    }
}

impl<R: Close + tokio::io::AsyncRead> Close for tokio::io::Take<R> {
    fn close(&mut self) -> io::Result<()> {
        self.get_mut().close()
    }
}

impl<A: Close + tokio::io::AsyncRead, B: Close + tokio::io::AsyncRead> Close for tokio::io::Chain<A, B> {
    fn close(&mut self) -> io::Result<()> {
        let (first, second) = self.get_mut();
        let first = first.close();
        let second = second.close();
        first.and(second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    struct Failing {
        closed: usize,
    }

    impl Read for Failing {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Ok(0)
        }
    }

    impl Close for Failing {
        fn close(&mut self) -> io::Result<()> {
            self.closed += 1;
            Err(io::Error::other("close failed"))
        }
    }

    #[test]
    fn test_in_memory_readers_close_cleanly() {
        let mut bytes: &[u8] = b"abc";
        assert!(bytes.close().is_ok());
        assert!(Cursor::new(vec![1u8, 2]).close().is_ok());
        assert!(io::empty().close().is_ok());
    }

    #[test]
    fn test_wrappers_delegate_close() {
        let mut reader = BufReader::new(Failing { closed: 0 });
        let err = reader.close().unwrap_err();
        assert_eq!(err.to_string(), "close failed");
        assert_eq!(reader.get_ref().closed, 1);
    }

    #[test]
    fn test_chain_closes_both_halves() {
        let mut chain = Failing { closed: 0 }.chain(Failing { closed: 0 });
        assert!(chain.close().is_err());
        let (a, b) = chain.get_ref();
        assert_eq!(a.closed, 1);
        assert_eq!(b.closed, 1);
    }

    #[test]
    fn test_tcp_close_shuts_down_read_half() -> io::Result<()> {
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        let mut client = TcpStream::connect(listener.local_addr()?)?;
        let (_server, _) = listener.accept()?;

        client.close()?;
        assert_eq!(client.read(&mut [0u8; 8])?, 0);
        Ok(())
    }

    #[test]
    fn test_shutdown_on_disconnected_socket_is_ok() {
        let gone = io::Error::from(io::ErrorKind::NotConnected);
        assert!(shutdown_read(Err(gone)).is_ok());
        assert!(shutdown_read(Err(io::Error::other("boom"))).is_err());
    }

    #[tokio::test]
    async fn test_tokio_readers_close_cleanly() {
        let (_tx, rx) = tokio::io::duplex(8);
        let mut reader = tokio::io::BufReader::new(rx);
        assert!(reader.close().is_ok());
        assert!(tokio::io::empty().close().is_ok());
    }

    #[test]
    fn test_boxed_trait_object_closes() {
        let mut boxed: Box<dyn Close> = Box::new(Failing { closed: 0 });
        assert!(boxed.close().is_err());
    }
}
