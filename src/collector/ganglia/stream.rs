//! TCP connection to gmond bounded by an absolute deadline.

use std::io::{self, Read};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::collector::error::CollectError;

/// A TCP stream whose reads all share one absolute deadline.
///
/// Every `read` is given a socket timeout equal to the time left before the
/// deadline, so a sender trickling bytes cannot extend the total read time.
/// Once the deadline has passed every read fails with `TimedOut`.
#[derive(Debug)]
pub struct DeadlineStream {
    stream: TcpStream,
    deadline: Instant,
}

impl DeadlineStream {
    pub fn new(stream: TcpStream, timeout: Duration) -> Self {
        Self {
            stream,
            deadline: Instant::now() + timeout,
        }
    }

    /// Time left before the deadline.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }
}

fn deadline_exceeded() -> io::Error {
    io::Error::new(io::ErrorKind::TimedOut, "read deadline exceeded")
}

impl Read for DeadlineStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.remaining();
        if remaining.is_zero() {
            return Err(deadline_exceeded());
        }
        self.stream.set_read_timeout(Some(remaining))?;

        match self.stream.read(buf) {
            // Unix reports an expired socket timeout as WouldBlock.
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Err(deadline_exceeded()),
            other => other,
        }
    }
}

/// Connects to `address`, trying every resolved socket address in turn.
///
/// The whole connection attempt is bounded by `timeout`; the returned
/// stream's read deadline starts once the connection is established.
pub fn connect(address: &str, timeout: Duration) -> Result<DeadlineStream, CollectError> {
    let connect_error = |source: io::Error| CollectError::Connect {
        address: address.to_string(),
        source,
    };

    let addrs = address.to_socket_addrs().map_err(connect_error)?;
    let connect_deadline = Instant::now() + timeout;
    let mut last_error = None;

    for addr in addrs {
        let remaining = connect_deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        match TcpStream::connect_timeout(&addr, remaining) {
            Ok(stream) => {
                debug!("Connected to gmond at {}", addr);
                return Ok(DeadlineStream::new(stream, timeout));
            }
            Err(e) => {
                debug!("Connection to {} failed: {}", addr, e);
                last_error = Some(e);
            }
        }
    }

    Err(connect_error(last_error.unwrap_or_else(|| {
        io::Error::new(
            io::ErrorKind::TimedOut,
            format!("no reachable address within {:?}", timeout),
        )
    })))
}
