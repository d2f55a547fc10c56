//! Carries one envelope to the collector and returns its reply.

use std::io::Write;
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use super::codec::{Envelope, Reply};
use super::error::SendError;

/// Trait for delivering a single envelope.
///
/// Implementations might include:
/// - `TcpTransport` - one fresh TCP connection per envelope
/// - an in-process recorder, for tests
pub trait Transport: Send + Sync {
    /// Deliver the envelope and return whatever the collector answered.
    fn transmit(&self, envelope: &Envelope) -> Result<Reply, SendError>;

    /// Human-readable destination, used in logs.
    fn destination(&self) -> String;
}

/// Opens a new connection for every envelope and closes it after the reply.
#[derive(Clone, Debug)]
pub struct TcpTransport {
    server: String,
    port: u16,
    connect_timeout: Option<Duration>,
    io_timeout: Option<Duration>,
}

impl TcpTransport {
    /// Create a transport with no timeouts.
    pub fn new(server: impl Into<String>, port: u16) -> Self {
        Self {
            server: server.into(),
            port,
            connect_timeout: None,
            io_timeout: None,
        }
    }

    /// Bound the time spent establishing each connection.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Bound each write and read on an established connection.
    pub fn with_io_timeout(mut self, timeout: Duration) -> Self {
        self.io_timeout = Some(timeout);
        self
    }

    fn connect(&self) -> Result<TcpStream, SendError> {
        let connectivity = |source| SendError::Connectivity {
            address: self.destination(),
            source,
        };

        let addrs: Vec<SocketAddr> = (self.server.as_str(), self.port)
            .to_socket_addrs()
            .map_err(connectivity)?
            .collect();

        let mut last_error = std::io::Error::new(
            std::io::ErrorKind::AddrNotAvailable,
            "address resolved to nothing",
        );
        for addr in addrs {
            let attempt = match self.connect_timeout {
                Some(timeout) => TcpStream::connect_timeout(&addr, timeout),
                None => TcpStream::connect(addr),
            };
            match attempt {
                Ok(stream) => return Ok(stream),
                Err(err) => last_error = err,
            }
        }
        Err(connectivity(last_error))
    }
}

impl Transport for TcpTransport {
    fn transmit(&self, envelope: &Envelope) -> Result<Reply, SendError> {
        let mut stream = self.connect()?;
        let protocol = |source| SendError::Protocol {
            address: self.destination(),
            source,
        };

        stream.set_write_timeout(self.io_timeout).map_err(protocol)?;
        stream.set_read_timeout(self.io_timeout).map_err(protocol)?;

        stream.write_all(envelope.as_bytes()).map_err(protocol)?;
        stream.flush().map_err(protocol)?;

        let reply = Reply::read_from(&mut stream).map_err(protocol)?;
        // The peer may already have closed; the reply is what matters.
        let _ = stream.shutdown(Shutdown::Both);
        Ok(reply)
    }

    fn destination(&self) -> String {
        format!("{}:{}", self.server, self.port)
    }
}
