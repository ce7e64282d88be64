//! Unix-datagram ingress endpoint
//!
//! The out-of-process feed path: producers `sendto` 56-byte packets at a
//! filesystem socket path. The endpoint owns the socket in non-blocking
//! mode, unlinks any stale file before binding, and removes the socket
//! file again when dropped.
//!
//! Datagrams are accepted only at the exact packet size; short, long, or
//! otherwise unparseable payloads are counted and dropped. Nothing here
//! ever blocks the consumer loop.

use std::io;
use std::os::unix::net::UnixDatagram;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};
use types::packet::{MarketDataPacket, PACKET_SIZE};

/// Receive buffer larger than a packet so oversized datagrams are
/// observed (and rejected) rather than silently truncated to size.
const RECV_BUF_LEN: usize = PACKET_SIZE * 2;

/// Errors surfaced to the caller at bind time. Everything after a
/// successful bind degrades to counters instead of errors.
#[derive(Error, Debug)]
pub enum IngressError {
    #[error("failed to remove stale socket file {path}")]
    Unlink {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to bind ingress socket at {path}")]
    Bind {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Outcome of one receive attempt.
#[derive(Debug)]
pub enum Ingest {
    /// A well-formed packet.
    Packet(MarketDataPacket),
    /// A datagram arrived but was malformed; it was counted and dropped.
    Bad,
    /// Nothing available (or a transient error): stop draining this tick.
    Idle,
}

/// Bound, non-blocking datagram endpoint.
pub struct IngressEndpoint {
    socket: UnixDatagram,
    path: PathBuf,
    rx_count: u64,
    bad_count: u64,
    buf: [u8; RECV_BUF_LEN],
}

impl IngressEndpoint {
    /// Unlink any existing file at `path`, bind a datagram socket there,
    /// and switch it to non-blocking mode.
    pub fn bind(path: impl AsRef<Path>) -> Result<Self, IngressError> {
        let path = path.as_ref().to_path_buf();

        match std::fs::remove_file(&path) {
            Ok(()) => debug!(path = %path.display(), "removed stale socket file"),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(IngressError::Unlink { path, source });
            }
        }

        let socket = UnixDatagram::bind(&path).map_err(|source| IngressError::Bind {
            path: path.clone(),
            source,
        })?;
        socket
            .set_nonblocking(true)
            .map_err(|source| IngressError::Bind {
                path: path.clone(),
                source,
            })?;

        info!(path = %path.display(), "ingress endpoint bound");
        Ok(Self {
            socket,
            path,
            rx_count: 0,
            bad_count: 0,
            buf: [0u8; RECV_BUF_LEN],
        })
    }

    /// Attempt to receive one datagram.
    ///
    /// Would-block and interrupted reads return [`Ingest::Idle`], which
    /// tells the caller to stop draining for this tick.
    pub fn poll(&mut self) -> Ingest {
        match self.socket.recv(&mut self.buf) {
            Ok(len) => match MarketDataPacket::from_datagram(&self.buf[..len]) {
                Ok(packet) => {
                    self.rx_count += 1;
                    Ingest::Packet(packet)
                }
                Err(err) => {
                    self.bad_count += 1;
                    debug!(%err, len, "dropping malformed datagram");
                    Ingest::Bad
                }
            },
            Err(err)
                if err.kind() == io::ErrorKind::WouldBlock
                    || err.kind() == io::ErrorKind::Interrupted =>
            {
                Ingest::Idle
            }
            Err(err) => {
                warn!(%err, "ingress receive error");
                Ingest::Idle
            }
        }
    }

    /// Datagrams accepted since bind.
    pub fn rx_count(&self) -> u64 {
        self.rx_count
    }

    /// Malformed datagrams dropped since bind.
    pub fn bad_count(&self) -> u64 {
        self.bad_count
    }

    /// Filesystem path this endpoint is bound to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for IngressEndpoint {
    fn drop(&mut self) {
        if let Err(err) = std::fs::remove_file(&self.path) {
            if err.kind() != io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), %err, "failed to unlink ingress socket");
            }
        }
    }
}
