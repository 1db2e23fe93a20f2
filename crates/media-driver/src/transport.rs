//! UDP transport (C2).
//!
//! Production transport for the receive path: a single bound
//! `tokio::net::UdpSocket`, read by one task via `recv_from` and written to
//! by whichever task executes a `ReceiverAction::SendStatusMessage` /
//! `SendNak`. Unlike the teacher's QUIC transport, there is no connection
//! setup, no TLS handshake, and no stream multiplexing: every datagram is
//! independent and carries its own frame header.

use std::{net::SocketAddr, sync::Arc};

use tokio::net::UdpSocket;

use crate::error::DriverError;

/// Maximum datagram size the receive path will read in one `recv_from`.
///
/// Matches the largest frame this driver can emit or accept:
/// `max_message_length` caps application payload at 64 KiB, plus header and
/// padding overhead.
pub const MAX_DATAGRAM_SIZE: usize = 65536 + 128;

/// UDP transport wrapping a single bound socket.
///
/// Cheap to clone: all clones share the same underlying socket and can be
/// used concurrently from multiple tasks.
#[derive(Clone)]
pub struct UdpTransport {
    socket: Arc<UdpSocket>,
}

impl UdpTransport {
    /// Bind a UDP socket at `address`.
    pub async fn bind(address: &str) -> Result<Self, DriverError> {
        let addr: SocketAddr = address
            .parse()
            .map_err(|e| DriverError::Config(format!("invalid bind address '{address}': {e}")))?;

        let socket = UdpSocket::bind(addr).await?;
        tracing::info!("UDP transport bound to {}", socket.local_addr()?);

        Ok(Self { socket: Arc::new(socket) })
    }

    /// Local address the transport is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, DriverError> {
        Ok(self.socket.local_addr()?)
    }

    /// Receive the next datagram into `buffer`, returning the number of
    /// bytes written and the sender's address.
    pub async fn recv_from(&self, buffer: &mut [u8]) -> Result<(usize, SocketAddr), DriverError> {
        Ok(self.socket.recv_from(buffer).await?)
    }

    /// Send `frame` to `dest`, returning the number of bytes actually
    /// written by the OS. A short send is not itself an I/O error at the UDP
    /// layer; callers decide how to treat the byte-count mismatch.
    pub async fn send_to(&self, dest: SocketAddr, frame: &[u8]) -> Result<usize, DriverError> {
        Ok(self.socket.send_to(frame, dest).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn transport_binds_to_ephemeral_port() {
        let transport = UdpTransport::bind("127.0.0.1:0").await.unwrap();
        assert_ne!(transport.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn transport_rejects_invalid_address() {
        let result = UdpTransport::bind("invalid:address:format").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn send_and_recv_round_trip() {
        let receiver = UdpTransport::bind("127.0.0.1:0").await.unwrap();
        let sender = UdpTransport::bind("127.0.0.1:0").await.unwrap();

        let recv_addr = receiver.local_addr().unwrap();
        sender.send_to(recv_addr, b"hello").await.unwrap();

        let mut buf = [0u8; 16];
        let (len, src) = receiver.recv_from(&mut buf).await.unwrap();

        assert_eq!(&buf[..len], b"hello");
        assert_eq!(src, sender.local_addr().unwrap());
    }
}
