//! The immutable (remote, local) address pair a receive path is bound to.

use std::net::SocketAddr;

/// One bound UDP endpoint plus the remote address pair it communicates
/// with. Immutable for the lifetime of the receive path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Destination {
    /// Local address the UDP socket is bound to.
    pub local_addr: SocketAddr,
    /// Remote address frames are demultiplexed from / sent back to.
    pub remote_addr: SocketAddr,
    /// Whether this destination is a multicast group.
    pub multicast: bool,
}

impl Destination {
    /// Construct a unicast destination.
    #[must_use]
    pub fn unicast(local_addr: SocketAddr, remote_addr: SocketAddr) -> Self {
        Self { local_addr, remote_addr, multicast: false }
    }

    /// Construct a multicast destination.
    #[must_use]
    pub fn multicast(local_addr: SocketAddr, remote_addr: SocketAddr) -> Self {
        Self { local_addr, remote_addr, multicast: true }
    }
}
