use std::{io, net::IpAddr};

pub(crate) mod raw_socket;

pub(crate) trait TSocket: Send + Sync {
    fn send_to(&self, buf: &[u8], addr: &socket2::SockAddr) -> io::Result<usize>;
    /// Reads one datagram. Fails with `WouldBlock` or `TimedOut` when the read timeout expires.
    fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, IpAddr)>;
}
