use super::TSocket;
use socket2::{Domain, Protocol, Type};
use std::{io, net::IpAddr, time::Duration};

// SO_RCVTIMEO has microsecond resolution and a zero timeval means "block forever".
const MIN_READ_TIMEOUT: Duration = Duration::from_micros(1);

pub(crate) struct RawSocket {
    socket: socket2::Socket,
}

impl RawSocket {
    /// Opens a raw ICMPv4 socket. Reads block for at most `timeout`.
    pub(crate) fn new(timeout: Duration) -> Result<Self, io::Error> {
        tracing::trace!("creating RawSocket");
        let socket = socket2::Socket::new(Domain::IPV4, Type::RAW, Some(Protocol::ICMPV4))?;
        socket.set_read_timeout(Some(read_timeout(timeout)))?;
        Ok(RawSocket { socket })
    }
}

fn read_timeout(timeout: Duration) -> Duration {
    timeout.max(MIN_READ_TIMEOUT)
}

impl TSocket for RawSocket {
    fn send_to(&self, buf: &[u8], addr: &socket2::SockAddr) -> io::Result<usize> {
        self.socket.send_to(buf, addr)
    }

    fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, IpAddr)> {
        // Socket2 gives a safety guaranty which allows us to do an unsafe cast from `&mut [u8]`
        // to `&mut [std::mem::MaybeUninit<u8>]`.
        // https://docs.rs/socket2/0.4.7/socket2/struct.Socket.html#method.recv
        //
        // On a RAW socket we get the whole IP datagram.
        let (n, socket_addr) = self.socket.recv_from(unsafe {
            &mut *(buf as *mut [u8] as *mut [std::mem::MaybeUninit<u8>])
        })?;
        let ip = socket_addr
            .as_socket()
            .map(|addr| addr.ip())
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "received from a non-IP address"))?;
        Ok((n, ip))
    }
}

impl Drop for RawSocket {
    fn drop(&mut self) {
        tracing::trace!("closing RawSocket");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_microsecond_timeout_is_raised_to_one_microsecond() {
        assert_eq!(Duration::from_micros(1), read_timeout(Duration::from_nanos(500)));
        assert_eq!(Duration::from_micros(1), read_timeout(Duration::from_nanos(1)));
    }

    #[test]
    fn larger_timeout_is_kept() {
        assert_eq!(Duration::from_micros(1), read_timeout(Duration::from_micros(1)));
        assert_eq!(Duration::from_millis(250), read_timeout(Duration::from_millis(250)));
    }
}
