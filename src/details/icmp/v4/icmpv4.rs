use super::packet::{new_icmpv4_package, parse_echo_reply, EchoReply};
use super::{Identifier, SequenceNumber, TSocket};
use crate::details::PingError;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::result::Result;
use std::time::{SystemTime, UNIX_EPOCH};

// ICMP has no ports but a socket address needs one.
const DESTINATION_PORT: u16 = 1;
const RECEIVE_BUFFER_SIZE: usize = 1024;

pub(crate) struct IcmpV4<S> {
    identifier: Identifier,
    socket: S,
}

/// One datagram read from the socket and the local time it was read at.
#[derive(Debug)]
pub(crate) struct Received {
    pub ip_addr: IpAddr,
    pub receive_time: f64,
    pub echo_reply: Option<EchoReply>,
}

impl<S> IcmpV4<S>
where
    S: TSocket,
{
    pub(crate) fn new(socket: S, identifier: Identifier) -> IcmpV4<S> {
        IcmpV4 { identifier, socket }
    }

    pub(crate) fn identifier(&self) -> Identifier {
        self.identifier
    }

    pub(crate) fn send_to(&self, ipv4: Ipv4Addr, sequence_number: SequenceNumber) -> Result<usize, PingError> {
        let addr: socket2::SockAddr = SocketAddr::new(IpAddr::V4(ipv4), DESTINATION_PORT).into();

        let package = new_icmpv4_package(self.identifier, sequence_number, unix_timestamp())
            .ok_or_else(|| PingError::Socket(io::Error::new(io::ErrorKind::Other, "could not create ICMP package")))?;

        let n = self.socket.send_to(pnet_packet::Packet::packet(&package), &addr)?;
        Ok(n)
    }

    /// Reads a single datagram. `Ok(None)` means the read timeout expired.
    pub(crate) fn try_receive(&self) -> Result<Option<Received>, io::Error> {
        let mut buf = [0u8; RECEIVE_BUFFER_SIZE];
        match self.socket.recv_from(&mut buf) {
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => Ok(None),
            Err(e) => Err(e),
            Ok((n, ip_addr)) => {
                let receive_time = unix_timestamp();
                Ok(Some(Received { ip_addr, receive_time, echo_reply: parse_echo_reply(&buf[..n]) }))
            }
        }
    }
}

/// Seconds since the Unix epoch on the local clock.
pub(crate) fn unix_timestamp() -> f64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs_f64()).unwrap_or_default()
}
