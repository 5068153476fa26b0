use super::checksum::checksum;
use super::{Identifier, SequenceNumber};
use pnet_packet::icmp::{
    echo_reply::EchoReplyPacket,
    echo_request::{EchoRequestPacket as EchoRequestPacketV4, MutableEchoRequestPacket as MutableEchoRequestPacketV4},
    IcmpCode, IcmpType, IcmpTypes,
};
use pnet_packet::Packet;

// Raw sockets deliver the IPv4 header too. Options are not expected.
pub(crate) const IPV4_HEADER_SIZE: usize = 20;
pub(crate) const PAYLOAD_SIZE: usize = 192;
const TIMESTAMP_SIZE: usize = std::mem::size_of::<f64>();
const FILLER: u8 = b'Q';

/// Header fields of a received ICMP message plus the send timestamp echoed in its payload.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct EchoReply {
    pub icmp_type: IcmpType,
    pub icmp_code: IcmpCode,
    pub checksum: u16,
    pub identifier: Identifier,
    pub sequence_number: SequenceNumber,
    pub sent_at: Option<f64>,
}

impl EchoReply {
    /// Anything but an echo request carrying our identifier counts as a reply, not only type 0.
    pub(crate) fn is_reply_to(&self, identifier: Identifier) -> bool {
        self.icmp_type != IcmpTypes::EchoRequest && self.identifier == identifier
    }
}

pub(crate) fn new_icmpv4_package(
    identifier: Identifier,
    sequence_number: SequenceNumber,
    timestamp: f64,
) -> Option<MutableEchoRequestPacketV4<'static>> {
    let buf = vec![0u8; EchoRequestPacketV4::minimum_packet_size() + PAYLOAD_SIZE];
    let mut package = MutableEchoRequestPacketV4::owned(buf)?;
    package.set_icmp_type(IcmpTypes::EchoRequest);
    package.set_icmp_code(IcmpCode::new(0));
    package.set_identifier(identifier.into());
    package.set_sequence_number(sequence_number.into());
    package.set_payload(&new_payload(timestamp));

    package.set_checksum(0_u16);
    let checksum = checksum(package.packet());
    package.set_checksum(checksum);
    Some(package)
}

fn new_payload(timestamp: f64) -> [u8; PAYLOAD_SIZE] {
    let mut payload = [FILLER; PAYLOAD_SIZE];
    payload[..TIMESTAMP_SIZE].copy_from_slice(&timestamp.to_be_bytes());
    payload
}

/// Parses a raw IPv4 datagram. Returns `None` when fewer than 28 bytes are available.
pub(crate) fn parse_echo_reply(datagram: &[u8]) -> Option<EchoReply> {
    let package = EchoReplyPacket::new(datagram.get(IPV4_HEADER_SIZE..)?)?;
    let sent_at = package
        .payload()
        .get(..TIMESTAMP_SIZE)
        .and_then(|bytes| <[u8; TIMESTAMP_SIZE]>::try_from(bytes).ok())
        .map(f64::from_be_bytes);

    Some(EchoReply {
        icmp_type: package.get_icmp_type(),
        icmp_code: package.get_icmp_code(),
        checksum: package.get_checksum(),
        identifier: package.get_identifier().into(),
        sequence_number: package.get_sequence_number().into(),
        sent_at,
    })
}
