mod checksum;
mod icmpv4;
pub(crate) use icmpv4::IcmpV4;
pub(crate) use icmpv4::Received;

mod identifier;
pub(crate) use identifier::Identifier;

mod packet;

mod sequence_number;
pub(crate) use sequence_number::SequenceNumber;

mod socket;
pub(crate) use socket::raw_socket::RawSocket;
pub(crate) use socket::TSocket;

#[cfg(test)]
pub(crate) use socket::tests;
