/// Internet checksum (RFC 1071) over `bytes`.
///
/// Words are paired low byte first and the folded, complemented sum is byte-swapped at the end, so
/// the returned value is already in network byte order: its big-endian bytes are the wire bytes of
/// the checksum field.
pub(crate) fn checksum(bytes: &[u8]) -> u16 {
    let mut sum: u32 = 0;

    let mut words = bytes.chunks_exact(2);
    for word in &mut words {
        sum = sum.wrapping_add(u32::from(u16::from_le_bytes([word[0], word[1]])));
    }
    if let [last] = words.remainder() {
        sum = sum.wrapping_add(u32::from(*last));
    }

    while sum >> 16 != 0 {
        sum = (sum >> 16) + (sum & 0xFFFF);
    }

    #[allow(clippy::cast_possible_truncation)]
    let folded = sum as u16;
    (!folded).swap_bytes()
}
