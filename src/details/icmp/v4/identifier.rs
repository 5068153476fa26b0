type IdentifierInnerType = u16;

/// ICMP echo identifier of one probe session.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub(crate) struct Identifier(IdentifierInnerType);

impl Identifier {
    pub(crate) fn from_process_id() -> Identifier {
        Identifier::from_pid(std::process::id())
    }

    #[allow(clippy::cast_possible_truncation)]
    fn from_pid(pid: u32) -> Identifier {
        Identifier((pid & 0xFFFF) as IdentifierInnerType)
    }
}

impl From<Identifier> for IdentifierInnerType {
    fn from(value: Identifier) -> Self {
        value.0
    }
}

impl From<IdentifierInnerType> for Identifier {
    fn from(value: IdentifierInnerType) -> Self {
        Identifier(value)
    }
}
