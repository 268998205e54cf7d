/// Magic byte at the start of every kdbush buffer.
pub(crate) const KDBUSH_MAGIC: u8 = 0xdb;

/// Serialization format version, stored in the high nibble of the second header byte.
pub(crate) const KDBUSH_VERSION: u8 = 1;

/// Bytes before the ids section.
pub(crate) const KDBUSH_HEADER_SIZE: usize = 8;
