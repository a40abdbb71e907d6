//! Decode/encode context.

use super::{ByteOrder, SchemaVersion};

/// Version and byte order of the archive being processed.
///
/// Established once from the header and passed by reference to every
/// record codec below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecContext {
    pub version: SchemaVersion,
    pub byte_order: ByteOrder,
}

impl CodecContext {
    #[must_use]
    pub const fn new(version: SchemaVersion, byte_order: ByteOrder) -> Self {
        Self {
            version,
            byte_order,
        }
    }
}

impl Default for CodecContext {
    fn default() -> Self {
        Self::new(SchemaVersion::default(), ByteOrder::default())
    }
}
