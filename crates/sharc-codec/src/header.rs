//! Archive header record.
//!
//! # Structure
//!
//! | Offset | Width | Field      | Description                          |
//! |--------|-------|------------|--------------------------------------|
//! | 0      | 4     | magic      | `SHAA` (0x53484141)                  |
//! | 4      | 4     | version    | 10 (legacy) or 11 (current)          |
//! | 8      | 4     | fileSize   | Total archive length, patched last   |
//! | 12     | 4     | endianness | Always 1                             |
//! | 16     | 4     | nameLen    | Archive name length (incl. NUL)      |
//! | 20     | ...   | name       | UTF-8, NUL terminated                |

use serde::{Deserialize, Serialize};

use crate::error::{Result, SharcError};
use crate::field::{FieldReader, FieldWriter, encode_string};
use crate::types::{ByteOrder, CodecContext, SchemaVersion};

/// Archive magic, `SHAA`.
pub const SHARC_MAGIC: u32 = 0x5348_4141;

/// Required value of the endianness tag.
pub const ENDIANNESS_TAG: u32 = 1;

/// Length of the fixed header fields before the name.
pub const HEADER_FIXED_LEN: usize = 20;

/// Byte offset of the file size field patched after encoding.
pub const FILE_SIZE_OFFSET: usize = 8;

/// Archive header.
///
/// Equality ignores `file_size`, which is derived on every encode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub version: SchemaVersion,
    /// File size declared by the decoded buffer (0 for new archives).
    pub file_size: u32,
    pub byte_order: ByteOrder,
}

impl Header {
    pub fn new(name: impl Into<String>, version: SchemaVersion) -> Self {
        Self {
            name: name.into(),
            version,
            file_size: 0,
            byte_order: ByteOrder::default(),
        }
    }

    /// Context for decoding/encoding the records behind this header.
    #[must_use]
    pub fn context(&self) -> CodecContext {
        CodecContext::new(self.version, self.byte_order)
    }

    /// Decode the header at the reader's cursor.
    ///
    /// Leaves the cursor on the first byte after the name.
    pub fn decode(reader: &mut FieldReader<'_>, byte_order: ByteOrder) -> Result<Self> {
        let magic = reader.read_u32()?;
        if magic != SHARC_MAGIC {
            if magic.swap_bytes() == SHARC_MAGIC {
                return Err(SharcError::malformed_header(
                    "magic is byte-swapped; the archive uses the other byte order",
                ));
            }
            return Err(SharcError::malformed_header(format!(
                "bad magic 0x{magic:08x}, expected 0x{SHARC_MAGIC:08x}"
            )));
        }

        let raw_version = reader.read_u32()?;
        let file_size = reader.read_u32()?;
        let endianness = reader.read_u32()?;
        let name_len = reader.read_len()?;

        if endianness != ENDIANNESS_TAG {
            return Err(SharcError::malformed_header(format!(
                "endianness tag is {endianness}, expected {ENDIANNESS_TAG}"
            )));
        }
        let version = SchemaVersion::from_raw(raw_version).ok_or_else(|| {
            SharcError::malformed_header(format!(
                "unsupported version {raw_version}, expected 10 or 11"
            ))
        })?;

        let name = reader.read_string(name_len)?;

        tracing::debug!(archive = %name, %version, file_size, "Decoded header");

        Ok(Self {
            name,
            version,
            file_size,
            byte_order,
        })
    }

    /// Encode the header with a zero file size placeholder.
    pub fn encode(&self, writer: &mut FieldWriter) -> Result<()> {
        let name = encode_string(&self.name)?;

        writer.write_u32(SHARC_MAGIC);
        writer.write_u32(self.version.as_raw());
        writer.write_u32(0);
        writer.write_u32(ENDIANNESS_TAG);
        writer.write_len(name.len())?;
        writer.write_bytes(&name);
        Ok(())
    }

    /// Serialized length of this header.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        HEADER_FIXED_LEN + self.name.len() + 1
    }
}

impl PartialEq for Header {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.version == other.version
            && self.byte_order == other.byte_order
    }
}

impl Eq for Header {}
