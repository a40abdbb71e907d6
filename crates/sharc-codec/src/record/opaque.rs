//! Opaque sized record.
//!
//! Used where only the framing is known: legacy (v10) variation macros and
//! the trailing unknown list of v10 archives. The body after the size field
//! is kept verbatim.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SharcError};
use crate::field::{FIELD_LEN, FieldReader, FieldWriter};
use crate::list::Record;
use crate::types::CodecContext;

/// Smallest valid opaque record: size field plus one 4-byte word.
pub const OPAQUE_MIN_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpaqueRecord {
    /// Everything after the size field.
    pub body: Vec<u8>,
}

impl OpaqueRecord {
    pub fn new(body: Vec<u8>) -> Self {
        Self { body }
    }
}

impl Record for OpaqueRecord {
    const KIND: &'static str = "opaque";
    const HEADER_LEN: usize = OPAQUE_MIN_LEN;

    fn decode(reader: &mut FieldReader<'_>, _ctx: &CodecContext) -> Result<Self> {
        let start = reader.position();
        let size = reader.read_len()?;
        if size < OPAQUE_MIN_LEN {
            return Err(SharcError::malformed_record(
                Self::KIND,
                start,
                format!("declared size {size} is below the {OPAQUE_MIN_LEN} byte minimum"),
            ));
        }
        let body = reader.read_bytes(size - FIELD_LEN)?.to_vec();
        Ok(Self { body })
    }

    fn encode(&self, writer: &mut FieldWriter, _ctx: &CodecContext) -> Result<()> {
        if self.body.len() + FIELD_LEN < OPAQUE_MIN_LEN {
            return Err(SharcError::invariant(
                "opaque record",
                format!(
                    "body of {} bytes is shorter than {} bytes",
                    self.body.len(),
                    OPAQUE_MIN_LEN - FIELD_LEN
                ),
            ));
        }
        let start = writer.begin_sized();
        writer.write_bytes(&self.body);
        writer.finish_sized(start)?;
        Ok(())
    }
}
