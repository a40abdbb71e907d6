//! Preprocessor macro record.
//!
//! `[size:u32][nameLen:u32][valueLen:u32][name][value]`

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::field::{FieldReader, FieldWriter, encode_string};
use crate::list::Record;
use crate::types::CodecContext;

/// A `#define NAME VALUE` pair injected into one shader stage.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShaderMacro {
    pub name: String,
    pub value: String,
}

impl ShaderMacro {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl Record for ShaderMacro {
    const KIND: &'static str = "macro";
    const HEADER_LEN: usize = 12;

    fn decode(reader: &mut FieldReader<'_>, _ctx: &CodecContext) -> Result<Self> {
        let _size = reader.read_u32()?;
        let name_len = reader.read_len()?;
        let value_len = reader.read_len()?;

        let name = reader.read_string(name_len)?;
        let value = reader.read_string(value_len)?;

        Ok(Self { name, value })
    }

    fn encode(&self, writer: &mut FieldWriter, _ctx: &CodecContext) -> Result<()> {
        let name = encode_string(&self.name)?;
        let value = encode_string(&self.value)?;

        let start = writer.begin_sized();
        writer.write_len(name.len())?;
        writer.write_len(value.len())?;
        writer.write_bytes(&name);
        writer.write_bytes(&value);
        writer.finish_sized(start)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macro_layout() {
        let bytes = ShaderMacro::new("USE_FOG", "1")
            .to_bytes(&CodecContext::default())
            .unwrap();

        // 12 byte header + "USE_FOG\0" + "1\0"
        assert_eq!(bytes.len(), 22);
        assert_eq!(&bytes[0..4], &22u32.to_le_bytes());
        assert_eq!(&bytes[4..8], &8u32.to_le_bytes());
        assert_eq!(&bytes[8..12], &2u32.to_le_bytes());
        assert_eq!(&bytes[12..], b"USE_FOG\x001\x00");
    }

    #[test]
    fn test_macro_decode() {
        let ctx = CodecContext::default();
        let bytes = ShaderMacro::new("QUALITY", "high").to_bytes(&ctx).unwrap();
        let mut reader = FieldReader::new(&bytes, ctx.byte_order);
        let decoded = ShaderMacro::decode(&mut reader, &ctx).unwrap();
        assert_eq!(decoded.name, "QUALITY");
        assert_eq!(decoded.value, "high");
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_trailing_nul_in_name_fails_encode() {
        let err = ShaderMacro::new("USE_FOG\0", "1")
            .to_bytes(&CodecContext::default())
            .unwrap_err();
        assert!(err.is_invariant_violation());
    }
}
