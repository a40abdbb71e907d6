//! Shader symbol record.
//!
//! # Layout
//!
//! | Offset | Width | Field       | Description                          |
//! |--------|-------|-------------|--------------------------------------|
//! | 0      | 4     | size        | Record size                          |
//! | 4      | 4     | offsetOrId  | Signed offset, block size or -1      |
//! | 8      | 4     | nameLen     | Logical name length (incl. NUL)      |
//! | 12     | 4     | idLen       | Backend identifier length (incl. NUL)|
//! | 16     | 4     | defaultLen  | Default value blob length            |
//! | 20     | 4     | flagCount   | One flag per declared variation      |
//! | 24     | ...   | name, id, default, flags (one byte each, 0/1)      |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::field::{FieldReader, FieldWriter, encode_string};
use crate::list::Record;
use crate::types::CodecContext;

/// The four symbol lists a program carries, in on-disk order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    UniformVariable,
    UniformBlock,
    Sampler,
    Attribute,
}

impl SymbolKind {
    /// All kinds in on-disk order.
    pub const ALL: [SymbolKind; 4] = [
        Self::UniformVariable,
        Self::UniformBlock,
        Self::Sampler,
        Self::Attribute,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::UniformVariable => "uniform variable",
            Self::UniformBlock => "uniform block",
            Self::Sampler => "sampler variable",
            Self::Attribute => "attribute variable",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One shader-visible variable.
///
/// The meaning of `offset_or_id` depends on the list holding the symbol:
/// uniform blocks store the byte size of their default value, samplers and
/// attributes store -1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShaderSymbol {
    pub offset_or_id: i32,
    pub name: String,
    /// Backend identifier (or variable name in the compiled shader).
    pub id: String,
    pub default_value: Vec<u8>,
    /// Applicability per declared variation, in declaration order.
    pub valid_variations: Vec<bool>,
}

impl Default for ShaderSymbol {
    fn default() -> Self {
        Self {
            offset_or_id: -1,
            name: String::new(),
            id: String::new(),
            default_value: Vec::new(),
            valid_variations: Vec::new(),
        }
    }
}

impl ShaderSymbol {
    /// Symbol with no default value and `offset_or_id == -1`.
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            ..Self::default()
        }
    }

    /// Uniform block whose `offset_or_id` is the size of `default_value`.
    pub fn uniform_block(
        name: impl Into<String>,
        id: impl Into<String>,
        default_value: Vec<u8>,
    ) -> Self {
        Self {
            offset_or_id: block_size(default_value.len()),
            default_value,
            ..Self::new(name, id)
        }
    }

    #[must_use]
    pub fn with_offset(mut self, offset_or_id: i32) -> Self {
        self.offset_or_id = offset_or_id;
        self
    }

    #[must_use]
    pub fn with_default(mut self, default_value: Vec<u8>) -> Self {
        self.default_value = default_value;
        self
    }

    #[must_use]
    pub fn with_variations(mut self, valid_variations: Vec<bool>) -> Self {
        self.valid_variations = valid_variations;
        self
    }
}

impl Record for ShaderSymbol {
    const KIND: &'static str = "symbol";
    const HEADER_LEN: usize = 24;

    fn decode(reader: &mut FieldReader<'_>, _ctx: &CodecContext) -> Result<Self> {
        let _size = reader.read_u32()?;
        let offset_or_id = reader.read_i32()?;
        let name_len = reader.read_len()?;
        let id_len = reader.read_len()?;
        let default_len = reader.read_len()?;
        let flag_count = reader.read_len()?;

        let name = reader.read_string(name_len)?;
        let id = reader.read_string(id_len)?;
        let default_value = reader.read_bytes(default_len)?.to_vec();
        let valid_variations = reader
            .read_bytes(flag_count)?
            .iter()
            .map(|&flag| flag != 0)
            .collect();

        Ok(Self {
            offset_or_id,
            name,
            id,
            default_value,
            valid_variations,
        })
    }

    fn encode(&self, writer: &mut FieldWriter, _ctx: &CodecContext) -> Result<()> {
        let name = encode_string(&self.name)?;
        let id = encode_string(&self.id)?;
        let flags: Vec<u8> = self.valid_variations.iter().map(|&v| u8::from(v)).collect();

        let start = writer.begin_sized();
        writer.write_i32(self.offset_or_id);
        writer.write_len(name.len())?;
        writer.write_len(id.len())?;
        writer.write_len(self.default_value.len())?;
        writer.write_len(flags.len())?;
        writer.write_bytes(&name);
        writer.write_bytes(&id);
        writer.write_bytes(&self.default_value);
        writer.write_bytes(&flags);
        writer.finish_sized(start)?;
        Ok(())
    }
}

/// Default size as stored in `offset_or_id`, saturating at `i32::MAX`.
///
/// A saturated size no longer matches the default, so `check_symbols`
/// rejects the symbol before it is written.
fn block_size(len: usize) -> i32 {
    i32::try_from(len).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_roundtrip_fields() {
        let ctx = CodecContext::default();
        let symbol = ShaderSymbol::uniform_block("Material", "cMaterial", vec![0, 0, 128, 63])
            .with_variations(vec![true, false, true]);
        let bytes = symbol.to_bytes(&ctx).unwrap();

        // header + "Material\0" + "cMaterial\0" + 4 default bytes + 3 flags
        assert_eq!(bytes.len(), 24 + 9 + 10 + 4 + 3);
        assert_eq!(&bytes[0..4], &(bytes.len() as u32).to_le_bytes());
        assert_eq!(&bytes[bytes.len() - 3..], &[1, 0, 1]);

        let mut reader = FieldReader::new(&bytes, ctx.byte_order);
        let decoded = ShaderSymbol::decode(&mut reader, &ctx).unwrap();
        assert_eq!(decoded, symbol);
        assert_eq!(decoded.offset_or_id, 4);
    }

    #[test]
    fn test_nonzero_flag_bytes_are_true() {
        let ctx = CodecContext::default();
        let mut bytes = ShaderSymbol::new("tex", "s0")
            .with_variations(vec![true, false])
            .to_bytes(&ctx)
            .unwrap();
        let last = bytes.len() - 2;
        bytes[last] = 7;

        let mut reader = FieldReader::new(&bytes, ctx.byte_order);
        let decoded = ShaderSymbol::decode(&mut reader, &ctx).unwrap();
        assert_eq!(decoded.valid_variations, vec![true, false]);
        assert_eq!(decoded.offset_or_id, -1);
    }

    #[test]
    fn test_block_size_saturates() {
        assert_eq!(block_size(16), 16);
        assert_eq!(block_size(i32::MAX as usize), i32::MAX);
        assert_eq!(block_size(i32::MAX as usize + 1), i32::MAX);
        assert_eq!(block_size(usize::MAX), i32::MAX);
        assert_eq!(
            ShaderSymbol::uniform_block("Block", "b", vec![0; 12]).offset_or_id,
            12
        );
    }

    #[test]
    fn test_kind_order() {
        assert_eq!(SymbolKind::ALL[1], SymbolKind::UniformBlock);
        assert_eq!(SymbolKind::Sampler.to_string(), "sampler variable");
    }
}
