//! Variation declaration and default records (v11).
//!
//! `[size:u32][nameLen:u32][valueCount:u32][idLen:u32][name][values...][id]`
//!
//! Values are NUL terminated and carry no length of their own; the decoder
//! skips any NUL padding in front of each value.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SharcError};
use crate::field::{FieldReader, FieldWriter, encode_string};
use crate::list::Record;
use crate::types::CodecContext;

const VARIATION_HEADER_LEN: usize = 16;

/// A shader permutation axis with its enumerated values.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VariationDeclaration {
    pub name: String,
    pub values: Vec<String>,
    /// Secondary identifier; together with `name` it keys defaults.
    pub id: String,
}

/// The default value chosen for a declared variation.
///
/// Shares the declaration layout. Bytes between the decoded fields and the
/// declared record size are kept in `trailing` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VariationDefault {
    pub name: String,
    pub values: Vec<String>,
    pub id: String,
    pub trailing: Vec<u8>,
}

impl VariationDeclaration {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
            id: id.into(),
        }
    }

    #[must_use]
    pub fn with_values<S: Into<String>>(mut self, values: impl IntoIterator<Item = S>) -> Self {
        self.values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Key shared with the matching [`VariationDefault`].
    #[must_use]
    pub fn key(&self) -> (&str, &str) {
        (&self.name, &self.id)
    }
}

impl VariationDefault {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
            id: id.into(),
            trailing: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.values = vec![value.into()];
        self
    }

    #[must_use]
    pub fn key(&self) -> (&str, &str) {
        (&self.name, &self.id)
    }
}

impl Record for VariationDeclaration {
    const KIND: &'static str = "variation";
    const HEADER_LEN: usize = VARIATION_HEADER_LEN;

    fn decode(reader: &mut FieldReader<'_>, _ctx: &CodecContext) -> Result<Self> {
        let fields = VariationFields::decode(reader, Self::KIND)?;
        Ok(Self {
            name: fields.name,
            values: fields.values,
            id: fields.id,
        })
    }

    fn encode(&self, writer: &mut FieldWriter, _ctx: &CodecContext) -> Result<()> {
        encode_fields(writer, &self.name, &self.values, &self.id, &[])
    }
}

impl Record for VariationDefault {
    const KIND: &'static str = "variation default";
    const HEADER_LEN: usize = VARIATION_HEADER_LEN;

    fn decode(reader: &mut FieldReader<'_>, _ctx: &CodecContext) -> Result<Self> {
        let fields = VariationFields::decode(reader, Self::KIND)?;
        let end = fields.start.saturating_add(fields.size);
        let trailing = if reader.position() < end {
            reader.read_bytes(end - reader.position())?.to_vec()
        } else {
            Vec::new()
        };

        Ok(Self {
            name: fields.name,
            values: fields.values,
            id: fields.id,
            trailing,
        })
    }

    fn encode(&self, writer: &mut FieldWriter, _ctx: &CodecContext) -> Result<()> {
        encode_fields(writer, &self.name, &self.values, &self.id, &self.trailing)
    }
}

struct VariationFields {
    start: usize,
    size: usize,
    name: String,
    values: Vec<String>,
    id: String,
}

impl VariationFields {
    fn decode(reader: &mut FieldReader<'_>, kind: &'static str) -> Result<Self> {
        let start = reader.position();
        let size = reader.read_len()?;
        if size < VARIATION_HEADER_LEN {
            return Err(SharcError::malformed_record(
                kind,
                start,
                format!("declared size {size} is below the {VARIATION_HEADER_LEN} byte header"),
            ));
        }
        let name_len = reader.read_len()?;
        let value_count = reader.read_len()?;
        let id_len = reader.read_len()?;

        let name = reader.read_string(name_len)?;

        let mut values = Vec::new();
        for _ in 0..value_count {
            reader.skip_nuls()?;
            values.push(reader.read_terminated_string()?);
        }

        let id = reader.read_string(id_len)?;

        Ok(Self {
            start,
            size,
            name,
            values,
            id,
        })
    }
}

fn encode_fields(
    writer: &mut FieldWriter,
    name: &str,
    values: &[String],
    id: &str,
    trailing: &[u8],
) -> Result<()> {
    if let Some(index) = values.iter().position(String::is_empty) {
        return Err(SharcError::invariant(
            format!("variation ('{name}', '{id}')"),
            format!("value {index} is empty"),
        ));
    }
    if let Some(index) = values.iter().position(|value| value.contains('\0')) {
        return Err(SharcError::invariant(
            format!("variation ('{name}', '{id}')"),
            format!("value {index} contains a NUL byte"),
        ));
    }

    let name_bytes = encode_string(name)?;
    let id_bytes = encode_string(id)?;

    let start = writer.begin_sized();
    writer.write_len(name_bytes.len())?;
    writer.write_len(values.len())?;
    writer.write_len(id_bytes.len())?;
    writer.write_bytes(&name_bytes);
    for value in values {
        writer.write_bytes(&encode_string(value)?);
    }
    writer.write_bytes(&id_bytes);
    writer.write_bytes(trailing);
    writer.finish_sized(start)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> CodecContext {
        CodecContext::default()
    }

    #[test]
    fn test_declaration_layout() {
        let decl = VariationDeclaration::new("QUALITY", "q").with_values(["low", "high"]);
        let bytes = decl.to_bytes(&ctx()).unwrap();

        // header + "QUALITY\0" + "low\0high\0" + "q\0"
        assert_eq!(bytes.len(), 16 + 8 + 9 + 2);
        assert_eq!(&bytes[0..4], &(bytes.len() as u32).to_le_bytes());
        assert_eq!(&bytes[8..12], &2u32.to_le_bytes());

        let mut reader = FieldReader::new(&bytes, ctx().byte_order);
        let decoded = VariationDeclaration::decode(&mut reader, &ctx()).unwrap();
        assert_eq!(decoded, decl);
    }

    #[test]
    fn test_value_padding_is_skipped() {
        let mut writer = FieldWriter::new(ctx().byte_order);
        let start = writer.begin_sized();
        writer.write_u32(2);
        writer.write_u32(2);
        writer.write_u32(2);
        writer.write_bytes(b"V\0");
        writer.write_bytes(b"\0\0a\0\0b\0");
        writer.write_bytes(b"x\0");
        writer.finish_sized(start).unwrap();
        let bytes = writer.into_bytes();

        let mut reader = FieldReader::new(&bytes, ctx().byte_order);
        let decoded = VariationDeclaration::decode(&mut reader, &ctx()).unwrap();
        assert_eq!(decoded.values, vec!["a", "b"]);
        assert_eq!(decoded.id, "x");
    }

    #[test]
    fn test_empty_value_fails_encode() {
        let decl = VariationDeclaration::new("QUALITY", "q").with_values(["low", ""]);
        let err = decl.to_bytes(&ctx()).unwrap_err();
        assert!(err.is_invariant_violation());
    }

    #[test]
    fn test_value_with_nul_fails_encode() {
        let decl = VariationDeclaration::new("FOG", "fog").with_values(["a\0b"]);
        let err = decl.to_bytes(&ctx()).unwrap_err();
        assert!(err.is_invariant_violation());
        assert!(err.to_string().contains("NUL"));
    }

    #[test]
    fn test_default_preserves_trailing_bytes() {
        let mut default = VariationDefault::new("QUALITY", "q").with_value("low");
        default.trailing = vec![9, 8, 7, 6];
        let bytes = default.to_bytes(&ctx()).unwrap();
        assert_eq!(&bytes[bytes.len() - 4..], &[9, 8, 7, 6]);

        let mut reader = FieldReader::new(&bytes, ctx().byte_order);
        let decoded = VariationDefault::decode(&mut reader, &ctx()).unwrap();
        assert_eq!(decoded, default);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_undersized_record_is_malformed() {
        let bytes = [8u8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        let mut reader = FieldReader::new(&bytes, ctx().byte_order);
        assert!(matches!(
            VariationDeclaration::decode(&mut reader, &ctx()),
            Err(SharcError::MalformedRecord {
                record: "variation",
                ..
            })
        ));
    }
}
