//! Shader source record.
//!
//! # Layout
//!
//! | Offset | Width | Field    | Description                              |
//! |--------|-------|----------|------------------------------------------|
//! | 0      | 4     | size     | Record size                              |
//! | 4      | 4     | nameLen  | File name length (incl. NUL)             |
//! | 8      | 4     | codeLen  | Code length in bytes                     |
//! | 12     | 4     | codeLen2 | Secondary code length                    |
//! | 16     | ...   | name, code (Shift_JIS, no terminator)               |
//!
//! `codeLen2` usually equals `codeLen`. Archives exist where it does not, so a
//! decoded source keeps its on-disk code bytes and secondary length and writes
//! both back until the code is replaced.

use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

use encoding_rs::SHIFT_JIS;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SharcError};
use crate::field::{
    FieldReader, FieldWriter, decode_legacy_text, encode_legacy_text, encode_string, to_u32,
};
use crate::list::Record;
use crate::types::CodecContext;

/// One shader source file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShaderSource {
    /// File name, e.g. `common.glsl`.
    pub name: String,
    code: String,
    #[serde(skip)]
    stored: Option<StoredCode>,
}

/// On-disk form of code that has not been edited since decode.
#[derive(Debug, Clone)]
struct StoredCode {
    bytes: Vec<u8>,
    secondary_len: u32,
}

impl ShaderSource {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            stored: None,
        }
    }

    /// Shader text.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Replace the shader text. The next encode derives both lengths from it.
    pub fn set_code(&mut self, code: impl Into<String>) {
        self.code = code.into();
        self.stored = None;
    }

    /// Secondary length carried over from decode, if the code is untouched.
    #[must_use]
    pub fn preserved_secondary_len(&self) -> Option<u32> {
        self.stored.as_ref().map(|stored| stored.secondary_len)
    }

    /// Write the code as UTF-8 to `dir/<name>` and return the path.
    pub fn export(&self, dir: &Path) -> Result<PathBuf> {
        let relative = Path::new(&self.name);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(SharcError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("source name '{}' escapes the export directory", self.name),
            )));
        }

        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.code.as_bytes())?;
        Ok(path)
    }
}

impl PartialEq for ShaderSource {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.code == other.code
    }
}

impl Eq for ShaderSource {}

impl Record for ShaderSource {
    const KIND: &'static str = "source";
    const HEADER_LEN: usize = 16;

    fn decode(reader: &mut FieldReader<'_>, _ctx: &CodecContext) -> Result<Self> {
        let _size = reader.read_u32()?;
        let name_len = reader.read_len()?;
        let code_len = reader.read_len()?;
        let secondary_len = reader.read_u32()?;

        let name = reader.read_string(name_len)?;

        let code_offset = reader.position();
        let bytes = reader.read_bytes(code_len)?;
        let code = decode_legacy_text(bytes).ok_or(SharcError::InvalidText {
            offset: code_offset,
            encoding: SHIFT_JIS.name(),
        })?;

        if secondary_len as usize != code_len {
            tracing::debug!(
                source = %name,
                code_len,
                secondary_len,
                "Source keeps a diverging secondary length"
            );
        }

        Ok(Self {
            name,
            code,
            stored: Some(StoredCode {
                bytes: bytes.to_vec(),
                secondary_len,
            }),
        })
    }

    fn encode(&self, writer: &mut FieldWriter, _ctx: &CodecContext) -> Result<()> {
        let name = encode_string(&self.name)?;
        let (code, secondary_len): (Cow<'_, [u8]>, u32) = match &self.stored {
            Some(stored) => (Cow::Borrowed(&stored.bytes), stored.secondary_len),
            None => {
                let bytes =
                    encode_legacy_text(&self.code).ok_or_else(|| SharcError::UnencodableText {
                        name: self.name.clone(),
                        encoding: SHIFT_JIS.name(),
                    })?;
                let len = to_u32(bytes.len())?;
                (Cow::Owned(bytes), len)
            }
        };

        let start = writer.begin_sized();
        writer.write_len(name.len())?;
        writer.write_len(code.len())?;
        writer.write_u32(secondary_len);
        writer.write_bytes(&name);
        writer.write_bytes(&code);
        writer.finish_sized(start)?;
        Ok(())
    }
}
