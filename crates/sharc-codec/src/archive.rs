//! Archive assembly.
//!
//! # Structure
//!
//! | Part        | Description                                        |
//! |-------------|----------------------------------------------------|
//! | Header      | Magic, version, file size, endianness tag, name    |
//! | Programs    | Record list of [`ShaderProgram`]                   |
//! | Sources     | Record list of [`ShaderSource`]                    |
//! | Unknown     | v10 only, optional record list of opaque records   |
//!
//! The file size in the header is written as 0 and patched once the whole
//! buffer is known.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SharcError};
use crate::field::{FieldReader, FieldWriter, to_u32};
use crate::header::{FILE_SIZE_OFFSET, Header};
use crate::list::RecordList;
use crate::record::{OpaqueRecord, ShaderProgram, ShaderSource};
use crate::types::{DecodeOptions, SchemaVersion};
use crate::validate::{CrossReferenceWarning, Severity, validate_archive};

/// A decoded or newly built shader archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Archive {
    pub header: Header,
    pub programs: RecordList<ShaderProgram>,
    pub sources: RecordList<ShaderSource>,
    /// Trailing list of v10 archives, kept verbatim.
    pub unknown: Option<RecordList<OpaqueRecord>>,
}

/// Result of a successful decode.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub archive: Archive,
    /// Cross-reference diagnostics (v11 only).
    pub warnings: Vec<CrossReferenceWarning>,
}

impl Decoded {
    /// Whether any diagnostic has warning severity.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| w.severity() == Severity::Warning)
    }
}

impl Archive {
    /// Empty archive in little endian byte order.
    pub fn new(name: impl Into<String>, version: SchemaVersion) -> Self {
        Self {
            header: Header::new(name, version),
            programs: RecordList::new(),
            sources: RecordList::new(),
            unknown: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.header.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.header.name = name.into();
    }

    #[must_use]
    pub fn version(&self) -> SchemaVersion {
        self.header.version
    }

    /// First program with the given name.
    #[must_use]
    pub fn program(&self, name: &str) -> Option<&ShaderProgram> {
        self.programs.iter().find(|p| p.name == name)
    }

    pub fn program_mut(&mut self, name: &str) -> Option<&mut ShaderProgram> {
        self.programs.iter_mut().find(|p| p.name == name)
    }

    /// Position of the first source with the given name, usable as a stage index.
    #[must_use]
    pub fn source_index(&self, name: &str) -> Option<usize> {
        self.sources.position(|s| s.name == name)
    }

    #[must_use]
    pub fn source(&self, name: &str) -> Option<&ShaderSource> {
        self.source_index(name).and_then(|i| self.sources.get(i))
    }

    /// Append an empty program laid out for this archive's version.
    pub fn new_program(&mut self, name: impl Into<String>) -> &mut ShaderProgram {
        self.programs
            .push(ShaderProgram::new(name, self.header.version));
        let last = self.programs.len() - 1;
        &mut self.programs[last]
    }

    /// Encode this archive.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        encode(self)
    }
}

/// Decode an archive with default options.
pub fn decode(data: &[u8]) -> Result<Decoded> {
    decode_with_options(data, &DecodeOptions::default())
}

/// Decode an archive.
pub fn decode_with_options(data: &[u8], options: &DecodeOptions) -> Result<Decoded> {
    let mut reader = FieldReader::new(data, options.byte_order);
    let header = Header::decode(&mut reader, options.byte_order)?;
    let ctx = header.context();

    if header.file_size as usize != data.len() {
        tracing::warn!(
            declared = header.file_size,
            actual = data.len(),
            "Declared file size does not match buffer length"
        );
    }

    let programs = RecordList::decode(&mut reader, &ctx)?;
    let sources = RecordList::decode(&mut reader, &ctx)?;
    let unknown = if header.version.has_unknown_list() && reader.remaining() > 0 {
        Some(RecordList::decode(&mut reader, &ctx)?)
    } else {
        None
    };

    tracing::debug!(
        archive = %header.name,
        programs = programs.len(),
        sources = sources.len(),
        unknown = unknown.as_ref().map_or(0, RecordList::len),
        "Decoded archive"
    );

    let archive = Archive {
        header,
        programs,
        sources,
        unknown,
    };

    let warnings = if options.validate {
        validate_archive(&archive)?
    } else {
        Vec::new()
    };

    let decoded = Decoded { archive, warnings };
    if options.strict && decoded.has_warnings() {
        return Err(SharcError::Validation(decoded.warnings));
    }
    Ok(decoded)
}

/// Encode an archive.
pub fn encode(archive: &Archive) -> Result<Vec<u8>> {
    let ctx = archive.header.context();
    if archive.unknown.is_some() && !ctx.version.has_unknown_list() {
        return Err(SharcError::invariant(
            format!("archive '{}'", archive.header.name),
            format!("{} archives carry no unknown list", ctx.version),
        ));
    }

    let mut writer = FieldWriter::new(ctx.byte_order);
    archive.header.encode(&mut writer)?;
    archive.programs.encode(&mut writer, &ctx)?;
    archive.sources.encode(&mut writer, &ctx)?;
    if let Some(unknown) = &archive.unknown {
        unknown.encode(&mut writer, &ctx)?;
    }

    let total = to_u32(writer.len())?;
    writer.patch_u32(FILE_SIZE_OFFSET, total)?;

    tracing::debug!(archive = %archive.header.name, bytes = total, "Encoded archive");
    Ok(writer.into_bytes())
}
