//! SHARC shader archive reader and writer.
//!
//! This crate decodes and encodes `SHAA` shader archives: a header followed by
//! a list of shader programs and a list of shader source files.
//!
//! # Features
//!
//! - Schema versions 10 (legacy) and 11 (current)
//! - Lossless round trip of every decoded archive, including opaque legacy
//!   records and diverging source lengths
//! - Cross-reference validation of program variations and symbols
//! - Shift_JIS shader text exposed as UTF-8
//! - Little or big endian archives
//!
//! # Example
//!
//! ```
//! use sharc_codec::{Archive, SchemaVersion, ShaderSource, ShaderStage, decode, encode};
//!
//! let mut archive = Archive::new("demo", SchemaVersion::V11);
//! archive.sources.push(ShaderSource::new("demo.vert", "void main() {}"));
//! let program = archive.new_program("demo");
//! program.set_stage_index(ShaderStage::Vertex, 0);
//!
//! let bytes = encode(&archive).unwrap();
//! let decoded = decode(&bytes).unwrap();
//! assert_eq!(decoded.archive, archive);
//! ```
//!
//! Reading from disk:
//!
//! ```no_run
//! use std::path::Path;
//! use sharc_codec::{DecodeOptions, read_sharc_with_options};
//!
//! let decoded = read_sharc_with_options(Path::new("shaders.sharc"), DecodeOptions::new().strict())
//!     .unwrap();
//! for program in &decoded.archive.programs {
//!     println!("{}", program.name);
//! }
//! ```

pub mod archive;
mod error;
pub mod field;
pub mod header;
pub mod list;
mod reader;
pub mod record;
mod types;
pub mod validate;
mod writer;

// Re-export error types
pub use error::{Result, SharcError};

// Re-export core types
pub use types::{ByteOrder, CodecContext, DecodeOptions, SchemaVersion};

// Re-export the object graph
pub use archive::{Archive, Decoded, decode, decode_with_options, encode};
pub use header::Header;
pub use list::{Record, RecordList};
pub use record::{
    OpaqueRecord, ProgramVariations, ShaderMacro, ShaderProgram, ShaderSource, ShaderStage,
    ShaderSymbol, SymbolKind, UNUSED_STAGE, VariationDeclaration, VariationDefault,
};
pub use validate::{CrossReferenceWarning, Severity, ValueCount, WarningKind};

// Re-export path helpers
pub use reader::{SharcReader, read_sharc, read_sharc_with_options};
pub use writer::{SharcWriter, write_sharc};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
