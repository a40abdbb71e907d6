//! Core types shared by every codec layer.
//!
//! This module provides the schema version, byte order and decoder options,
//! plus the context value threaded through all record decode/encode calls.

mod context;
mod options;

pub use context::CodecContext;
pub use options::{ByteOrder, DecodeOptions, SchemaVersion};
