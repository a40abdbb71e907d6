//! Archive reader.
//!
//! Reads a whole archive from any [`Read`] source and decodes it.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::archive::{Decoded, decode_with_options};
use crate::error::{Result, SharcError};
use crate::types::DecodeOptions;

/// Shader archive reader.
pub struct SharcReader<R: Read> {
    reader: BufReader<R>,
    options: DecodeOptions,
}

impl<R: Read> SharcReader<R> {
    /// Create a new reader with default options.
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, DecodeOptions::default())
    }

    /// Create a new reader with options.
    pub fn with_options(reader: R, options: DecodeOptions) -> Self {
        Self {
            reader: BufReader::new(reader),
            options,
        }
    }

    /// Read every remaining byte and decode them as one archive.
    pub fn read_archive(mut self) -> Result<Decoded> {
        let mut data = Vec::new();
        self.reader.read_to_end(&mut data)?;
        decode_with_options(&data, &self.options)
    }
}

impl SharcReader<File> {
    /// Open an archive file for reading.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_options(path, DecodeOptions::default())
    }

    /// Open an archive file with options.
    pub fn open_with_options(path: &Path, options: DecodeOptions) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SharcError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                SharcError::Io(e)
            }
        })?;
        tracing::debug!(path = %path.display(), "Opened archive");
        Ok(Self::with_options(file, options))
    }
}

/// Read and decode an archive file.
pub fn read_sharc(path: &Path) -> Result<Decoded> {
    SharcReader::open(path)?.read_archive()
}

/// Read and decode an archive file with options.
pub fn read_sharc_with_options(path: &Path, options: DecodeOptions) -> Result<Decoded> {
    SharcReader::open_with_options(path, options)?.read_archive()
}
