//! Archive writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::archive::{Archive, encode};
use crate::error::Result;

/// Shader archive writer.
pub struct SharcWriter<W: Write> {
    writer: BufWriter<W>,
}

impl<W: Write> SharcWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
        }
    }

    /// Encode the archive and write it out.
    ///
    /// Nothing is written when encoding fails.
    pub fn write_archive(mut self, archive: &Archive) -> Result<()> {
        let bytes = encode(archive)?;
        self.writer.write_all(&bytes)?;
        self.writer.flush()?;
        Ok(())
    }
}

impl SharcWriter<File> {
    /// Create an archive file for writing.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(file))
    }
}

/// Encode an archive and write it to `path`.
///
/// The archive is fully encoded before the file is created.
pub fn write_sharc(path: &Path, archive: &Archive) -> Result<()> {
    let bytes = encode(archive)?;
    let mut file = BufWriter::new(File::create(path)?);
    file.write_all(&bytes)?;
    file.flush()?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Wrote archive");
    Ok(())
}
