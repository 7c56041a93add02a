//! Stored-only ZIP archive writer.
//!
//! Entries are written uncompressed: each local header is followed directly
//! by the raw entry bytes, then the central directory and a single EOCD
//! record close the archive.

use std::io;

use thiserror::Error;
use tracing::debug;

use super::crc32::crc32;
use super::structures::{CompressionMethod, DosDateTime, EndOfCentralDirectory, ZipFileEntry};

/// A text file to place in an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Archive path, optionally with a single folder prefix (`styles/a.css`).
    pub path: String,
    pub content: String,
}

impl FileEntry {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Entries with blank content are left out of archives.
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// Errors raised while building an archive, mostly fixed-width field
/// overflows.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("file name too long for a ZIP header: {path} ({len} bytes)")]
    NameTooLong { path: String, len: usize },

    #[error("entry {path} is too large for a ZIP archive without Zip64 ({size} bytes)")]
    EntryTooLarge { path: String, size: usize },

    #[error("too many entries for a ZIP archive without Zip64: {0}")]
    TooManyEntries(usize),

    #[error("archive exceeds 4 GiB, Zip64 is not supported")]
    ArchiveTooLarge,

    #[error("failed to write archive record: {0}")]
    Io(#[from] io::Error),
}

/// Incremental archive builder.
///
/// Local records are appended to the output buffer as files are added; the
/// central directory is kept aside until [`ZipWriter::finish`].
pub struct ZipWriter {
    buf: Vec<u8>,
    entries: Vec<ZipFileEntry>,
    timestamp: DosDateTime,
}

impl ZipWriter {
    /// Create a writer stamping every entry with `timestamp`.
    pub fn new(timestamp: DosDateTime) -> Self {
        Self {
            buf: Vec::new(),
            entries: Vec::new(),
            timestamp,
        }
    }

    /// Append a stored entry.
    pub fn add_file(&mut self, name: &str, data: &[u8]) -> Result<(), ArchiveError> {
        if name.len() > u16::MAX as usize {
            return Err(ArchiveError::NameTooLong {
                path: name.to_string(),
                len: name.len(),
            });
        }
        let size = u32::try_from(data.len()).map_err(|_| ArchiveError::EntryTooLarge {
            path: name.to_string(),
            size: data.len(),
        })?;
        if self.entries.len() == u16::MAX as usize {
            return Err(ArchiveError::TooManyEntries(self.entries.len() + 1));
        }
        let lfh_offset = u32::try_from(self.buf.len()).map_err(|_| ArchiveError::ArchiveTooLarge)?;

        let entry = ZipFileEntry {
            file_name: name.to_string(),
            compression_method: CompressionMethod::Stored,
            compressed_size: size,
            uncompressed_size: size,
            crc32: crc32(data),
            lfh_offset,
            last_mod_time: self.timestamp.time,
            last_mod_date: self.timestamp.date,
            is_directory: false,
        };

        debug!(
            name,
            size,
            crc = format_args!("{:08x}", entry.crc32),
            offset = lfh_offset,
            "adding archive entry"
        );

        entry.write_local_header(&mut self.buf)?;
        self.buf.extend_from_slice(data);
        self.entries.push(entry);

        Ok(())
    }

    /// Number of entries added so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the central directory and EOCD, returning the archive bytes.
    pub fn finish(mut self) -> Result<Vec<u8>, ArchiveError> {
        let cd_offset = u32::try_from(self.buf.len()).map_err(|_| ArchiveError::ArchiveTooLarge)?;

        for entry in &self.entries {
            entry.write_central_header(&mut self.buf)?;
        }

        let cd_size = u32::try_from(self.buf.len() - cd_offset as usize)
            .map_err(|_| ArchiveError::ArchiveTooLarge)?;
        // add_file caps the count at u16::MAX
        let count = self.entries.len() as u16;
        let eocd = EndOfCentralDirectory::new(count, cd_size, cd_offset);
        eocd.write_to(&mut self.buf)?;

        Ok(self.buf)
    }
}

/// Build an archive from `entries`, stamped with the current local time.
///
/// Blank entries are skipped. Returns `Ok(None)` when nothing is left to
/// archive.
pub fn build_archive(entries: &[FileEntry]) -> Result<Option<Vec<u8>>, ArchiveError> {
    build_archive_at(entries, DosDateTime::now())
}

/// Same as [`build_archive`] with a fixed timestamp.
pub fn build_archive_at(
    entries: &[FileEntry],
    timestamp: DosDateTime,
) -> Result<Option<Vec<u8>>, ArchiveError> {
    let mut writer = ZipWriter::new(timestamp);
    for entry in entries.iter().filter(|e| !e.is_blank()) {
        writer.add_file(&entry.path, entry.content.as_bytes())?;
    }

    if writer.is_empty() {
        return Ok(None);
    }
    writer.finish().map(Some)
}
