//! ZIP archive writing and reading.
//!
//! ## Architecture
//!
//! - `structures`: Data structures representing ZIP format elements (EOCD, file headers, etc.)
//! - `crc32`: The CRC-32 checksum stored with every entry
//! - `writer`: Builds stored (uncompressed) archives from text entries
//! - `parser`: Reads archives back for listing and verification
//!
//! ## ZIP Format Overview
//!
//! A ZIP file consists of:
//! 1. Local file headers and file data for each file
//! 2. Central Directory with metadata for all files
//! 3. End of Central Directory (EOCD) record at the end
//!
//! All integers are little-endian.
//!
//! ## Limitations
//!
//! - STORED (no compression) method only
//! - No ZIP64 extensions: names up to 65535 bytes, at most 65535 entries,
//!   archives up to 4 GiB
//! - No encryption, no multi-disk archives

mod crc32;
mod parser;
mod structures;
mod writer;

pub use crc32::{Crc32, crc32};
pub use parser::ZipParser;
pub use structures::*;
pub use writer::{ArchiveError, FileEntry, ZipWriter, build_archive, build_archive_at};
