//! ZIP archive reader.
//!
//! Parses archives held in memory, such as the ones produced by
//! [`ZipWriter`](super::ZipWriter), so they can be listed and verified.
//!
//! ## Parsing Strategy
//!
//! ZIP files are designed to be read from the end:
//! 1. Find the End of Central Directory (EOCD) at the buffer's end
//! 2. Read the Central Directory to get metadata for all files
//! 3. For extraction, read each file's Local File Header and data

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};

use anyhow::{Result, bail};

use super::crc32::crc32;
use super::structures::*;

/// Maximum ZIP comment size allowed by the format (65535 bytes).
///
/// This limits the search area when looking for EOCD with a comment.
const MAX_COMMENT_SIZE: usize = 65535;

/// ZIP parser over an in-memory archive.
///
/// ## Example
///
/// ```ignore
/// let parser = ZipParser::new(&bytes);
/// for entry in parser.list_files()? {
///     let data = parser.read_file(&entry)?;
/// }
/// ```
pub struct ZipParser<'a> {
    data: &'a [u8],
}

impl<'a> ZipParser<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Find and parse the End of Central Directory record.
    ///
    /// # Returns
    ///
    /// A tuple of (EOCD record, offset of EOCD in the buffer).
    ///
    /// # Errors
    ///
    /// Returns an error if no valid EOCD can be found, indicating
    /// the buffer is not a valid ZIP archive.
    pub fn find_eocd(&self) -> Result<(EndOfCentralDirectory, usize)> {
        let size = self.data.len();
        if size < EndOfCentralDirectory::SIZE {
            bail!("Not a valid ZIP file");
        }

        // First try the common case where there's no comment.
        let offset = size - EndOfCentralDirectory::SIZE;
        let tail = &self.data[offset..];
        if &tail[0..4] == EndOfCentralDirectory::SIGNATURE && &tail[20..22] == b"\x00\x00" {
            let eocd = EndOfCentralDirectory::from_bytes(tail)?;
            return Ok((eocd, offset));
        }

        // Search backwards; the comment length must account for every
        // remaining byte.
        let search_start = size - (MAX_COMMENT_SIZE + EndOfCentralDirectory::SIZE).min(size);
        for i in (search_start..=offset).rev() {
            if &self.data[i..i + 4] == EndOfCentralDirectory::SIGNATURE {
                let comment_len = u16::from_le_bytes([self.data[i + 20], self.data[i + 21]]) as usize;
                if comment_len == size - i - EndOfCentralDirectory::SIZE {
                    let eocd = EndOfCentralDirectory::from_bytes(&self.data[i..])?;
                    return Ok((eocd, i));
                }
            }
        }

        bail!("Not a valid ZIP file")
    }

    /// List all entries recorded in the central directory.
    pub fn list_files(&self) -> Result<Vec<ZipFileEntry>> {
        let (eocd, eocd_offset) = self.find_eocd()?;

        if eocd.disk_number != 0 || eocd.disk_with_cd != 0 {
            bail!("Multi-disk archives are not supported");
        }

        let cd_start = eocd.cd_offset as usize;
        let cd_end = cd_start + eocd.cd_size as usize;
        if cd_end > eocd_offset {
            bail!("Central Directory extends past the End of Central Directory");
        }

        let mut entries = Vec::with_capacity(eocd.total_entries as usize);
        let mut cursor = Cursor::new(&self.data[cd_start..cd_end]);

        for _ in 0..eocd.total_entries {
            entries.push(Self::parse_cdfh(&mut cursor)?);
        }

        Ok(entries)
    }

    /// Parse a Central Directory File Header from a cursor.
    fn parse_cdfh(cursor: &mut Cursor<&[u8]>) -> Result<ZipFileEntry> {
        // Read and verify the signature (PK\x01\x02)
        let mut sig = [0u8; 4];
        cursor.read_exact(&mut sig)?;
        if sig != CDFH_SIGNATURE {
            bail!("Invalid Central Directory File Header");
        }

        let _version_made_by = cursor.read_u16::<LittleEndian>()?;
        let _version_needed = cursor.read_u16::<LittleEndian>()?;
        let _flags = cursor.read_u16::<LittleEndian>()?;
        let compression_method = cursor.read_u16::<LittleEndian>()?;
        let last_mod_time = cursor.read_u16::<LittleEndian>()?;
        let last_mod_date = cursor.read_u16::<LittleEndian>()?;
        let crc32 = cursor.read_u32::<LittleEndian>()?;
        let compressed_size = cursor.read_u32::<LittleEndian>()?;
        let uncompressed_size = cursor.read_u32::<LittleEndian>()?;
        let file_name_length = cursor.read_u16::<LittleEndian>()?;
        let extra_field_length = cursor.read_u16::<LittleEndian>()?;
        let file_comment_length = cursor.read_u16::<LittleEndian>()?;
        let _disk_number_start = cursor.read_u16::<LittleEndian>()?;
        let _internal_attrs = cursor.read_u16::<LittleEndian>()?;
        let _external_attrs = cursor.read_u32::<LittleEndian>()?;
        let lfh_offset = cursor.read_u32::<LittleEndian>()?;

        let mut file_name_bytes = vec![0u8; file_name_length as usize];
        cursor.read_exact(&mut file_name_bytes)?;
        let file_name = String::from_utf8_lossy(&file_name_bytes).to_string();
        let is_directory = file_name.ends_with('/');

        // Skip extra field and comment
        cursor.set_position(
            cursor.position() + extra_field_length as u64 + file_comment_length as u64,
        );

        Ok(ZipFileEntry {
            file_name,
            compression_method: CompressionMethod::from_u16(compression_method),
            compressed_size,
            uncompressed_size,
            crc32,
            lfh_offset,
            last_mod_time,
            last_mod_date,
            is_directory,
        })
    }

    /// Offset where an entry's data begins, read from its Local File
    /// Header since the local name and extra field lengths may differ from
    /// the central directory.
    pub fn data_offset(&self, entry: &ZipFileEntry) -> Result<usize> {
        let start = entry.lfh_offset as usize;
        let Some(lfh) = self.data.get(start..start + LFH_SIZE) else {
            bail!("Local File Header out of bounds");
        };

        if &lfh[0..4] != LFH_SIGNATURE {
            bail!("Invalid Local File Header");
        }

        let mut cursor = Cursor::new(lfh);
        cursor.set_position(26); // Offset to filename length field

        let file_name_length = cursor.read_u16::<LittleEndian>()? as usize;
        let extra_field_length = cursor.read_u16::<LittleEndian>()? as usize;

        Ok(start + LFH_SIZE + file_name_length + extra_field_length)
    }

    /// Borrow a stored entry's data, verifying its CRC-32.
    pub fn read_file(&self, entry: &ZipFileEntry) -> Result<&'a [u8]> {
        if entry.compression_method != CompressionMethod::Stored {
            bail!(
                "Unsupported compression method: {} (only STORED/uncompressed is supported)",
                entry.compression_method.as_u16()
            );
        }

        let start = self.data_offset(entry)?;
        let Some(data) = self.data.get(start..start + entry.uncompressed_size as usize) else {
            bail!("Entry data for {} out of bounds", entry.file_name);
        };

        let actual = crc32(data);
        if actual != entry.crc32 {
            bail!(
                "CRC mismatch for {}: expected {:08x}, got {:08x}",
                entry.file_name,
                entry.crc32,
                actual
            );
        }

        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zip::{DosDateTime, FileEntry, build_archive_at};

    const STAMP: DosDateTime = DosDateTime {
        time: (9 << 11) | (30 << 5),
        date: (45 << 9) | (10 << 5) | 16,
    };

    fn archive(entries: &[FileEntry]) -> Vec<u8> {
        build_archive_at(entries, STAMP).unwrap().unwrap()
    }

    #[test]
    fn lists_and_reads_written_entries() {
        let bytes = archive(&[
            FileEntry::new("index.html", "<p>hi</p>"),
            FileEntry::new("styles/style.css", "p { margin: 0; }"),
        ]);
        let parser = ZipParser::new(&bytes);
        let entries = parser.list_files().unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].file_name, "index.html");
        assert_eq!(entries[1].file_name, "styles/style.css");
        assert_eq!(entries[0].lfh_offset, 0);
        assert_eq!(entries[1].mod_date(), (2025, 10, 16));
        assert_eq!(entries[1].mod_time(), (9, 30, 0));
        assert!(!entries[1].is_directory);

        assert_eq!(parser.read_file(&entries[0]).unwrap(), b"<p>hi</p>");
        assert_eq!(parser.read_file(&entries[1]).unwrap(), b"p { margin: 0; }");
    }

    #[test]
    fn finds_eocd_behind_a_comment() {
        let mut bytes = archive(&[FileEntry::new("a.js", "1")]);
        let eocd_at = bytes.len() - EndOfCentralDirectory::SIZE;
        let comment = b"built by hand";
        bytes[eocd_at + 20..eocd_at + 22].copy_from_slice(&(comment.len() as u16).to_le_bytes());
        bytes.extend_from_slice(comment);

        let parser = ZipParser::new(&bytes);
        let (eocd, offset) = parser.find_eocd().unwrap();
        assert_eq!(offset, eocd_at);
        assert_eq!(eocd.comment_len as usize, comment.len());
        assert_eq!(parser.list_files().unwrap().len(), 1);
    }

    #[test]
    fn detects_corrupted_data() {
        let mut bytes = archive(&[FileEntry::new("a.js", "alert(1)")]);
        bytes[30 + 4] ^= 0xFF;

        let parser = ZipParser::new(&bytes);
        let entries = parser.list_files().unwrap();
        let err = parser.read_file(&entries[0]).unwrap_err();
        assert!(err.to_string().contains("CRC mismatch"));
    }

    #[test]
    fn rejects_non_zip_input() {
        assert!(ZipParser::new(b"not a zip").list_files().is_err());
        assert!(ZipParser::new(&[0u8; 64]).list_files().is_err());
    }
}
