use super::{SourceReader, decode_source};
use crate::bundle::DEFAULT_SOURCE_NAME;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Local file reader
pub struct LocalFileReader {
    path: PathBuf,
    name: String,
}

impl LocalFileReader {
    pub fn new(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| DEFAULT_SOURCE_NAME.to_string());
        Self {
            path: path.to_path_buf(),
            name,
        }
    }
}

#[async_trait]
impl SourceReader for LocalFileReader {
    async fn read_to_string(&self) -> Result<String> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        // Invalid UTF-8 is replaced rather than rejected
        Ok(decode_source(&bytes))
    }

    fn file_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_file_and_keeps_its_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("landing.html");
        std::fs::write(&path, b"<p>caf\xc3\xa9 \xff</p>").unwrap();

        let reader = LocalFileReader::new(&path);
        assert_eq!(reader.file_name(), "landing.html");
        assert_eq!(reader.read_to_string().await.unwrap(), "<p>café \u{FFFD}</p>");
    }

    #[tokio::test]
    async fn drops_byte_order_mark() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bom.html");
        std::fs::write(&path, b"\xEF\xBB\xBF<!DOCTYPE html><p>x</p>").unwrap();

        let reader = LocalFileReader::new(&path);
        assert_eq!(reader.read_to_string().await.unwrap(), "<!DOCTYPE html><p>x</p>");
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let reader = LocalFileReader::new(Path::new("/nonexistent/page.html"));
        assert!(reader.read_to_string().await.is_err());
    }
}
