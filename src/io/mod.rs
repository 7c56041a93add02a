mod local;
mod sink;
mod stdin;

pub use local::LocalFileReader;
pub use sink::{FileSink, OverwritePolicy, WriteOutcome};
pub use stdin::{PASTED_NAME, StdinReader};

use anyhow::Result;
use async_trait::async_trait;

/// Trait for reading an HTML document from some input
#[async_trait]
pub trait SourceReader: Send + Sync {
    /// Read the whole document as text
    async fn read_to_string(&self) -> Result<String>;

    /// File name of the source, used to name the archive
    fn file_name(&self) -> &str;
}

/// Decode source bytes, replacing invalid UTF-8 and dropping a leading
/// byte order mark.
pub(crate) fn decode_source(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}
