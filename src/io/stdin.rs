use super::{SourceReader, decode_source};
use anyhow::{Result, bail};
use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::Mutex;

/// Name given to documents read from standard input.
pub const PASTED_NAME: &str = "pasted-code.html";

/// Reader for a pasted document on standard input.
///
/// Only input that starts with `<` (after whitespace) is accepted.
pub struct StdinReader<R = tokio::io::Stdin> {
    input: Mutex<R>,
}

impl StdinReader {
    pub fn new() -> Self {
        Self::from_reader(tokio::io::stdin())
    }
}

impl Default for StdinReader {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> StdinReader<R> {
    pub fn from_reader(input: R) -> Self {
        Self {
            input: Mutex::new(input),
        }
    }
}

#[async_trait]
impl<R: AsyncRead + Unpin + Send> SourceReader for StdinReader<R> {
    async fn read_to_string(&self) -> Result<String> {
        let mut bytes = Vec::new();
        self.input.lock().await.read_to_end(&mut bytes).await?;
        let text = decode_source(&bytes);

        if !text.trim_start().starts_with('<') {
            bail!("standard input does not look like HTML");
        }
        Ok(text)
    }

    fn file_name(&self) -> &str {
        PASTED_NAME
    }
}
