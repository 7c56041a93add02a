use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

/// What to do when an output file already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwritePolicy {
    /// Skip and suggest `-o`
    #[default]
    Ask,
    /// Skip silently (`-n`)
    Never,
    /// Replace the file (`-o`)
    Always,
}

/// Result of a single write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written(PathBuf),
    Skipped { path: PathBuf, policy: OverwritePolicy },
}

/// Writes output files below a root directory
pub struct FileSink {
    root: PathBuf,
    policy: OverwritePolicy,
}

impl FileSink {
    pub fn new(root: impl Into<PathBuf>, policy: OverwritePolicy) -> Self {
        Self {
            root: root.into(),
            policy,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `data` to `relative` below the root, creating parent
    /// directories as needed.
    pub async fn write(&self, relative: &str, data: &[u8]) -> Result<WriteOutcome> {
        let output_path = self.root.join(relative);

        if fs::try_exists(&output_path).await.unwrap_or(false) && self.policy != OverwritePolicy::Always {
            warn!(path = %output_path.display(), "output exists, skipping");
            return Ok(WriteOutcome::Skipped {
                path: output_path,
                policy: self.policy,
            });
        }

        // Create parent directories if needed
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }

        let mut file = fs::File::create(&output_path)
            .await
            .with_context(|| format!("failed to create {}", output_path.display()))?;
        file.write_all(data).await?;
        file.flush().await?;

        info!(path = %output_path.display(), bytes = data.len(), "wrote file");
        Ok(WriteOutcome::Written(output_path))
    }
}
