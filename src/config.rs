//! Output naming options.
//!
//! Options come from three layers: built-in defaults, an optional TOML file
//! and command-line flags (see [`Cli::apply_to`](crate::Cli::apply_to)).
//!
//! ```toml
//! use_folders = false
//! html_filename = "page.html"
//! css_filename = "site.css"
//! js_filename = "site.js"
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Folder used for the stylesheet when `use_folders` is set.
pub const STYLES_DIR: &str = "styles";
/// Folder used for the script when `use_folders` is set.
pub const SCRIPTS_DIR: &str = "scripts";

/// How extracted artifacts are named and referenced.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SplitOptions {
    /// Place the stylesheet under `styles/` and the script under `scripts/`.
    pub use_folders: bool,
    pub html_filename: String,
    pub css_filename: String,
    pub js_filename: String,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            use_folders: true,
            html_filename: "index.html".to_string(),
            css_filename: "style.css".to_string(),
            js_filename: "script.js".to_string(),
        }
    }
}

impl SplitOptions {
    /// Parse options from TOML text; missing keys keep their defaults.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid options file")
    }

    /// Read options from a TOML file.
    pub async fn load(path: &Path) -> Result<Self> {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read options file: {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("in {}", path.display()))
    }

    /// `href` of the injected stylesheet link, also its archive path.
    pub fn css_path(&self) -> String {
        self.prefixed(STYLES_DIR, &self.css_filename)
    }

    /// `src` of the injected script, also its archive path.
    pub fn js_path(&self) -> String {
        self.prefixed(SCRIPTS_DIR, &self.js_filename)
    }

    /// Archive path of the rewritten page. Never prefixed.
    pub fn html_path(&self) -> String {
        self.html_filename.clone()
    }

    fn prefixed(&self, dir: &str, name: &str) -> String {
        if self.use_folders {
            format!("{dir}/{name}")
        } else {
            name.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_folders() {
        let opts = SplitOptions::default();
        assert_eq!(opts.css_path(), "styles/style.css");
        assert_eq!(opts.js_path(), "scripts/script.js");
        assert_eq!(opts.html_path(), "index.html");
    }

    #[test]
    fn flat_paths_without_folders() {
        let opts = SplitOptions {
            use_folders: false,
            ..Default::default()
        };
        assert_eq!(opts.css_path(), "style.css");
        assert_eq!(opts.js_path(), "script.js");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let opts = SplitOptions::from_toml("css_filename = \"main.css\"\n").unwrap();
        assert_eq!(opts.css_filename, "main.css");
        assert_eq!(opts.js_filename, "script.js");
        assert!(opts.use_folders);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(SplitOptions::from_toml("use_folder = false").is_err());
    }

    #[tokio::test]
    async fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("htmlsplit.toml");
        std::fs::write(&path, "use_folders = false\njs_filename = \"app.js\"\n").unwrap();

        let opts = SplitOptions::load(&path).await.unwrap();
        assert!(!opts.use_folders);
        assert_eq!(opts.js_path(), "app.js");
    }

    #[tokio::test]
    async fn missing_file_reports_path() {
        let err = SplitOptions::load(Path::new("/nonexistent/htmlsplit.toml"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/htmlsplit.toml"));
    }
}
