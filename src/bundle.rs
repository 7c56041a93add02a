//! Packaging of an [`Extraction`] into named files.

use std::fmt;

use clap::ValueEnum;

use crate::config::SplitOptions;
use crate::html::Extraction;
use crate::zip::FileEntry;

/// Archive file name used when the input has no usable name.
pub const DEFAULT_SOURCE_NAME: &str = "untitled.html";

/// One of the three split outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ArtifactKind {
    Html,
    Css,
    Js,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 3] = [ArtifactKind::Html, ArtifactKind::Css, ArtifactKind::Js];

    pub fn mime_type(&self) -> &'static str {
        match self {
            ArtifactKind::Html => "text/html",
            ArtifactKind::Css => "text/css",
            ArtifactKind::Js => "application/javascript",
        }
    }

    /// Output path of this artifact under `options`.
    pub fn path(&self, options: &SplitOptions) -> String {
        match self {
            ArtifactKind::Html => options.html_path(),
            ArtifactKind::Css => options.css_path(),
            ArtifactKind::Js => options.js_path(),
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArtifactKind::Html => "HTML",
            ArtifactKind::Css => "CSS",
            ArtifactKind::Js => "JS",
        };
        f.write_str(name)
    }
}

/// Archive entries for a split page, in html, css, js order. Blank
/// artifacts are included; the archive writer drops them.
pub fn entries(extraction: &Extraction, options: &SplitOptions) -> Vec<FileEntry> {
    ArtifactKind::ALL
        .iter()
        .map(|kind| FileEntry::new(kind.path(options), extraction.artifact(*kind)))
        .collect()
}

/// `<base>.zip` for a source file name, where base is everything before
/// the last `.`. Names whose base would be empty are used whole.
///
/// An empty source name gives `untitled.zip` rather than a bare `.zip`,
/// which would be a hidden file. The CLI always has a non-empty name.
pub fn archive_name(source_name: &str) -> String {
    let base = match source_name.rfind('.') {
        Some(idx) if idx > 0 => &source_name[..idx],
        _ => source_name,
    };
    let base = if base.is_empty() {
        DEFAULT_SOURCE_NAME.trim_end_matches(".html")
    } else {
        base
    };
    format!("{base}.zip")
}

/// Size of an artifact as shown in the summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArtifactStats {
    pub chars: usize,
    pub lines: usize,
}

impl ArtifactStats {
    pub fn of(text: &str) -> Self {
        Self {
            chars: text.chars().count(),
            lines: if text.is_empty() { 0 } else { text.split('\n').count() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Extraction {
        Extraction {
            html: "<html></html>".to_string(),
            css: "a{}".to_string(),
            js: String::new(),
            style_blocks: 1,
            script_blocks: 0,
        }
    }

    #[test]
    fn entries_follow_folder_option() {
        let with = entries(&sample(), &SplitOptions::default());
        let paths: Vec<_> = with.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, ["index.html", "styles/style.css", "scripts/script.js"]);
        assert_eq!(with[1].content, "a{}");
        assert!(with[2].is_blank());

        let flat = SplitOptions {
            use_folders: false,
            ..Default::default()
        };
        let without = entries(&sample(), &flat);
        let paths: Vec<_> = without.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, ["index.html", "style.css", "script.js"]);
    }

    #[test]
    fn archive_names() {
        assert_eq!(archive_name("page.html"), "page.zip");
        assert_eq!(archive_name("my.site.htm"), "my.site.zip");
        assert_eq!(archive_name("README"), "README.zip");
        assert_eq!(archive_name(".html"), ".html.zip");
        assert_eq!(archive_name(""), "untitled.zip");
    }

    #[test]
    fn stats_count_chars_and_lines() {
        assert_eq!(ArtifactStats::of(""), ArtifactStats { chars: 0, lines: 0 });
        assert_eq!(ArtifactStats::of("a{}"), ArtifactStats { chars: 3, lines: 1 });
        assert_eq!(ArtifactStats::of("é\n\nb"), ArtifactStats { chars: 4, lines: 3 });
    }

    #[test]
    fn mime_types() {
        assert_eq!(ArtifactKind::Html.mime_type(), "text/html");
        assert_eq!(ArtifactKind::Css.mime_type(), "text/css");
        assert_eq!(ArtifactKind::Js.mime_type(), "application/javascript");
    }
}
