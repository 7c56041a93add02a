//! # htmlsplit
//!
//! Split a single-file HTML page into a page, a stylesheet and a script.
//!
//! Inline `<style>` blocks are dedented and joined into one stylesheet,
//! non-empty inline `<script>` blocks into one script, and the page is
//! rewritten to reference both. The three outputs can be written as loose
//! files or packaged into a stored (uncompressed) ZIP archive built by a
//! small in-crate writer.
//!
//! ## Example
//!
//! ```
//! use htmlsplit::{SplitOptions, build_archive, bundle, extract};
//!
//! let options = SplitOptions::default();
//! let page = extract("<style>p { color: red; }</style><p>hi</p>", &options);
//! assert_eq!(page.css, "p { color: red; }");
//! assert!(page.html.contains(r#"<link rel="stylesheet" href="styles/style.css">"#));
//!
//! let archive = build_archive(&bundle::entries(&page, &options)).unwrap();
//! assert!(archive.is_some());
//! ```

pub mod bundle;
pub mod cli;
pub mod config;
pub mod html;
pub mod io;
pub mod logging;
pub mod zip;

pub use bundle::ArtifactKind;
pub use cli::Cli;
pub use config::SplitOptions;
pub use html::{Extraction, extract};
pub use io::{FileSink, LocalFileReader, OverwritePolicy, SourceReader, StdinReader};
pub use zip::{ArchiveError, FileEntry, ZipParser, build_archive};
