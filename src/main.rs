//! Main entry point for the htmlsplit CLI application.
//!
//! Reads an HTML page from a file or standard input, moves its inline
//! styles and scripts into separate files and writes the result either as
//! loose files or as a single ZIP archive.

use anyhow::Result;
use clap::Parser;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use htmlsplit::bundle::{self, ArtifactKind, ArtifactStats};
use htmlsplit::html::preview::inline_assets;
use htmlsplit::io::{FileSink, LocalFileReader, SourceReader, StdinReader, WriteOutcome};
use htmlsplit::logging::init_logging;
use htmlsplit::zip::{ZipParser, build_archive};
use htmlsplit::{Cli, Extraction, OverwritePolicy, SplitOptions, extract};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level());

    let mut options = match &cli.config {
        Some(path) => SplitOptions::load(path).await?,
        None => SplitOptions::default(),
    };
    cli.apply_to(&mut options);
    debug!(?options, "resolved options");

    let source: Box<dyn SourceReader> = match &cli.input {
        Some(path) if !cli.is_stdin() => Box::new(LocalFileReader::new(path)),
        _ => Box::new(StdinReader::new()),
    };
    let text = source.read_to_string().await?;
    let extraction = extract(&text, &options);

    // Pipe mode: write one artifact to stdout and nothing else
    if let Some(kind) = cli.pipe {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(extraction.artifact(kind).as_bytes()).await?;
        stdout.flush().await?;
        return Ok(());
    }

    if !cli.is_quiet() {
        print_summary(source.file_name(), &extraction);
    }

    let sink = FileSink::new(&cli.output_dir, cli.overwrite_policy());

    if cli.zip {
        write_archive(&sink, &cli, &extraction, &options, source.file_name()).await?;
    } else {
        for kind in ArtifactKind::ALL {
            let content = extraction.artifact(kind);
            if content.is_empty() {
                debug!(%kind, "nothing extracted, not writing");
                continue;
            }
            let path = kind.path(&options);
            debug!(%kind, mime = kind.mime_type(), %path, "writing artifact");
            let outcome = sink.write(&path, content.as_bytes()).await?;
            report(&cli, &outcome, &path);
        }
    }

    if let Some(preview) = &cli.preview {
        let page = inline_assets(&extraction.html, &extraction.css, &extraction.js, &options);
        let name = preview.to_string_lossy();
        let outcome = sink.write(&name, page.as_bytes()).await?;
        report(&cli, &outcome, &name);
    }

    Ok(())
}

/// Print what was found in the page.
fn print_summary(source_name: &str, extraction: &Extraction) {
    let css = ArtifactStats::of(&extraction.css);
    let js = ArtifactStats::of(&extraction.js);

    eprintln!("Source: {source_name}");
    eprintln!("  style blocks:  {}", extraction.style_blocks);
    eprintln!("  script blocks: {}", extraction.script_blocks);
    eprintln!("  CSS: {} chars, {} lines", css.chars, css.lines);
    eprintln!("  JS:  {} chars, {} lines", js.chars, js.lines);
}

/// Build the archive and write it below the output directory.
async fn write_archive(
    sink: &FileSink,
    cli: &Cli,
    extraction: &Extraction,
    options: &SplitOptions,
    source_name: &str,
) -> Result<()> {
    let Some(archive) = build_archive(&bundle::entries(extraction, options))? else {
        warn!("all artifacts are empty, no archive written");
        return Ok(());
    };

    let name = cli
        .zip_name
        .clone()
        .unwrap_or_else(|| bundle::archive_name(source_name));
    let outcome = sink.write(&name, &archive).await?;
    report(cli, &outcome, &name);

    if cli.verbose && matches!(outcome, WriteOutcome::Written(_)) {
        list_files(&archive)?;
    }
    Ok(())
}

/// Tell the user about a written or skipped file.
fn report(cli: &Cli, outcome: &WriteOutcome, name: &str) {
    if cli.is_quiet() {
        return;
    }
    match outcome {
        WriteOutcome::Written(_) => println!("  writing: {name}"),
        WriteOutcome::Skipped {
            policy: OverwritePolicy::Never,
            ..
        } => eprintln!("Skipping: {name} (file exists)"),
        WriteOutcome::Skipped { .. } => eprintln!("Skipping: {name} (use -o to overwrite)"),
    }
}

/// Print a detailed table of the archive just written.
fn list_files(archive: &[u8]) -> Result<()> {
    let entries = ZipParser::new(archive).list_files()?;

    println!(
        "{:>10}  {:>10}  {:>5}  {:>10}  {:>5}  Name",
        "Length", "Size", "Cmpr", "Date", "Time"
    );
    println!("{}", "-".repeat(70));

    let mut total_uncompressed = 0u64;
    let mut total_compressed = 0u64;

    for entry in &entries {
        let (year, month, day) = entry.mod_date();
        let (hour, minute, _second) = entry.mod_time();

        println!(
            "{:>10}  {:>10}  {}  {:04}-{:02}-{:02}  {:02}:{:02}  {}",
            entry.uncompressed_size,
            entry.compressed_size,
            ratio(entry.compressed_size.into(), entry.uncompressed_size.into()),
            year,
            month,
            day,
            hour,
            minute,
            entry.file_name
        );

        total_uncompressed += u64::from(entry.uncompressed_size);
        total_compressed += u64::from(entry.compressed_size);
    }

    println!("{}", "-".repeat(70));
    println!(
        "{:>10}  {:>10}  {}  {:>21}  {} files",
        total_uncompressed,
        total_compressed,
        ratio(total_compressed, total_uncompressed),
        "",
        entries.len()
    );
    println!("Archive size: {}", format_size(archive.len() as u64));

    Ok(())
}

/// Space saved as a right-aligned percentage.
fn ratio(compressed: u64, uncompressed: u64) -> String {
    if uncompressed > 0 {
        format!("{:>4}%", 100 - (compressed * 100 / uncompressed))
    } else {
        "  0%".to_string()
    }
}

/// Format a byte size into a human-readable string.
///
/// ```ignore
/// assert_eq!(format_size(500), "500 bytes");
/// assert_eq!(format_size(1536), "1.50 KB");
/// ```
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
