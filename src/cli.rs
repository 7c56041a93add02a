use clap::Parser;
use std::path::PathBuf;

use crate::bundle::ArtifactKind;
use crate::config::SplitOptions;
use crate::io::OverwritePolicy;

#[derive(Parser, Debug)]
#[command(name = "htmlsplit")]
#[command(version)]
#[command(about = "Split inline <style> and <script> blocks out of an HTML page", long_about = None)]
#[command(after_help = "Examples:\n  \
  htmlsplit page.html -d out           write index.html, styles/style.css, scripts/script.js into out/\n  \
  htmlsplit page.html -z               package everything as page.zip\n  \
  pbpaste | htmlsplit -p css           print the extracted CSS of a pasted page")]
pub struct Cli {
    /// HTML file to split (reads standard input when omitted or `-`)
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Write output files into DIR
    #[arg(short = 'd', value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Package the outputs as a ZIP archive instead of separate files
    #[arg(short = 'z', long = "zip")]
    pub zip: bool,

    /// Archive file name (default: <input base name>.zip)
    #[arg(long = "zip-name", value_name = "NAME", requires = "zip")]
    pub zip_name: Option<String>,

    /// Write a single artifact to stdout, no messages
    #[arg(short = 'p', long = "pipe", value_name = "KIND", conflicts_with = "zip")]
    pub pipe: Option<ArtifactKind>,

    /// Also write a self-contained preview page with CSS and JS inlined
    #[arg(long = "preview", value_name = "FILE")]
    pub preview: Option<PathBuf>,

    /// Read naming options from a TOML file
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// File name of the rewritten page
    #[arg(long = "html-name", value_name = "NAME")]
    pub html_name: Option<String>,

    /// File name of the extracted stylesheet
    #[arg(long = "css-name", value_name = "NAME")]
    pub css_name: Option<String>,

    /// File name of the extracted script
    #[arg(long = "js-name", value_name = "NAME")]
    pub js_name: Option<String>,

    /// Do not place the stylesheet under styles/ and the script under scripts/
    #[arg(long = "no-folders")]
    pub no_folders: bool,

    /// Never overwrite existing files
    #[arg(short = 'n', conflicts_with = "overwrite")]
    pub never_overwrite: bool,

    /// Overwrite files WITHOUT prompting
    #[arg(short = 'o')]
    pub overwrite: bool,

    /// List archive contents after writing and log debug details
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Quiet mode (-qq => quieter)
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,
}

impl Cli {
    /// Whether the input comes from standard input.
    pub fn is_stdin(&self) -> bool {
        self.input.as_deref().is_none_or(|p| p.as_os_str() == "-")
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet > 0 || self.pipe.is_some()
    }

    pub fn is_very_quiet(&self) -> bool {
        self.quiet > 1
    }

    pub fn overwrite_policy(&self) -> OverwritePolicy {
        if self.overwrite {
            OverwritePolicy::Always
        } else if self.never_overwrite {
            OverwritePolicy::Never
        } else {
            OverwritePolicy::Ask
        }
    }

    /// Log filter directive matching the verbosity flags.
    pub fn log_level(&self) -> &'static str {
        if self.is_very_quiet() || self.pipe.is_some() {
            "off"
        } else if self.quiet > 0 {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }

    /// Layer command-line naming flags over `options`.
    pub fn apply_to(&self, options: &mut SplitOptions) {
        if let Some(name) = &self.html_name {
            options.html_filename = name.clone();
        }
        if let Some(name) = &self.css_name {
            options.css_filename = name.clone();
        }
        if let Some(name) = &self.js_name {
            options.js_filename = name.clone();
        }
        if self.no_folders {
            options.use_folders = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("htmlsplit").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults() {
        let cli = parse(&["page.html"]);
        assert!(!cli.is_stdin());
        assert_eq!(cli.output_dir, PathBuf::from("."));
        assert_eq!(cli.overwrite_policy(), OverwritePolicy::Ask);
        assert_eq!(cli.log_level(), "warn");
        assert!(!cli.is_quiet());
    }

    #[test]
    fn stdin_input() {
        assert!(parse(&[]).is_stdin());
        assert!(parse(&["-"]).is_stdin());
    }

    #[test]
    fn flags_override_options() {
        let cli = parse(&["--css-name", "main.css", "--no-folders", "x.html"]);
        let mut options = SplitOptions::default();
        cli.apply_to(&mut options);
        assert_eq!(options.css_filename, "main.css");
        assert_eq!(options.js_filename, "script.js");
        assert!(!options.use_folders);
    }

    #[test]
    fn pipe_mode_is_quiet() {
        let cli = parse(&["-p", "js", "x.html"]);
        assert_eq!(cli.pipe, Some(ArtifactKind::Js));
        assert!(cli.is_quiet());
        assert_eq!(cli.log_level(), "off");
    }

    #[test]
    fn verbosity_levels() {
        assert_eq!(parse(&["-v", "x.html"]).log_level(), "debug");
        assert_eq!(parse(&["-q", "x.html"]).log_level(), "error");
        assert_eq!(parse(&["-qq", "x.html"]).log_level(), "off");
    }

    #[test]
    fn conflicting_flags_are_rejected() {
        let try_parse = |args: &[&str]| {
            Cli::try_parse_from(std::iter::once("htmlsplit").chain(args.iter().copied()))
        };
        assert!(try_parse(&["-n", "-o", "x.html"]).is_err());
        assert!(try_parse(&["-z", "-p", "css", "x.html"]).is_err());
        assert!(try_parse(&["--zip-name", "a.zip", "x.html"]).is_err());
    }
}
