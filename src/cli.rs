//! Command-line interface definitions and parsing
//!
//! This module defines the CLI structure for relic-preview using the `clap`
//! crate.
//!
//! # Commands
//!
//! - **classify**: Classify a file and print a summary or the full JSON preview
//! - **tree**: Print the file tree of an archive
//! - **extract**: Write one archive entry to stdout
//! - **resolve**: Resolve a content type (or a file name) through the registry
//! - **types**: List the registry
//! - **stylesheet**: Print the CSS for highlighted markup
//! - **config**: Show, locate or initialise the settings file
//!
//! # Examples
//!
//! ```
//! use clap::Parser;
//! use relic_preview::cli::{Cli, Commands};
//!
//! let cli = Cli::parse_from(["relic-preview", "classify", "notes.txt", "--json"]);
//! assert!(matches!(cli.command, Commands::Classify { json: true, .. }));
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Settings file subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Print the effective settings as TOML
    Show,

    /// Print the settings file location
    Path,

    /// Write the default settings file
    Init {
        /// Overwrite an existing file
        #[arg(short = 'f', long = "force")]
        force: bool,
    },
}

/// Main CLI structure for parsing command-line arguments
#[derive(Parser, Debug)]
#[command(name = "relic-preview")]
#[command(about = "Classify relic content and extract previews", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Suppress informational output (only print results)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Log debug output to stderr
    #[arg(short = 'v', long = "verbose", global = true, conflicts_with = "quiet")]
    pub verbose: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Classify a file and show its preview
    #[command(visible_alias = "c")]
    Classify {
        /// File to classify
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Declared content type (sniffed from content when omitted)
        #[arg(short = 't', long = "type", value_name = "MIME")]
        content_type: Option<String>,

        /// Derive the declared content type from the file extension
        #[arg(short = 'e', long = "by-extension", conflicts_with = "content_type")]
        by_extension: bool,

        /// Language hint, e.g. `python` or `diff`
        #[arg(short = 'l', long = "hint", value_name = "SYNTAX")]
        hint: Option<String>,

        /// Password for encrypted PDFs
        #[arg(long = "password")]
        password: Option<String>,

        /// Print the full preview as JSON
        #[arg(long = "json")]
        json: bool,
    },

    /// Print the file tree of an archive
    Tree {
        /// Archive file
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Declared archive type (sniffed from content when omitted)
        #[arg(short = 't', long = "type", value_name = "MIME")]
        content_type: Option<String>,
    },

    /// Write one archive entry to stdout
    #[command(visible_alias = "x")]
    Extract {
        /// Archive file
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Path of the entry inside the archive
        #[arg(value_name = "ENTRY")]
        entry: String,

        /// Declared archive type (sniffed from content when omitted)
        #[arg(short = 't', long = "type", value_name = "MIME")]
        content_type: Option<String>,
    },

    /// Resolve a content type through the registry
    Resolve {
        /// Content type, or a file name with --path
        #[arg(value_name = "INPUT")]
        input: String,

        /// Treat INPUT as a file name
        #[arg(short = 'p', long = "path")]
        path: bool,
    },

    /// List the registry
    #[command(visible_alias = "ls")]
    Types {
        /// Only list one category (code, text, markdown, html, csv, image, pdf, archive, excalidraw)
        #[arg(short = 'c', long = "category")]
        category: Option<String>,
    },

    /// Print the CSS for highlighted markup
    Stylesheet {
        /// Theme name (configured theme when omitted)
        #[arg(long = "theme")]
        theme: Option<String>,
    },

    /// Manage the settings file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

impl Cli {
    /// Parse command line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_classify_with_options() {
        let cli = Cli::parse_from([
            "relic-preview",
            "classify",
            "a.bin",
            "-t",
            "application/zip",
            "--hint",
            "python",
            "--json",
        ]);
        assert_eq!(
            cli.command,
            Commands::Classify {
                path: PathBuf::from("a.bin"),
                content_type: Some("application/zip".into()),
                by_extension: false,
                hint: Some("python".into()),
                password: None,
                json: true,
            }
        );
    }

    #[test]
    fn test_type_and_by_extension_conflict() {
        let result = Cli::try_parse_from(["relic-preview", "classify", "a", "-t", "x", "-e"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_extract() {
        let cli = Cli::parse_from(["relic-preview", "x", "bundle.zip", "src/main.py"]);
        let Commands::Extract { path, entry, content_type } = cli.command else {
            panic!("Expected Extract command");
        };
        assert_eq!(path, PathBuf::from("bundle.zip"));
        assert_eq!(entry, "src/main.py");
        assert_eq!(content_type, None);
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["relic-preview", "types", "-q"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);

        let cli = Cli::parse_from(["relic-preview", "-v", "resolve", "--path", "x.tar.gz"]);
        assert!(cli.verbose);
        assert_eq!(
            cli.command,
            Commands::Resolve {
                input: "x.tar.gz".into(),
                path: true
            }
        );
    }

    #[test]
    fn test_quiet_and_verbose_conflict() {
        assert!(Cli::try_parse_from(["relic-preview", "-q", "-v", "types"]).is_err());
    }

    #[test]
    fn test_config_subcommands() {
        let cli = Cli::parse_from(["relic-preview", "config", "init", "--force"]);
        assert_eq!(
            cli.command,
            Commands::Config {
                command: ConfigCommands::Init { force: true }
            }
        );
    }
}
