//! relic-preview CLI application entry point
//!
//! Command-line front end for the relic classification pipeline: classify
//! files, inspect and extract archives, and query the type registry.
//!
//! # Usage
//!
//! ```bash
//! # Summary of what a file classifies as
//! relic-preview classify upload.bin
//!
//! # Full preview as JSON, with a declared type and language hint
//! relic-preview classify change.txt --type text/plain --hint diff --json
//!
//! # Archive tree and single-entry extraction
//! relic-preview tree bundle.zip
//! relic-preview extract bundle.tar.gz src/main.py
//!
//! # Registry lookups
//! relic-preview resolve "text/x-python; charset=utf-8"
//! relic-preview resolve --path archive.tar.gz
//! relic-preview types --category code
//! ```
//!
//! # Configuration
//!
//! Settings are read from `config.toml` in the user's config directory
//! (`~/.config/relic-preview/config.toml` on Linux) and can be overridden
//! with `RELIC_PREVIEW__<SECTION>__<KEY>` environment variables. Logging is
//! controlled with `RUST_LOG`; `-v` raises the default level to `debug`.

use relic_preview::{
    RelicError,
    cli::{Cli, Commands},
    commands::{self, classify::ClassifyOptions},
    config::PreviewSettings,
    preview::ContentRouter,
    registry::Registry,
};
use std::io;
use tracing_subscriber::EnvFilter;

type Result<T> = std::result::Result<T, RelicError>;

/// Install the stderr log subscriber
///
/// `RUST_LOG` wins when set; otherwise `warn`, or `debug` with `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let settings = PreviewSettings::load()?;
    let quiet = cli.quiet;

    if let Commands::Config { command } = &cli.command {
        return commands::config(&settings, command, quiet);
    }

    let registry = Registry::builtin();
    match &cli.command {
        Commands::Resolve { input, path } => {
            commands::registry::resolve(&registry, input, *path, quiet);
            Ok(())
        }
        Commands::Types { category } => commands::registry::types(&registry, category.as_deref(), quiet),
        command => {
            let router = ContentRouter::new(registry, &settings);
            match command {
                Commands::Classify {
                    path,
                    content_type,
                    by_extension,
                    hint,
                    password,
                    json,
                } => commands::classify(
                    &router,
                    path,
                    ClassifyOptions {
                        content_type: content_type.as_deref(),
                        by_extension: *by_extension,
                        hint: hint.as_deref(),
                        password: password.as_deref(),
                        json: *json,
                    },
                    quiet,
                ),
                Commands::Tree { path, content_type } => {
                    commands::archive::tree(&router, path, content_type.as_deref(), quiet)
                }
                Commands::Extract {
                    path,
                    entry,
                    content_type,
                } => commands::archive::extract(
                    &router,
                    path,
                    entry,
                    content_type.as_deref(),
                    &mut io::stdout().lock(),
                ),
                Commands::Stylesheet { theme } => {
                    commands::stylesheet(router.processor(), theme.as_deref())
                }
                Commands::Resolve { .. } | Commands::Types { .. } | Commands::Config { .. } => {
                    unreachable!()
                }
            }
        }
    }
}

fn main() {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
