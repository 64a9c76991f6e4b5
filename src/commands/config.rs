//! Config command - inspect and initialise the settings file

use crate::{RelicError, cli::ConfigCommands, config::PreviewSettings};

type Result<T> = std::result::Result<T, RelicError>;

/// Execute a config subcommand
///
/// # Errors
/// Returns an error if the config directory cannot be determined, the
/// settings cannot be serialised, or `init` would overwrite an existing file
/// without `--force`.
pub fn execute(settings: &PreviewSettings, command: &ConfigCommands, quiet: bool) -> Result<()> {
    match command {
        ConfigCommands::Show => print!("{}", settings.to_toml()?),
        ConfigCommands::Path => println!("{}", PreviewSettings::config_path()?.display()),
        ConfigCommands::Init { force } => {
            let path = PreviewSettings::config_path()?;
            if path.exists() && !force {
                return Err(RelicError::InvalidInput(format!(
                    "{} already exists, use --force to overwrite it",
                    path.display()
                )));
            }
            PreviewSettings::default().save_to(&path)?;
            tracing::info!(path = %path.display(), "settings file written");
            if !quiet {
                println!("Wrote default settings to {}", path.display());
            }
        }
    }
    Ok(())
}
