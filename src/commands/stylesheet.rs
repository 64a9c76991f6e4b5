//! Stylesheet command - CSS for class-based highlighting

use crate::{RelicError, highlight::CodeProcessor};

type Result<T> = std::result::Result<T, RelicError>;

/// Print the stylesheet for `theme`, or the configured theme
///
/// # Errors
/// Returns `InvalidInput` if the theme is unknown or highlighting support is
/// not compiled in.
pub fn execute(processor: &CodeProcessor, theme: Option<&str>) -> Result<()> {
    let css = processor.stylesheet(theme).ok_or_else(|| {
        RelicError::InvalidInput(format!(
            "No stylesheet for theme '{}'",
            theme.unwrap_or(&processor.settings().theme)
        ))
    })?;
    print!("{css}");
    Ok(())
}
