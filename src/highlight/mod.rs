//! Code and text processing
//!
//! Language detection, class-based HTML highlighting and the text/code
//! preview payloads. Highlighting never fails: an unknown grammar or a
//! generator error falls back to the plain-text grammar, and if that fails
//! too the text is returned HTML-escaped.

mod ansi;
mod detect;
mod types;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

#[cfg(feature = "syntax-highlighting")]
use syntect::html::{ClassStyle, ClassedHTMLGenerator, css_for_theme_with_class_style};
#[cfg(feature = "syntax-highlighting")]
use syntect::highlighting::ThemeSet;
#[cfg(feature = "syntax-highlighting")]
use syntect::parsing::{SyntaxReference, SyntaxSet};
#[cfg(feature = "syntax-highlighting")]
use syntect::util::LinesWithEndings;

use crate::config::HighlightSettings;
use crate::registry::Registry;

pub use ansi::{has_ansi_codes, parse_ansi, strip_ansi, AnsiColor, AnsiSpan, AnsiStyle, AnsiText};
pub use detect::{is_json, score_language};
pub use types::{CodeMetadata, CodePreview, TextMetadata, TextPreview, TextStats};

/// Syntax id returned when no language could be detected
pub const PLAINTEXT: &str = "plaintext";

/// A long-running operation was aborted through its cancellation token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Operation cancelled")]
pub struct Cancelled;

#[cfg(feature = "syntax-highlighting")]
enum RenderError {
    Cancelled,
    Syntect(syntect::Error),
}

/// Escape text for inclusion in HTML
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Split ANSI styling off `text` if it carries any
fn split_ansi(text: &str) -> (String, bool, Option<Vec<AnsiSpan>>) {
    if has_ansi_codes(text) {
        let parsed = parse_ansi(text);
        (parsed.plain, true, Some(parsed.spans))
    } else {
        (text.to_string(), false, None)
    }
}

/// Detects languages and produces highlighted previews
pub struct CodeProcessor {
    registry: Registry,
    settings: HighlightSettings,
    #[cfg(feature = "syntax-highlighting")]
    syntaxes: SyntaxSet,
}

impl std::fmt::Debug for CodeProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeProcessor")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Default for CodeProcessor {
    fn default() -> Self {
        Self::new(Registry::builtin(), HighlightSettings::default())
    }
}

impl CodeProcessor {
    /// Create a processor; loads the bundled grammars once
    #[must_use]
    pub fn new(registry: Registry, settings: HighlightSettings) -> Self {
        Self {
            registry,
            settings,
            #[cfg(feature = "syntax-highlighting")]
            syntaxes: SyntaxSet::load_defaults_newlines(),
        }
    }

    #[must_use]
    pub const fn settings(&self) -> &HighlightSettings {
        &self.settings
    }

    /// Pick a syntax id for `text`
    ///
    /// The hint wins unless empty or `auto`; then the declared type, unless it
    /// resolves to `auto` or `text`; then content sniffing over a bounded
    /// prefix.
    #[must_use]
    pub fn detect_language(&self, text: &str, declared: Option<&str>, hint: Option<&str>) -> String {
        if let Some(hint) = hint
            .map(str::trim)
            .filter(|h| !h.is_empty() && !h.eq_ignore_ascii_case("auto"))
        {
            return hint.to_string();
        }

        let resolved = self.registry.resolve(declared).syntax;
        if resolved != "auto" && resolved != "text" {
            return resolved.to_string();
        }

        self.sniff_language(text)
    }

    /// Guess a syntax id from content alone, `plaintext` when nothing fits
    #[must_use]
    pub fn sniff_language(&self, text: &str) -> String {
        let head = detect::prefix(text, self.settings.sniff_prefix_chars);

        if let Some(found) = self.first_line_language(head) {
            return found;
        }
        if is_json(head) {
            return "json".to_string();
        }
        score_language(head).map_or_else(|| PLAINTEXT.to_string(), str::to_string)
    }

    #[cfg(feature = "syntax-highlighting")]
    fn first_line_language(&self, head: &str) -> Option<String> {
        let first = head.lines().next()?;
        let syntax = self.syntaxes.find_syntax_by_first_line(first)?;
        let mapped = syntax
            .file_extensions
            .iter()
            .find_map(|ext| self.registry.definition_for_extension(ext))
            .map(|def| def.syntax.to_string());
        Some(mapped.unwrap_or_else(|| syntax.name.to_lowercase()))
    }

    #[cfg(not(feature = "syntax-highlighting"))]
    fn first_line_language(&self, _head: &str) -> Option<String> {
        None
    }

    /// Highlight `text` as class-based HTML
    #[must_use]
    pub fn highlight(&self, text: &str, syntax_id: &str) -> String {
        self.highlight_cancellable(text, syntax_id, &CancellationToken::new())
            .unwrap_or_else(|_| escape_html(text))
    }

    /// Highlight `text`, checking `cancel` before every line
    ///
    /// # Errors
    /// Returns `Cancelled` if the token fires.
    pub fn highlight_cancellable(
        &self,
        text: &str,
        syntax_id: &str,
        cancel: &CancellationToken,
    ) -> Result<String, Cancelled> {
        if cancel.is_cancelled() {
            return Err(Cancelled);
        }
        if text.len() > self.settings.max_highlight_bytes {
            tracing::debug!(bytes = text.len(), "input too large to highlight, escaping");
            return Ok(escape_html(text));
        }
        self.render_markup(text, syntax_id, cancel)
    }

    #[cfg(feature = "syntax-highlighting")]
    fn find_syntax(&self, syntax_id: &str) -> Option<&SyntaxReference> {
        let id = syntax_id.trim().to_lowercase();
        if id == PLAINTEXT || id == "text" {
            return Some(self.syntaxes.find_syntax_plain_text());
        }
        self.syntaxes.find_syntax_by_token(&id).or_else(|| {
            self.registry.definition_for_syntax(&id).and_then(|def| {
                def.extensions
                    .iter()
                    .find_map(|ext| self.syntaxes.find_syntax_by_extension(ext))
            })
        })
    }

    #[cfg(feature = "syntax-highlighting")]
    fn render(
        &self,
        text: &str,
        syntax: &SyntaxReference,
        cancel: &CancellationToken,
    ) -> Result<String, RenderError> {
        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntaxes, ClassStyle::Spaced);
        for line in LinesWithEndings::from(text) {
            if cancel.is_cancelled() {
                return Err(RenderError::Cancelled);
            }
            generator
                .parse_html_for_line_which_includes_newline(line)
                .map_err(RenderError::Syntect)?;
        }
        Ok(generator.finalize())
    }

    #[cfg(feature = "syntax-highlighting")]
    fn render_markup(
        &self,
        text: &str,
        syntax_id: &str,
        cancel: &CancellationToken,
    ) -> Result<String, Cancelled> {
        let plain = self.syntaxes.find_syntax_plain_text();
        let syntax = self.find_syntax(syntax_id).unwrap_or_else(|| {
            tracing::debug!(syntax = syntax_id, "no grammar, using plain text");
            plain
        });

        match self.render(text, syntax, cancel) {
            Ok(markup) => return Ok(markup),
            Err(RenderError::Cancelled) => return Err(Cancelled),
            Err(RenderError::Syntect(err)) => {
                tracing::warn!(syntax = syntax_id, error = %err, "highlighting failed, retrying as plain text");
            }
        }

        match self.render(text, plain, cancel) {
            Ok(markup) => Ok(markup),
            Err(RenderError::Cancelled) => Err(Cancelled),
            Err(RenderError::Syntect(err)) => {
                tracing::warn!(error = %err, "plain text highlighting failed, escaping");
                Ok(escape_html(text))
            }
        }
    }

    #[cfg(not(feature = "syntax-highlighting"))]
    fn render_markup(
        &self,
        text: &str,
        _syntax_id: &str,
        _cancel: &CancellationToken,
    ) -> Result<String, Cancelled> {
        Ok(escape_html(text))
    }

    /// CSS for the class-based markup under `theme` (or the configured theme)
    #[cfg(feature = "syntax-highlighting")]
    #[must_use]
    pub fn stylesheet(&self, theme: Option<&str>) -> Option<String> {
        let name = theme.unwrap_or(&self.settings.theme);
        let themes = ThemeSet::load_defaults();
        let theme = themes.themes.get(name)?;
        match css_for_theme_with_class_style(theme, ClassStyle::Spaced) {
            Ok(css) => Some(css),
            Err(err) => {
                tracing::warn!(theme = name, error = %err, "failed to generate stylesheet");
                None
            }
        }
    }

    #[cfg(not(feature = "syntax-highlighting"))]
    #[must_use]
    pub fn stylesheet(&self, _theme: Option<&str>) -> Option<String> {
        None
    }

    /// Plain text preview with counts and ANSI decorations
    #[must_use]
    pub fn process_text(&self, text: &str) -> TextPreview {
        let (preview, has_ansi, ansi_decorations) = split_ansi(text);
        let stats = TextStats::of(&preview);
        TextPreview {
            metadata: TextMetadata {
                line_count: stats.line_count,
                char_count: stats.char_count,
                word_count: stats.word_count,
                has_ansi_codes: has_ansi,
            },
            preview,
            has_ansi_codes: has_ansi,
            ansi_decorations,
        }
    }

    /// Highlighted code preview
    #[must_use]
    pub fn process_code(&self, text: &str, language: &str) -> CodePreview {
        let (preview, has_ansi, ansi_decorations) = split_ansi(text);
        let highlighted = self.highlight(&preview, language);
        build_code_preview(preview, highlighted, language, has_ansi, ansi_decorations)
    }

    /// Highlighted code preview, aborting when `cancel` fires
    ///
    /// # Errors
    /// Returns `Cancelled` if the token fires while highlighting.
    pub fn process_code_cancellable(
        &self,
        text: &str,
        language: &str,
        cancel: &CancellationToken,
    ) -> Result<CodePreview, Cancelled> {
        let (preview, has_ansi, ansi_decorations) = split_ansi(text);
        let highlighted = self.highlight_cancellable(&preview, language, cancel)?;
        Ok(build_code_preview(preview, highlighted, language, has_ansi, ansi_decorations))
    }
}

fn build_code_preview(
    preview: String,
    highlighted: String,
    language: &str,
    has_ansi: bool,
    ansi_decorations: Option<Vec<AnsiSpan>>,
) -> CodePreview {
    let stats = TextStats::of(&preview);
    CodePreview {
        metadata: CodeMetadata {
            line_count: stats.line_count,
            char_count: stats.char_count,
            language: language.to_string(),
            has_ansi_codes: has_ansi,
        },
        preview,
        highlighted,
        language: language.to_string(),
        has_ansi_codes: has_ansi,
        ansi_decorations,
    }
}
