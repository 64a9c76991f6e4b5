//! Terminal escape sequence handling
//!
//! SGR sequences (`ESC [ ... m`) become styled spans over the stripped text;
//! every other CSI or two-byte escape sequence is removed.

use serde::Serialize;

const ESC: char = '\u{1b}';

/// A terminal color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AnsiColor {
    /// One of the 16 standard colors (8-15 are the bright variants)
    Named { index: u8 },
    /// 256-color palette entry
    Indexed { index: u8 },
    Rgb { r: u8, g: u8, b: u8 },
}

/// Style in effect for a span of text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnsiStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreground: Option<AnsiColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<AnsiColor>,
    pub bold: bool,
    pub dim: bool,
    pub italic: bool,
    pub underline: bool,
}

impl AnsiStyle {
    #[must_use]
    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }

    fn apply(&mut self, params: &[u16]) {
        if params.is_empty() {
            *self = Self::default();
            return;
        }
        let mut iter = params.iter().copied();
        while let Some(code) = iter.next() {
            match code {
                0 => *self = Self::default(),
                1 => self.bold = true,
                2 => self.dim = true,
                3 => self.italic = true,
                4 => self.underline = true,
                22 => {
                    self.bold = false;
                    self.dim = false;
                }
                23 => self.italic = false,
                24 => self.underline = false,
                30..=37 => self.foreground = Some(named(code - 30)),
                90..=97 => self.foreground = Some(named(code - 90 + 8)),
                39 => self.foreground = None,
                40..=47 => self.background = Some(named(code - 40)),
                100..=107 => self.background = Some(named(code - 100 + 8)),
                49 => self.background = None,
                38 => self.foreground = extended_color(&mut iter),
                48 => self.background = extended_color(&mut iter),
                _ => {}
            }
        }
    }
}

fn named(index: u16) -> AnsiColor {
    AnsiColor::Named {
        index: u8::try_from(index).unwrap_or(0),
    }
}

fn byte(value: Option<u16>) -> u8 {
    value.and_then(|v| u8::try_from(v).ok()).unwrap_or(0)
}

/// Parse the tail of a `38;...` / `48;...` sequence
fn extended_color(iter: &mut impl Iterator<Item = u16>) -> Option<AnsiColor> {
    match iter.next()? {
        5 => Some(AnsiColor::Indexed {
            index: byte(iter.next()),
        }),
        2 => Some(AnsiColor::Rgb {
            r: byte(iter.next()),
            g: byte(iter.next()),
            b: byte(iter.next()),
        }),
        _ => None,
    }
}

/// A styled run of the stripped text, in character offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnsiSpan {
    pub start: usize,
    pub end: usize,
    pub style: AnsiStyle,
}

/// Text with escape sequences removed plus the styling they described
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnsiText {
    pub plain: String,
    /// Non-empty runs with a non-default style, in order
    pub spans: Vec<AnsiSpan>,
}

/// Whether `text` contains a CSI escape sequence
#[must_use]
pub fn has_ansi_codes(text: &str) -> bool {
    text.contains("\u{1b}[")
}

/// Strip escape sequences, recording SGR styling as spans
#[must_use]
pub fn parse_ansi(text: &str) -> AnsiText {
    let mut out = AnsiText::default();
    let mut style = AnsiStyle::default();
    let mut run_start = 0usize;
    let mut offset = 0usize;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c != ESC {
            out.plain.push(c);
            offset += 1;
            continue;
        }
        match chars.peek() {
            Some('[') => {
                chars.next();
                let mut body = String::new();
                let mut terminator = None;
                for next in chars.by_ref() {
                    if ('@'..='~').contains(&next) {
                        terminator = Some(next);
                        break;
                    }
                    body.push(next);
                }
                if terminator == Some('m') {
                    close_run(&mut out, &style, run_start, offset);
                    run_start = offset;
                    let params: Vec<u16> = body
                        .split(';')
                        .filter(|p| !p.is_empty())
                        .map(|p| p.parse().unwrap_or(0))
                        .collect();
                    style.apply(&params);
                }
            }
            // charset designation, ESC ( B
            Some('(' | ')') => {
                chars.next();
                chars.next();
            }
            Some(_) => {
                chars.next();
            }
            None => {}
        }
    }
    close_run(&mut out, &style, run_start, offset);
    out
}

fn close_run(out: &mut AnsiText, style: &AnsiStyle, start: usize, end: usize) {
    if end > start && !style.is_plain() {
        out.spans.push(AnsiSpan {
            start,
            end,
            style: *style,
        });
    }
}

/// Remove escape sequences, discarding styling
#[must_use]
pub fn strip_ansi(text: &str) -> String {
    parse_ansi(text).plain
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_has_no_spans() {
        let parsed = parse_ansi("hello world");
        assert_eq!(parsed.plain, "hello world");
        assert!(parsed.spans.is_empty());
        assert!(!has_ansi_codes("hello world"));
    }

    #[test]
    fn test_colored_span() {
        let parsed = parse_ansi("ok \u{1b}[1;32mPASS\u{1b}[0m done");
        assert_eq!(parsed.plain, "ok PASS done");
        assert_eq!(parsed.spans.len(), 1);
        let span = parsed.spans[0];
        assert_eq!((span.start, span.end), (3, 7));
        assert!(span.style.bold);
        assert_eq!(span.style.foreground, Some(AnsiColor::Named { index: 2 }));
    }

    #[test]
    fn test_extended_colors() {
        let parsed = parse_ansi("\u{1b}[38;5;208mA\u{1b}[48;2;10;20;30mB\u{1b}[m");
        assert_eq!(parsed.plain, "AB");
        assert_eq!(parsed.spans[0].style.foreground, Some(AnsiColor::Indexed { index: 208 }));
        assert_eq!(
            parsed.spans[1].style.background,
            Some(AnsiColor::Rgb { r: 10, g: 20, b: 30 })
        );
        assert_eq!(parsed.spans[1].style.foreground, Some(AnsiColor::Indexed { index: 208 }));
    }

    #[test]
    fn test_non_sgr_sequences_are_stripped() {
        assert_eq!(strip_ansi("\u{1b}[2Kclear\u{1b}[1A"), "clear");
        assert_eq!(strip_ansi("\u{1b}(Bx"), "x");
    }

    #[test]
    fn test_offsets_count_characters() {
        let parsed = parse_ansi("é\u{1b}[4mü\u{1b}[24m");
        assert_eq!(parsed.spans[0].start, 1);
        assert_eq!(parsed.spans[0].end, 2);
        assert!(parsed.spans[0].style.underline);
    }
}
