//! Content-based language sniffing
//!
//! A weighted pattern scorer over common languages. Each pattern adds its
//! weight once per matching occurrence, capped at three occurrences, and the
//! best-scoring language wins if it clears [`MIN_SCORE`].

use std::sync::LazyLock;

use regex::Regex;

const MIN_SCORE: u32 = 3;
const MAX_HITS: usize = 3;

struct LanguageRules {
    syntax: &'static str,
    patterns: Vec<(Regex, u32)>,
}

fn rules(syntax: &'static str, patterns: &[(&str, u32)]) -> LanguageRules {
    LanguageRules {
        syntax,
        patterns: patterns
            .iter()
            .map(|(pattern, weight)| {
                (
                    Regex::new(&format!("(?m){pattern}")).expect("Invalid regex"),
                    *weight,
                )
            })
            .collect(),
    }
}

static RULES: LazyLock<Vec<LanguageRules>> = LazyLock::new(|| {
    vec![
        rules("php", &[(r"<\?php", 6), (r"\$\w+\s*=", 1)]),
        rules(
            "python",
            &[
                (r"^\s*def \w+\(.*\)\s*(->.*)?:\s*$", 3),
                (r"^\s*from [\w.]+ import ", 3),
                (r"^\s*import \w+", 1),
                (r"^\s*class \w+(\(.*\))?:\s*$", 2),
                (r"^\s*elif ", 2),
                (r"\bself\.", 1),
                (r"\bprint\(", 1),
            ],
        ),
        rules(
            "rust",
            &[
                (r"\bfn \w+\s*[<(]", 2),
                (r"\blet mut\b", 3),
                (r"^\s*impl\b", 2),
                (r"\bpub (fn|struct|enum|mod)\b", 3),
                (r"\w+!\(", 1),
                (r"^\s*use \w+::", 2),
            ],
        ),
        rules(
            "go",
            &[
                (r"^package \w+", 3),
                (r"\bfunc (\(\w+ \*?\w+\) )?\w+\(", 2),
                (r"\w+ := ", 2),
                (r"\bfmt\.", 3),
            ],
        ),
        rules(
            "typescript",
            &[
                (r"^\s*(export )?interface \w+", 3),
                (r"\w+\??: (string|number|boolean|any|void)\b", 3),
                (r"^\s*(export )?type \w+ = ", 2),
            ],
        ),
        rules(
            "javascript",
            &[
                (r"\bfunction\s*\w*\s*\(", 2),
                (r"\b(const|let|var) \w+ = ", 1),
                (r"=>", 1),
                (r"\bconsole\.log\(", 3),
                (r"\brequire\(", 2),
                (r"\bmodule\.exports\b", 3),
            ],
        ),
        rules(
            "java",
            &[
                (r"\bpublic (static )?(final )?(class|void|interface)\b", 3),
                (r"\bSystem\.out\.", 3),
                (r"^import java\.", 4),
            ],
        ),
        rules(
            "cpp",
            &[
                (r"#include <\w+>", 2),
                (r"\bstd::", 3),
                (r"\bcout\b", 2),
            ],
        ),
        rules(
            "c",
            &[
                (r"#include <\w+\.h>", 3),
                (r"\bint main\s*\(", 2),
                (r"\bprintf\(", 2),
            ],
        ),
        rules(
            "ruby",
            &[
                (r"^\s*def \w+[^:(]*$", 2),
                (r"^\s*end\s*$", 2),
                (r"\bputs\b", 2),
                (r"^\s*require '", 2),
            ],
        ),
        rules(
            "bash",
            &[
                (r"^\s*(if \[|then$|fi$|esac$|done$)", 2),
                (r"^\s*echo ", 2),
                (r"^\s*export \w+=", 2),
                (r"\$\{\w+\}", 1),
            ],
        ),
        rules(
            "sql",
            &[
                (r"(?i)\bselect\b.+\bfrom\b", 4),
                (r"(?i)\b(insert into|create table|update \w+ set|delete from)\b", 4),
            ],
        ),
        rules(
            "html",
            &[
                (r"(?i)<!doctype html", 5),
                (r"<(html|head|body|div|span|p)\b[^>]*>", 2),
            ],
        ),
        rules(
            "css",
            &[
                (r"^\s*[.#]?[\w-]+(\s*[,>]\s*[.#]?[\w-]+)*\s*\{\s*$", 1),
                (r"^\s*[\w-]+:\s*[^;]+;\s*$", 2),
            ],
        ),
        rules(
            "markdown",
            &[
                (r"^#{1,6} \S", 2),
                (r"^```", 2),
                (r"\[[^\]]+\]\([^)]+\)", 2),
                (r"^\s*[-*] \S", 1),
            ],
        ),
        rules(
            "yaml",
            &[
                (r"^---\s*$", 2),
                (r"^[\w-]+:( .+)?$", 1),
                (r"^\s+- [\w-]+: ", 1),
            ],
        ),
    ]
});

/// Best-scoring syntax id for `text`, if any language clears the threshold
#[must_use]
pub fn score_language(text: &str) -> Option<&'static str> {
    let mut best: Option<(&'static str, u32)> = None;
    for language in RULES.iter() {
        let score: u32 = language
            .patterns
            .iter()
            .map(|(regex, weight)| {
                let hits = regex.find_iter(text).take(MAX_HITS).count();
                weight * u32::try_from(hits).unwrap_or(0)
            })
            .sum();
        if score >= MIN_SCORE && best.is_none_or(|(_, top)| score > top) {
            best = Some((language.syntax, score));
        }
    }
    best.map(|(syntax, _)| syntax)
}

/// Whether `text` is a complete JSON object or array
#[must_use]
pub fn is_json(text: &str) -> bool {
    let trimmed = text.trim_start();
    (trimmed.starts_with('{') || trimmed.starts_with('['))
        && serde_json::from_str::<serde_json::Value>(text).is_ok()
}

/// First `max_chars` characters of `text`
#[must_use]
pub fn prefix(text: &str, max_chars: usize) -> &str {
    text.char_indices()
        .nth(max_chars)
        .map_or(text, |(end, _)| &text[..end])
}
