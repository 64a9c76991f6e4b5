//! Output formatting for CLI display
//!
//! This module provides the coloured renderings used by the commands:
//! preview summaries, archive trees, diff file lists and registry rows.

use crate::archive::{EntryKind, FileTreeNode};
use crate::diff::DiffFile;
use crate::preview::ProcessedPreview;
use crate::registry::FileTypeDefinition;
use crate::units::format_size;
use colored::Colorize;

/// One-line summary of a preview, prefixed with its coloured kind
#[must_use]
pub fn preview_summary(preview: &ProcessedPreview, quiet: bool) -> String {
    if quiet {
        preview.kind().to_string()
    } else {
        let summary = preview.to_string();
        match summary.split_once(':') {
            Some((head, rest)) => format!("{}:{rest}", head.cyan().bold()),
            None => summary,
        }
    }
}

/// Render a file tree, one indented line per node below the root
#[must_use]
pub fn tree_lines(root: &FileTreeNode, quiet: bool) -> Vec<String> {
    let mut lines = Vec::new();
    for child in root.children() {
        push_node(child, 0, quiet, &mut lines);
    }
    lines
}

fn push_node(node: &FileTreeNode, depth: usize, quiet: bool, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    let line = match (node.kind, quiet) {
        (EntryKind::Directory, true) => format!("{}/", node.path),
        (EntryKind::File, true) => node.path.clone(),
        (EntryKind::Directory, false) => format!("{indent}{}", format!("{}/", node.name).blue().bold()),
        (EntryKind::File, false) => format!(
            "{indent}{} {}",
            node.name,
            format!("({})", format_size(node.size)).dimmed()
        ),
    };
    lines.push(line);
    for child in node.children() {
        push_node(child, depth + 1, quiet, lines);
    }
}

/// Format a diff file with its change counts
#[must_use]
pub fn diff_file_line(file: &DiffFile, quiet: bool) -> String {
    if quiet {
        file.display_name.clone()
    } else {
        format!(
            "  {} {} {}",
            file.display_name,
            format!("+{}", file.additions()).green(),
            format!("-{}", file.deletions()).red()
        )
    }
}

/// Format a registry definition as a table row
#[must_use]
pub fn definition_row(def: &FileTypeDefinition, quiet: bool) -> String {
    if quiet {
        def.syntax.to_string()
    } else {
        let extensions = if def.extensions.is_empty() {
            "-".to_string()
        } else {
            def.extensions.join(", ")
        };
        format!(
            "  {:<16} {:<40} {:<11} {}",
            def.syntax.bold(),
            def.mime,
            def.category.to_string().yellow(),
            extensions.dimmed()
        )
    }
}
