//! File tree reconstruction from flat archive member paths

use serde::Serialize;

use super::types::EntryKind;
use super::ArchiveEntry;

/// A node in the reconstructed archive tree
///
/// Directories always carry `children` (possibly empty); files never do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileTreeNode {
    /// Name of this level only
    pub name: String,
    /// `/`-join of ancestor names down to this node
    pub path: String,
    pub kind: EntryKind,
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FileTreeNode>>,
}

impl FileTreeNode {
    /// The synthetic root, with empty name and path
    #[must_use]
    pub fn root() -> Self {
        Self::directory("", "")
    }

    fn directory(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            kind: EntryKind::Directory,
            size: 0,
            content_type: None,
            language_hint: None,
            children: Some(Vec::new()),
        }
    }

    fn file(name: &str, path: &str, entry: &ArchiveEntry) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            kind: EntryKind::File,
            size: entry.size,
            content_type: Some(entry.content_type.clone()),
            language_hint: Some(entry.language_hint.clone()),
            children: None,
        }
    }

    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Children of a directory; empty for files
    #[must_use]
    pub fn children(&self) -> &[FileTreeNode] {
        self.children.as_deref().unwrap_or_default()
    }

    /// Find a descendant by its `/`-separated path
    #[must_use]
    pub fn find(&self, path: &str) -> Option<&FileTreeNode> {
        let mut current = self;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current = current.children().iter().find(|c| c.name == segment)?;
        }
        Some(current)
    }

    /// Number of directory nodes below this one
    #[must_use]
    pub fn count_directories(&self) -> usize {
        self.children()
            .iter()
            .filter(|c| c.is_directory())
            .map(|c| 1 + c.count_directories())
            .sum()
    }

    /// Get or create the child directory `name`
    fn ensure_directory(&mut self, name: &str, path: &str) -> &mut Self {
        let children = self.children.get_or_insert_with(Vec::new);
        let index = match children
            .iter()
            .position(|c| c.is_directory() && c.name == name)
        {
            Some(index) => index,
            None => {
                children.push(Self::directory(name, path));
                children.len() - 1
            }
        };
        &mut children[index]
    }

    fn sort_recursive(&mut self) {
        if let Some(children) = self.children.as_mut() {
            children.sort_by(|a, b| {
                a.kind
                    .sort_rank()
                    .cmp(&b.kind.sort_rank())
                    .then_with(|| a.name.cmp(&b.name))
            });
            for child in children {
                child.sort_recursive();
            }
        }
    }
}

/// Fold a flat entry list into a single rooted tree
///
/// Intermediate directories are created for every non-final segment.
/// Siblings are sorted once the whole tree is built: directories first,
/// then by name (byte-wise, so case-sensitive).
#[must_use]
pub fn build_file_tree(entries: &[ArchiveEntry]) -> FileTreeNode {
    let mut root = FileTreeNode::root();

    for entry in entries {
        let segments: Vec<&str> = entry.path.split('/').filter(|s| !s.is_empty()).collect();
        let Some((last, parents)) = segments.split_last() else {
            continue;
        };

        let mut current = &mut root;
        for (depth, segment) in parents.iter().enumerate() {
            let path = segments[..=depth].join("/");
            current = current.ensure_directory(segment, &path);
        }

        let path = segments.join("/");
        match entry.kind {
            EntryKind::Directory => {
                current.ensure_directory(last, &path);
            }
            EntryKind::File => {
                let children = current.children.get_or_insert_with(Vec::new);
                if !children.iter().any(|c| c.name == *last && !c.is_directory()) {
                    children.push(FileTreeNode::file(last, &path, entry));
                }
            }
        }
    }

    root.sort_recursive();
    root
}
