//! Type registry
//!
//! A static, ordered table mapping syntax identifiers to labels, MIME types,
//! extensions and categories, plus the pure lookup functions built on it.
//!
//! Resolution of a declared content type is a stack of heuristics applied in
//! a fixed order (see [`Registry::resolve`]). The order is load-bearing: some
//! inputs match more than one rule and downstream dispatch depends on which
//! rule wins first.

mod table;
mod types;

pub use table::{FILE_TYPES, UNKNOWN};
pub use types::{Category, FileTypeDefinition};

/// MIME type reported for paths whose extension is not in the table
pub const FALLBACK_MIME: &str = "application/octet-stream";

/// Handle over an immutable file type table
///
/// Cheap to copy; every lookup is pure and only reads the table.
#[derive(Debug, Clone, Copy)]
pub struct Registry {
    definitions: &'static [FileTypeDefinition],
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Registry {
    /// Registry over the built-in table
    #[must_use]
    pub const fn builtin() -> Self {
        Self {
            definitions: FILE_TYPES,
        }
    }

    /// Registry over a custom table
    ///
    /// Fallback rules that name a syntax (`text`, `pdf`, `image`, `csv`,
    /// `archive`) degrade to the unknown sentinel if the table lacks it.
    #[must_use]
    pub const fn new(definitions: &'static [FileTypeDefinition]) -> Self {
        Self { definitions }
    }

    /// All definitions in lookup order
    #[must_use]
    pub const fn definitions(&self) -> &'static [FileTypeDefinition] {
        self.definitions
    }

    /// Resolve a declared content type to a definition
    ///
    /// Never fails. Rules, first match wins, on the lowercased input:
    ///
    /// 1. absent input resolves to `text`
    /// 2. exact MIME match
    /// 3. input starts with a definition's MIME (handles `; charset=...`)
    /// 4. substrings `pdf`, `image`, `csv`, then `zip`/`archive`/`tar`/`gzip`
    /// 5. input ends with `.` + any extension of a definition
    /// 6. input contains a syntax id longer than two characters
    /// 7. input contains `text`
    /// 8. the unknown sentinel
    ///
    /// # Examples
    /// ```
    /// # use relic_preview::registry::{Category, Registry};
    /// let registry = Registry::builtin();
    /// assert_eq!(registry.resolve(Some("text/x-python; charset=utf-8")).syntax, "python");
    /// assert_eq!(registry.resolve(Some("application/x-gzip")).category, Category::Archive);
    /// assert_eq!(registry.resolve(None).syntax, "text");
    /// ```
    #[must_use]
    pub fn resolve(&self, content_type: Option<&str>) -> &'static FileTypeDefinition {
        let Some(raw) = content_type else {
            return self.by_syntax_or_unknown("text");
        };
        let input = raw.trim().to_lowercase();

        if let Some(def) = self.definitions.iter().find(|d| d.mime == input) {
            return def;
        }

        if let Some(def) = self.definitions.iter().find(|d| input.starts_with(d.mime)) {
            return def;
        }

        if input.contains("pdf") {
            return self.by_syntax_or_unknown("pdf");
        }
        if input.contains("image") {
            return self.by_syntax_or_unknown("image");
        }
        if input.contains("csv") {
            return self.by_syntax_or_unknown("csv");
        }
        if ["zip", "archive", "tar", "gzip"]
            .iter()
            .any(|needle| input.contains(needle))
        {
            return self.by_syntax_or_unknown("archive");
        }

        if let Some(def) = self.definitions.iter().find(|d| {
            d.extensions.iter().any(|ext| {
                input.len() > ext.len()
                    && input.ends_with(&ext.to_lowercase())
                    && input.as_bytes()[input.len() - ext.len() - 1] == b'.'
            })
        }) {
            return def;
        }

        if let Some(def) = self
            .definitions
            .iter()
            .find(|d| d.syntax.len() > 2 && input.contains(d.syntax))
        {
            return def;
        }

        if input.contains("text") {
            return self.by_syntax_or_unknown("text");
        }

        &UNKNOWN
    }

    /// Definition with the given syntax id
    #[must_use]
    pub fn definition_for_syntax(&self, syntax: &str) -> Option<&'static FileTypeDefinition> {
        self.definitions
            .iter()
            .find(|d| d.syntax.eq_ignore_ascii_case(syntax))
    }

    /// First definition listing `ext` (leading dot optional, any case)
    #[must_use]
    pub fn definition_for_extension(&self, ext: &str) -> Option<&'static FileTypeDefinition> {
        let ext = ext.strip_prefix('.').unwrap_or(ext);
        if ext.is_empty() {
            return None;
        }
        self.definitions.iter().find(|d| d.has_extension(ext))
    }

    /// Definition for a file path, by extension
    ///
    /// The two-segment suffix (`tar.gz`, `cmake.in`) is tried before the
    /// final segment so a compound extension is never shadowed by its tail.
    /// Names without a dot (`Makefile`, `Dockerfile`) are looked up whole.
    #[must_use]
    pub fn definition_for_path(&self, path: &str) -> Option<&'static FileTypeDefinition> {
        let name = path
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_lowercase();
        if name.is_empty() {
            return None;
        }

        // Compound suffixes ("tar.gz") win over the last segment, but only
        // behind a stem: a bare "tar.gz" is a file named "tar" with a gz suffix.
        let segments: Vec<&str> = name.split('.').collect();
        if segments.len() >= 3 {
            let compound = segments[segments.len() - 2..].join(".");
            if let Some(def) = self.definition_for_extension(&compound) {
                return Some(def);
            }
        }
        match segments.as_slice() {
            [whole] => self.definition_for_extension(whole),
            // dotfiles like ".gitignore"
            ["", ext] => self.definition_for_extension(ext),
            [.., last] => self.definition_for_extension(last),
            [] => None,
        }
    }

    /// MIME type for a file path, `application/octet-stream` when unknown
    ///
    /// # Examples
    /// ```
    /// # use relic_preview::registry::Registry;
    /// let registry = Registry::builtin();
    /// assert_eq!(registry.resolve_content_type_for_path("src/main.py"), "text/x-python");
    /// assert_eq!(registry.resolve_content_type_for_path("blob.bin"), "application/octet-stream");
    /// ```
    #[must_use]
    pub fn resolve_content_type_for_path(&self, path: &str) -> &'static str {
        let Some(def) = self.definition_for_path(path) else {
            return FALLBACK_MIME;
        };
        let name = path.rsplit('/').next().unwrap_or_default().to_lowercase();
        let concrete = match def.category {
            // the generic image entry only carries the "image/" prefix
            Category::Image if def.mime.ends_with('/') => {
                concrete_image_mime(name.rsplit('.').next().unwrap_or_default())
            }
            // one entry covers every container; members need the real one
            Category::Archive => concrete_archive_mime(&name),
            _ => None,
        };
        concrete.unwrap_or(def.mime)
    }

    /// Syntax id for a file path, if its extension is known
    #[must_use]
    pub fn language_hint_for_path(&self, path: &str) -> Option<&'static str> {
        self.definition_for_path(path).map(|def| def.syntax)
    }

    /// Whether a content type should be treated as source code
    #[must_use]
    pub fn is_code_type(&self, content_type: Option<&str>) -> bool {
        let def = self.resolve(content_type);
        if def.category == Category::Code {
            return true;
        }
        content_type
            .map(str::to_lowercase)
            .is_some_and(|ct| ct.contains("script") || ct.contains("source"))
    }

    /// Whether a content type denotes binary (non-editable) content
    #[must_use]
    pub fn is_binary_type(&self, content_type: Option<&str>) -> bool {
        self.resolve(content_type).category.is_binary()
    }

    /// Definitions belonging to a category, in table order
    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &'static FileTypeDefinition> {
        self.definitions
            .iter()
            .filter(move |d| d.category == category)
    }

    fn by_syntax_or_unknown(&self, syntax: &str) -> &'static FileTypeDefinition {
        self.definition_for_syntax(syntax).unwrap_or(&UNKNOWN)
    }
}

fn concrete_image_mime(ext: &str) -> Option<&'static str> {
    let mime = match ext {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        "tif" | "tiff" => "image/tiff",
        _ => return None,
    };
    Some(mime)
}

fn concrete_archive_mime(name: &str) -> Option<&'static str> {
    const SUFFIXES: &[(&str, &str)] = &[
        (".tar.gz", "application/gzip"),
        (".tgz", "application/gzip"),
        (".gz", "application/gzip"),
        (".tar.bz2", "application/x-bzip2"),
        (".tbz2", "application/x-bzip2"),
        (".bz2", "application/x-bzip2"),
        (".tar.xz", "application/x-xz"),
        (".txz", "application/x-xz"),
        (".xz", "application/x-xz"),
        (".tar", "application/x-tar"),
        (".7z", "application/x-7z-compressed"),
        (".rar", "application/vnd.rar"),
        (".zip", "application/zip"),
    ];
    SUFFIXES
        .iter()
        .find(|(suffix, _)| name.ends_with(suffix))
        .map(|(_, mime)| *mime)
}

/// Resolve a declared content type against the built-in table
#[must_use]
pub fn resolve(content_type: Option<&str>) -> &'static FileTypeDefinition {
    Registry::builtin().resolve(content_type)
}

/// MIME type for an archive member or uploaded file path, using the built-in table
#[must_use]
pub fn resolve_content_type_for_path(path: &str) -> &'static str {
    Registry::builtin().resolve_content_type_for_path(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        Registry::builtin()
    }

    #[test]
    fn test_absent_type_resolves_to_text() {
        assert_eq!(registry().resolve(None).syntax, "text");
    }

    #[test]
    fn test_exact_mime_match() {
        assert_eq!(registry().resolve(Some("text/x-rust")).syntax, "rust");
        assert_eq!(registry().resolve(Some("TEXT/X-RUST")).syntax, "rust");
        assert_eq!(registry().resolve(Some("text/x-diff")).syntax, "diff");
    }

    #[test]
    fn test_prefix_match_with_parameters() {
        let def = registry().resolve(Some("application/json; charset=utf-8"));
        assert_eq!(def.syntax, "json");
        assert_eq!(registry().resolve(Some("image/png")).syntax, "image");
    }

    #[test]
    fn test_every_canonical_mime_round_trips() {
        let reg = registry();
        for def in reg.definitions() {
            let resolved = reg.resolve(Some(def.mime));
            assert!(
                def.mime.starts_with(resolved.mime),
                "{} resolved to {}",
                def.mime,
                resolved.mime
            );
        }
    }

    #[test]
    fn test_special_case_substrings() {
        let reg = registry();
        assert_eq!(reg.resolve(Some("application/x-pdf-ish")).syntax, "pdf");
        assert_eq!(reg.resolve(Some("application/vnd.image-thing")).syntax, "image");
        assert_eq!(reg.resolve(Some("application/vnd.ms-csv")).syntax, "csv");
        assert_eq!(reg.resolve(Some("application/x-tar")).syntax, "archive");
        assert_eq!(reg.resolve(Some("application/gzip")).syntax, "archive");
        assert_eq!(reg.resolve(Some("application/x-7z-archive")).syntax, "archive");
    }

    #[test]
    fn test_extension_match_uses_full_extension_list() {
        let reg = registry();
        assert_eq!(reg.resolve(Some("notes.pyw")).syntax, "python");
        assert_eq!(reg.resolve(Some("component.tsx")).syntax, "typescript");
    }

    #[test]
    fn test_loose_syntax_substring_requires_three_chars() {
        let reg = registry();
        assert_eq!(reg.resolve(Some("application/x-kotlin-script")).syntax, "kotlin");
        // "go" and "r" are too short to match loosely
        assert_eq!(reg.resolve(Some("application/x-go-r")).syntax, "auto");
    }

    #[test]
    fn test_text_fallback_and_unknown() {
        let reg = registry();
        assert_eq!(reg.resolve(Some("application/x-texty")).syntax, "text");
        let unknown = reg.resolve(Some("application/x-something-odd"));
        assert_eq!(unknown.category, Category::Unknown);
        assert!(unknown.extensions.is_empty());
    }

    #[test]
    fn test_compound_extension_before_tail() {
        let reg = registry();
        let def = reg.definition_for_path("backup/site.tar.gz").unwrap();
        assert_eq!(def.syntax, "archive");
        assert_eq!(
            reg.definition_for_path("CMakeLists.cmake.in").unwrap().syntax,
            "cmake"
        );
        // no stem, so only the tail segment is looked up
        assert_eq!(reg.definition_for_path("tar.gz").unwrap().syntax, "archive");
        assert_eq!(reg.resolve_content_type_for_path("tar.gz"), "application/gzip");
    }

    #[test]
    fn test_resolve_content_type_for_path() {
        let reg = registry();
        assert_eq!(reg.resolve_content_type_for_path("a/b/c.txt"), "text/plain");
        assert_eq!(reg.resolve_content_type_for_path("readme.md"), "text/markdown");
        assert_eq!(reg.resolve_content_type_for_path("Makefile"), "text/x-makefile");
        assert_eq!(reg.resolve_content_type_for_path(".gitignore"), "text/x-git");
        assert_eq!(reg.resolve_content_type_for_path("data.unknownext"), FALLBACK_MIME);
        assert_eq!(reg.resolve_content_type_for_path("dir/"), FALLBACK_MIME);
    }

    #[test]
    fn test_archive_paths_get_their_container_type() {
        let reg = registry();
        assert_eq!(reg.resolve_content_type_for_path("x.tar.gz"), "application/gzip");
        assert_eq!(reg.resolve_content_type_for_path("x.TGZ"), "application/gzip");
        assert_eq!(reg.resolve_content_type_for_path("x.tar"), "application/x-tar");
        assert_eq!(reg.resolve_content_type_for_path("x.zip"), "application/zip");
        assert_eq!(reg.resolve_content_type_for_path("shot.PNG"), "image/png");
    }

    #[test]
    fn test_code_and_binary_helpers() {
        let reg = registry();
        assert!(reg.is_code_type(Some("text/x-python")));
        assert!(reg.is_code_type(Some("application/ecmascript")));
        assert!(!reg.is_code_type(Some("text/plain")));
        assert!(reg.is_binary_type(Some("application/pdf")));
        assert!(reg.is_binary_type(Some("application/x-whatever")));
        assert!(!reg.is_binary_type(Some("text/markdown")));
    }

    #[test]
    fn test_category_from_name() {
        assert_eq!(Category::from_name("Archive"), Category::Archive);
        assert_eq!(Category::from_name("nonsense"), Category::Unknown);
    }
}
