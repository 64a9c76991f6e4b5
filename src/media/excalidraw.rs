//! Excalidraw drawings

use serde::Serialize;
use serde_json::Value;

/// MIME type of Excalidraw scene files
pub const EXCALIDRAW_MIME: &str = "application/vnd.excalidraw+json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExcalidrawMetadata {
    pub element_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Drawing preview payload; `data` is the parsed scene
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExcalidrawPreview {
    pub data: Value,
    pub metadata: ExcalidrawMetadata,
}

/// Cheap check for the scene marker near the start of `text`
#[must_use]
pub fn looks_like_excalidraw(text: &str) -> bool {
    let trimmed = text.trim_start();
    if !trimmed.starts_with('{') {
        return false;
    }
    let head: String = trimmed.chars().take(512).collect();
    let compact: String = head.chars().filter(|c| !c.is_whitespace()).collect();
    compact.contains(r#""type":"excalidraw""#)
}

/// Parse a scene
///
/// # Errors
/// Returns the JSON error if `text` is not a JSON document.
pub fn process_excalidraw(text: &str) -> Result<ExcalidrawPreview, serde_json::Error> {
    let data: Value = serde_json::from_str(text)?;
    let metadata = ExcalidrawMetadata {
        element_count: data
            .get("elements")
            .and_then(Value::as_array)
            .map_or(0, Vec::len),
        version: data.get("version").and_then(Value::as_u64),
        source: data
            .get("source")
            .and_then(Value::as_str)
            .map(str::to_string),
    };
    Ok(ExcalidrawPreview { data, metadata })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r#"{
  "type": "excalidraw",
  "version": 2,
  "source": "https://excalidraw.com",
  "elements": [{"id": "a", "type": "rectangle"}, {"id": "b", "type": "arrow"}],
  "appState": {}
}"#;

    #[test]
    fn test_scene_metadata() {
        let preview = process_excalidraw(SCENE).unwrap();
        assert_eq!(preview.metadata.element_count, 2);
        assert_eq!(preview.metadata.version, Some(2));
        assert_eq!(preview.metadata.source.as_deref(), Some("https://excalidraw.com"));
        assert_eq!(preview.data["elements"][1]["type"], "arrow");
    }

    #[test]
    fn test_missing_fields_default() {
        let preview = process_excalidraw("{}").unwrap();
        assert_eq!(preview.metadata.element_count, 0);
        assert_eq!(preview.metadata.version, None);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(process_excalidraw("{ \"type\": \"excalidraw\", ").is_err());
    }

    #[test]
    fn test_sniffing() {
        assert!(looks_like_excalidraw(SCENE));
        assert!(!looks_like_excalidraw(r#"{"type": "other"}"#));
        assert!(!looks_like_excalidraw("type: excalidraw"));
    }
}
