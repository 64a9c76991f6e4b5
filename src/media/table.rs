//! Delimited table previews (CSV and TSV)

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvMetadata {
    pub columns: Vec<String>,
    /// Data rows, header excluded
    pub row_count: usize,
    pub column_count: usize,
}

/// Table preview payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvPreview {
    pub columns: Vec<String>,
    /// At most the configured number of leading data rows
    pub rows: Vec<Vec<String>>,
    pub has_more: bool,
    pub metadata: CsvMetadata,
}

/// Delimiter for a table syntax id: tab for `tsv`, comma otherwise
#[must_use]
pub fn delimiter_for(syntax: &str) -> u8 {
    if syntax.eq_ignore_ascii_case("tsv") {
        b'\t'
    } else {
        b','
    }
}

/// Parse `text` as a delimited table with a header row
///
/// Ragged rows are accepted. Only the first `preview_rows` data rows are
/// kept, but every row is counted.
///
/// # Errors
/// Returns the reader's error on malformed input, such as invalid UTF-8
/// inside a quoted field.
pub fn process_csv(text: &str, delimiter: u8, preview_rows: usize) -> Result<CsvPreview, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(text.as_bytes());

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::with_capacity(preview_rows);
    let mut row_count = 0;
    for record in reader.records() {
        let record = record?;
        if rows.len() < preview_rows {
            rows.push(record.iter().map(str::to_string).collect());
        }
        row_count += 1;
    }

    tracing::debug!(rows = row_count, columns = columns.len(), "parsed table");
    Ok(CsvPreview {
        has_more: row_count > rows.len(),
        metadata: CsvMetadata {
            column_count: columns.len(),
            columns: columns.clone(),
            row_count,
        },
        columns,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_and_rows() {
        let preview = process_csv("name,age\nada,36\nalan,41\n", b',', 10).unwrap();
        assert_eq!(preview.columns, vec!["name", "age"]);
        assert_eq!(preview.rows, vec![vec!["ada", "36"], vec!["alan", "41"]]);
        assert!(!preview.has_more);
        assert_eq!(preview.metadata.row_count, 2);
        assert_eq!(preview.metadata.column_count, 2);
    }

    #[test]
    fn test_preview_rows_are_capped() {
        let text: String = std::iter::once("n\n".to_string())
            .chain((0..25).map(|i| format!("{i}\n")))
            .collect();
        let preview = process_csv(&text, b',', 10).unwrap();
        assert_eq!(preview.rows.len(), 10);
        assert!(preview.has_more);
        assert_eq!(preview.metadata.row_count, 25);
    }

    #[test]
    fn test_tab_delimiter() {
        assert_eq!(delimiter_for("TSV"), b'\t');
        assert_eq!(delimiter_for("csv"), b',');
        let preview = process_csv("a\tb\n1\t2\n", delimiter_for("tsv"), 10).unwrap();
        assert_eq!(preview.columns, vec!["a", "b"]);
        assert_eq!(preview.rows[0], vec!["1", "2"]);
    }

    #[test]
    fn test_quoted_fields_and_ragged_rows() {
        let preview = process_csv("a,b\n\"x, y\",2\nonly\n", b',', 10).unwrap();
        assert_eq!(preview.rows[0], vec!["x, y", "2"]);
        assert_eq!(preview.rows[1], vec!["only"]);
    }

    #[test]
    fn test_empty_input() {
        let preview = process_csv("", b',', 10).unwrap();
        assert!(preview.columns.is_empty());
        assert_eq!(preview.metadata.row_count, 0);
    }
}
