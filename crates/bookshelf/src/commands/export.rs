use crate::commands::{CmdMessage, CmdResult};
use crate::error::{CatalogError, Result};
use crate::model::BookRecord;
use crate::query::{search, Criteria, SortKey};
use crate::store::CatalogStore;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    /// Detect format from filename extension. Anything but `.csv` is JSON.
    pub fn from_filename(filename: &str) -> Self {
        if filename.to_lowercase().ends_with(".csv") {
            ExportFormat::Csv
        } else {
            ExportFormat::Json
        }
    }

    pub fn default_filename(&self) -> &'static str {
        match self {
            ExportFormat::Json => "library-export.json",
            ExportFormat::Csv => "library-export.csv",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
        }
    }
}

/// A rendered export, ready to be saved or downloaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportDocument {
    pub format: ExportFormat,
    pub filename: String,
    pub contents: String,
    pub count: usize,
}

/// Pretty-printed JSON array, two-space indent.
pub fn to_json(records: &[BookRecord]) -> Result<String> {
    serde_json::to_string_pretty(records).map_err(CatalogError::Serialization)
}

/// CSV with a header row taken from the first record's fields.
///
/// String cells are always quoted, with embedded quotes doubled. Numbers and
/// booleans are written bare, missing or null cells are empty, and nested values are
/// written as quoted JSON. Fields that only later records have are not exported.
/// An empty list gives an empty document.
pub fn to_csv(records: &[BookRecord]) -> Result<String> {
    let rows: Vec<Value> = records
        .iter()
        .map(serde_json::to_value)
        .collect::<std::result::Result<_, _>>()
        .map_err(CatalogError::Serialization)?;

    let Some(Value::Object(first)) = rows.first() else {
        return Ok(String::new());
    };
    let headers: Vec<String> = first.keys().cloned().collect();
    let header_cells: Vec<String> = headers.iter().map(|h| render_header(h)).collect();

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .flexible(true)
        .from_writer(Vec::new());

    writer.write_record(&header_cells).map_err(csv_error)?;
    for row in &rows {
        let cells: Vec<String> = headers
            .iter()
            .map(|header| render_cell(row.get(header)))
            .collect();
        writer.write_record(&cells).map_err(csv_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CatalogError::Store(format!("CSV export failed: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| CatalogError::Store(format!("CSV export failed: {}", e)))
}

fn render_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => quote(s),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(nested) => quote(&nested.to_string()),
    }
}

/// Header names are bare unless they would break the row.
fn render_header(name: &str) -> String {
    if name.contains([',', '"', '\n', '\r']) {
        quote(name)
    } else {
        name.to_string()
    }
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn csv_error(e: csv::Error) -> CatalogError {
    CatalogError::Store(format!("CSV export failed: {}", e))
}

/// Renders the books matching `criteria`, ordered by `sort`, in `format`.
///
/// This is the same list a browse with the same criteria and sort pages over.
pub fn run<S: CatalogStore>(
    store: &S,
    criteria: &Criteria,
    sort: SortKey,
    format: ExportFormat,
) -> Result<ExportDocument> {
    let records = search(&store.snapshot(), criteria, sort);
    let contents = match format {
        ExportFormat::Json => to_json(&records)?,
        ExportFormat::Csv => to_csv(&records)?,
    };
    tracing::debug!(?format, count = records.len(), "rendered export");

    Ok(ExportDocument {
        format,
        filename: format.default_filename().to_string(),
        contents,
        count: records.len(),
    })
}

/// Writes the matching books to `path`, choosing the format from its extension.
pub fn run_to_file<S: CatalogStore>(
    store: &S,
    criteria: &Criteria,
    sort: SortKey,
    path: &Path,
) -> Result<CmdResult> {
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let document = run(store, criteria, sort, ExportFormat::from_filename(&filename))?;
    fs::write(path, &document.contents).map_err(CatalogError::Io)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Exported {} books to {}",
        document.count,
        path.display()
    )));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BookId;
    use crate::query::{Direction, SortField};
    use crate::store::fixtures::{record, StoreFixture};
    use serde_json::json;

    #[test]
    fn test_format_detection() {
        assert_eq!(ExportFormat::from_filename("books.CSV"), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_filename("books.json"), ExportFormat::Json);
        assert_eq!(ExportFormat::from_filename("books"), ExportFormat::Json);
        assert_eq!(ExportFormat::Csv.default_filename(), "library-export.csv");
    }

    #[test]
    fn test_csv_empty_list() {
        assert_eq!(to_csv(&[]).unwrap(), "");
    }

    #[test]
    fn test_csv_quoting() {
        let mut book = record(1, "The \"Song\" of God, annotated");
        book.description = Some("Line one".into());
        book.date_added = None;

        let csv = to_csv(&[book]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "id,title,author,year,language,script,category,description"
        );
        assert_eq!(
            lines[1],
            "1,\"The \"\"Song\"\" of God, annotated\",\"Vyasa\",-400,\"sanskrit\",\"devanagari\",\"Philosophy\",\"Line one\""
        );
        assert!(csv.ends_with('\n'));
        assert!(!csv.contains('\r'));
    }

    #[test]
    fn test_csv_headers_follow_first_record() {
        let mut first = record(1, "First");
        first.date_added = None;
        let mut second = record(2, "Second");
        second.isbn = Some("9780140449181".into());
        second.date_added = None;
        second.extra.insert("externalLink".into(), json!(null));

        let csv = to_csv(&[first, second]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert!(!lines[0].contains("isbn"));
        assert_eq!(lines[2].split(',').count(), 7);
    }

    #[test]
    fn test_csv_missing_cells_are_empty() {
        let mut first = record(1, "First");
        first.description = Some("Has one".into());
        first.date_added = None;
        let mut second = record(2, "Second");
        second.date_added = None;

        let csv = to_csv(&[first, second]).unwrap();
        let last = csv.lines().last().unwrap();
        assert!(last.ends_with(",\"Philosophy\","));
    }

    #[test]
    fn test_csv_text_ids_are_quoted() {
        let mut book = record(1, "T");
        book.id = BookId::from("abc");
        let csv = to_csv(&[book]).unwrap();
        assert!(csv.lines().nth(1).unwrap().starts_with("\"abc\","));
    }

    #[test]
    fn test_json_export_round_trips() {
        let fixture = StoreFixture::new().with_sample_catalog();
        let oldest_first = SortKey::new(SortField::DateAdded, Direction::Asc);
        let document = run(
            &fixture.store,
            &Criteria::default(),
            oldest_first,
            ExportFormat::Json,
        )
        .unwrap();

        assert_eq!(document.filename, "library-export.json");
        assert_eq!(document.count, 6);
        assert!(document.contents.starts_with("[\n  {\n    \"id\": 1,"));
        let parsed: Vec<BookRecord> = serde_json::from_str(&document.contents).unwrap();
        assert_eq!(parsed, fixture.store.snapshot());
    }

    #[test]
    fn test_export_follows_criteria_and_sort() {
        let fixture = StoreFixture::new().with_sample_catalog();
        let criteria = Criteria::default().with_category("Philosophy");
        let title_desc = SortKey::new(SortField::Title, Direction::Desc);

        let document = run(&fixture.store, &criteria, title_desc, ExportFormat::Json).unwrap();
        assert_eq!(document.count, 2);
        let parsed: Vec<BookRecord> = serde_json::from_str(&document.contents).unwrap();
        let titles: Vec<_> = parsed.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Yoga Sutras of Patanjali", "Bhagavad Gita"]);

        let csv = run(&fixture.store, &criteria, title_desc, ExportFormat::Csv).unwrap();
        assert_eq!(csv.contents.lines().count(), 3);
        assert!(csv.contents.lines().nth(1).unwrap().starts_with("2,"));
    }

    #[test]
    fn test_csv_header_with_separator_is_quoted() {
        let mut book = record(1, "T");
        book.extra.insert("shelf, row".into(), json!("3"));
        book.extra.insert("plain".into(), json!(1));

        let csv = to_csv(&[book]).unwrap();
        let header = csv.lines().next().unwrap();
        assert_eq!(
            header,
            "id,title,author,year,language,script,category,dateAdded,\"shelf, row\",plain"
        );
    }

    #[test]
    fn test_run_to_file_picks_format() {
        let dir = tempfile::tempdir().unwrap();
        let fixture = StoreFixture::new().with_books(&[(1, "One"), (2, "Two")]);
        let only_one = Criteria::default().with_search("one");

        let path = dir.path().join("shelf.csv");
        let result = run_to_file(&fixture.store, &only_one, SortKey::default(), &path).unwrap();
        assert!(result.messages[0].content.starts_with("Exported 1 books to"));
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("id,title,"));
        assert_eq!(written.lines().count(), 2);
    }
}
