use serde::Serialize;
use std::path::Path;
use tracing::{debug, warn};

use crate::aggregate::{aggregate, AggregateResult};
use crate::table::Table;

/// Column whose cells may encode a function/tool call. Matched case-sensitively.
pub const FUNCTION_LIST_COLUMN: &str = "functionList";

/// Structural summary of one CSV file.
///
/// On load failure the counts are zero, `columns` is empty, `error` holds the
/// message and `function_list` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsvSummary {
    pub filename: String,
    pub row_count: usize,
    pub column_count: usize,
    pub columns: Vec<String>,
    pub has_function_list: bool,
    /// Present only when `has_function_list` is true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_list: Option<AggregateResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CsvSummary {
    pub fn from_error(filename: String, error: String) -> Self {
        Self {
            filename,
            row_count: 0,
            column_count: 0,
            columns: Vec::new(),
            has_function_list: false,
            function_list: None,
            error: Some(error),
        }
    }

    pub fn from_table(filename: String, table: &Table) -> Self {
        let function_list = table.column(FUNCTION_LIST_COLUMN).map(aggregate);
        Self {
            filename,
            row_count: table.row_count(),
            column_count: table.column_count(),
            columns: table.columns().to_vec(),
            has_function_list: function_list.is_some(),
            function_list,
            error: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn unique_function_names(&self) -> Option<Vec<&str>> {
        self.function_list.as_ref().map(AggregateResult::unique_names)
    }

    pub fn unique_function_count(&self) -> Option<usize> {
        self.function_list.as_ref().map(AggregateResult::unique_count)
    }

    pub fn normal_qa_count(&self) -> Option<usize> {
        self.function_list.as_ref().map(|fl| fl.normal_qa_count)
    }
}

/// Summarize one CSV file. Never fails: load errors become an error summary.
pub fn summarize_csv(path: &Path) -> CsvSummary {
    let filename = path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());

    match Table::from_path(path) {
        Ok(table) => {
            let summary = CsvSummary::from_table(filename, &table);
            debug!(
                "{}: {} rows, {} columns, function list: {}",
                summary.filename, summary.row_count, summary.column_count, summary.has_function_list
            );
            summary
        }
        Err(err) => {
            warn!("Failed to load {}: {}", path.display(), err);
            CsvSummary::from_error(filename, err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(content: &str) -> Table {
        Table::from_reader(content.as_bytes()).unwrap()
    }

    #[test]
    fn test_without_function_list_column() {
        let summary = CsvSummary::from_table("plain.csv".to_string(), &table("q,a\nhi,yo\n"));
        assert!(!summary.has_function_list);
        assert!(summary.function_list.is_none());
        assert_eq!(summary.normal_qa_count(), None);
        assert_eq!(summary.unique_function_names(), None);
        assert_eq!(summary.row_count, 1);
        assert_eq!(summary.columns, vec!["q", "a"]);
    }

    #[test]
    fn test_column_match_is_case_sensitive() {
        let summary =
            CsvSummary::from_table("x.csv".to_string(), &table("functionlist\n\"[{\"\"name\"\":\"\"f\"\"}]\"\n"));
        assert!(!summary.has_function_list);
    }

    #[test]
    fn test_three_row_mix() {
        let content = "id,functionList\n\
                       1,\"{\"\"function\"\": {\"\"name\"\": \"\"f\"\"}}\"\n\
                       2,not json at all {{\n\
                       3,\n";
        let summary = CsvSummary::from_table("mix.csv".to_string(), &table(content));
        assert_eq!(summary.row_count, 3);
        assert!(summary.has_function_list);
        assert_eq!(summary.normal_qa_count(), Some(1));
        assert_eq!(summary.unique_function_names(), Some(vec!["f"]));
        let fl = summary.function_list.unwrap();
        assert_eq!(fl.total_calls(), 1);
        assert_eq!(fl.processed_rows(), 2);
    }

    #[test]
    fn test_error_summary_shape() {
        let summary = CsvSummary::from_error("bad.csv".to_string(), "boom".to_string());
        assert!(summary.is_error());
        assert_eq!(summary.row_count, 0);
        assert_eq!(summary.column_count, 0);
        assert!(summary.columns.is_empty());
        assert!(summary.function_list.is_none());
        assert!(!summary.has_function_list);
    }

    #[test]
    fn test_error_summary_omits_function_fields_when_serialized() {
        let summary = CsvSummary::from_error("bad.csv".to_string(), "boom".to_string());
        let value = serde_json::to_value(&summary).unwrap();
        assert!(value.get("function_list").is_none());
        assert_eq!(value["error"], "boom");
    }
}
