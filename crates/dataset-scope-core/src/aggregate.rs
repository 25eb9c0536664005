//! Row classification and name tallying over one function-list column.

use ahash::AHashMap;
use serde::Serialize;
use tracing::debug;

use crate::extract::extract_function_names;
use crate::payload::decode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregateResult {
    /// One entry per distinct function name, sorted by name ascending.
    pub function_counts: Vec<FunctionCount>,
    /// Rows whose cell yielded at least one function name.
    pub function_call_rows: usize,
    /// Rows whose cell yielded no function names, unparseable cells included.
    pub normal_qa_count: usize,
    /// The subset of `normal_qa_count` that failed both decoders.
    pub unparseable_count: usize,
}

impl AggregateResult {
    pub fn unique_names(&self) -> Vec<&str> {
        self.function_counts.iter().map(|fc| fc.name.as_str()).collect()
    }

    pub fn unique_count(&self) -> usize {
        self.function_counts.len()
    }

    pub fn total_calls(&self) -> usize {
        self.function_counts.iter().map(|fc| fc.count).sum()
    }

    pub fn processed_rows(&self) -> usize {
        self.function_call_rows + self.normal_qa_count
    }

    pub fn count_of(&self, name: &str) -> Option<usize> {
        self.function_counts
            .binary_search_by(|fc| fc.name.as_str().cmp(name))
            .ok()
            .map(|idx| self.function_counts[idx].count)
    }
}

#[derive(Default)]
struct Tally {
    frequency: AHashMap<String, usize>,
    function_call_rows: usize,
    normal_qa_count: usize,
    unparseable_count: usize,
}

impl Tally {
    fn record(mut self, text: &str) -> Self {
        let payload = decode(text);
        let names = extract_function_names(&payload);
        if names.is_empty() {
            self.normal_qa_count += 1;
            if payload.is_unparseable() {
                self.unparseable_count += 1;
            }
        } else {
            self.function_call_rows += 1;
            for name in names {
                *self.frequency.entry(name).or_insert(0) += 1;
            }
        }
        self
    }

    fn finish(self) -> AggregateResult {
        let mut function_counts: Vec<FunctionCount> = self
            .frequency
            .into_iter()
            .map(|(name, count)| FunctionCount { name, count })
            .collect();
        function_counts.sort_unstable_by(|a, b| a.name.cmp(&b.name));

        AggregateResult {
            function_counts,
            function_call_rows: self.function_call_rows,
            normal_qa_count: self.normal_qa_count,
            unparseable_count: self.unparseable_count,
        }
    }
}

/// Classify every non-missing cell and tally extracted function names.
///
/// `None` and empty cells are dropped before decoding and count toward nothing.
pub fn aggregate<I, S>(cells: I) -> AggregateResult
where
    I: IntoIterator<Item = Option<S>>,
    S: AsRef<str>,
{
    let result = cells
        .into_iter()
        .flatten()
        .filter(|cell| !cell.as_ref().is_empty())
        .fold(Tally::default(), |tally, cell| tally.record(cell.as_ref()))
        .finish();

    debug!(
        "Aggregated {} rows: {} function-call rows, {} normal QA ({} unparseable), {} distinct names",
        result.processed_rows(),
        result.function_call_rows,
        result.normal_qa_count,
        result.unparseable_count,
        result.unique_count(),
    );

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_rows() {
        let cells = vec![
            Some(r#"{"function": {"name": "search"}}"#),
            Some("not json at all {{"),
            None,
            Some(r#"{"functions": [{"name": "search"}, {"name": "book"}]}"#),
            Some(r#"{"role": "assistant", "content": "hello"}"#),
        ];
        let result = aggregate(cells);

        assert_eq!(result.unique_names(), vec!["book", "search"]);
        assert_eq!(result.count_of("search"), Some(2));
        assert_eq!(result.count_of("book"), Some(1));
        assert_eq!(result.count_of("missing"), None);
        assert_eq!(result.total_calls(), 3);
        assert_eq!(result.function_call_rows, 2);
        assert_eq!(result.normal_qa_count, 2);
        assert_eq!(result.unparseable_count, 1);
        assert_eq!(result.processed_rows(), 4);
    }

    #[test]
    fn test_repeated_name_in_one_cell_counts_each_occurrence() {
        let cells = vec![Some(r#"[{"name": "f"}, {"function": {"name": "f"}}, {"name": "f"}]"#)];
        let result = aggregate(cells);
        assert_eq!(result.count_of("f"), Some(3));
        assert_eq!(result.function_call_rows, 1);
        assert_eq!(result.normal_qa_count, 0);
    }

    #[test]
    fn test_empty_cells_are_dropped() {
        let cells: Vec<Option<String>> = vec![None, Some(String::new()), None];
        let result = aggregate(cells);
        assert_eq!(result, AggregateResult::default());
    }

    #[test]
    fn test_names_sorted_lexicographically() {
        let cells = vec![
            Some("{'function': {'name': 'zeta'}}"),
            Some("{'function': {'name': 'Alpha'}}"),
            Some("{'function': {'name': 'beta'}}"),
            Some("{'function': {'name': 'alpha'}}"),
        ];
        let result = aggregate(cells);
        assert_eq!(result.unique_names(), vec!["Alpha", "alpha", "beta", "zeta"]);
    }

    #[test]
    fn test_deterministic_across_runs() {
        let cells = vec![
            Some(r#"{"functions": [{"name": "c"}, {"name": "a"}, {"name": "b"}]}"#),
            Some(r#"[{"name": "b"}]"#),
        ];
        let first = aggregate(cells.clone());
        let second = aggregate(cells);
        assert_eq!(first, second);
        assert_eq!(first.total_calls(), 4);
    }
}
