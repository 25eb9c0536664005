use glob::Pattern;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::error;

use crate::summary::{summarize_csv, CsvSummary};

pub const CSV_SUFFIX: &str = ".csv";

/// Compile glob ignore patterns, logging and dropping invalid ones.
pub fn compile_ignore_patterns(globs: &[String]) -> Vec<Pattern> {
    globs
        .iter()
        .filter_map(|glob| match Pattern::new(glob) {
            Ok(p) => Some(p),
            Err(e) => {
                error!("Invalid glob pattern '{}': {}", glob, e);
                None
            }
        })
        .collect()
}

/// Regular files directly inside `dir` whose name ends in `.csv` (case-sensitive),
/// sorted by file name. A missing directory yields an empty list.
pub fn list_csv_files(dir: &Path, ignore_patterns: &[Pattern]) -> io::Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_name = entry.file_name();
        let name = file_name.to_string_lossy();
        if !name.ends_with(CSV_SUFFIX) {
            continue;
        }
        if ignore_patterns.iter().any(|p| p.matches(&name)) {
            continue;
        }
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Summarize every CSV file in `dir`, in file name order.
///
/// A missing directory yields an empty list; an unreadable one is logged and also
/// yields an empty list.
pub fn scan_directory(dir: &Path) -> Vec<CsvSummary> {
    match list_csv_files(dir, &[]) {
        Ok(files) => files.iter().map(|path| summarize_csv(path)).collect(),
        Err(err) => {
            error!("Error reading directory {}: {}", dir.display(), err);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_directory_is_empty() {
        let tmp = tempdir().unwrap();
        let missing = tmp.path().join("does-not-exist");
        assert!(list_csv_files(&missing, &[]).unwrap().is_empty());
        assert!(scan_directory(&missing).is_empty());
    }

    #[test]
    fn test_lists_only_csv_files_sorted() {
        let tmp = tempdir().unwrap();
        for name in ["b.csv", "a.csv", "c.CSV", "notes.txt", "z.csv.bak"] {
            fs::write(tmp.path().join(name), "x\n1\n").unwrap();
        }
        fs::create_dir(tmp.path().join("dir.csv")).unwrap();
        fs::create_dir(tmp.path().join("nested")).unwrap();
        fs::write(tmp.path().join("nested").join("inner.csv"), "x\n").unwrap();

        let files = list_csv_files(tmp.path(), &[]).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.csv", "b.csv"]);
    }

    #[test]
    fn test_ignore_patterns() {
        let tmp = tempdir().unwrap();
        for name in ["keep.csv", "tmp_1.csv", "tmp_2.csv"] {
            fs::write(tmp.path().join(name), "x\n").unwrap();
        }
        let patterns = compile_ignore_patterns(&["tmp_*".to_string(), "[".to_string()]);
        assert_eq!(patterns.len(), 1);
        let files = list_csv_files(tmp.path(), &patterns).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("keep.csv"));
    }
}
