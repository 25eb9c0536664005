use std::path::{Component, Path, PathBuf};

/// Resolve `filename` inside `dataset_dir` for download.
///
/// The name must stay inside the directory, end in `.csv` (any case) and name an
/// existing file.
pub fn resolve_download(dataset_dir: &Path, filename: &str) -> Option<PathBuf> {
    let relative = Path::new(filename);
    if !relative
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
    {
        return None;
    }

    let has_csv_suffix = relative
        .extension()
        .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("csv"));
    if !has_csv_suffix {
        return None;
    }

    let path = dataset_dir.join(relative);
    if !path.is_file() {
        return None;
    }

    let root = dataset_dir.canonicalize().ok()?;
    let resolved = path.canonicalize().ok()?;
    resolved.starts_with(&root).then_some(resolved)
}
