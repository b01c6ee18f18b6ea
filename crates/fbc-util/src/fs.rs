use std::path::{Path, PathBuf};

/// File extensions recognised as declarative catalog documents.
pub const CATALOG_EXTENSIONS: &[&str] = &["json", "yaml", "yml"];

/// Returns true if `path` has one of the [`CATALOG_EXTENSIONS`].
pub fn is_catalog_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| CATALOG_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Collect every catalog document below `root`, sorted by path.
///
/// A plain file is returned as-is regardless of its extension. Hidden
/// entries (names starting with `.`) are skipped while walking directories.
pub fn collect_catalog_files(root: &Path) -> std::io::Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }
    let mut files = Vec::new();
    walk(root, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if hidden {
            tracing::debug!("Skipping hidden entry {}", path.display());
            continue;
        }
        if path.is_dir() {
            walk(&path, files)?;
        } else if is_catalog_file(&path) {
            files.push(path);
        }
    }
    Ok(())
}

/// Ensure the parent directory of `path` exists, creating it if needed.
pub fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            std::fs::create_dir_all(parent)
        }
        _ => Ok(()),
    }
}
