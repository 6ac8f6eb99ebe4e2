use glob::Pattern;
use std::io;
use std::path::{Path, PathBuf};
use tracing::error;
use walkdir::{DirEntry, WalkDir};

/// Collect every `.csv` file under `root_paths`, skipping paths that match
/// one of the glob `ignore_globs`. The result is sorted so batch imports
/// run in a stable order.
pub fn find_csv_files(root_paths: &[String], ignore_globs: &[String]) -> io::Result<Vec<PathBuf>> {
    let ignore_patterns: Vec<Pattern> = ignore_globs
        .iter()
        .filter_map(|glob| match Pattern::new(glob) {
            Ok(p) => Some(p),
            Err(e) => {
                error!("Invalid glob pattern '{}': {}", glob, e);
                None
            }
        })
        .collect();

    let mut files = Vec::new();
    for root in root_paths {
        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| !is_ignored(entry.path(), &ignore_patterns));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    if err.io_error().map(|e| e.kind()) == Some(io::ErrorKind::PermissionDenied) {
                        error!("Access denied: {}", err);
                        continue;
                    }
                    return Err(io::Error::new(
                        io::ErrorKind::Other,
                        format!("Error walking {}: {}", root, err),
                    ));
                }
            };
            if is_csv(&entry) {
                files.push(entry.into_path());
            }
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn is_ignored(path: &Path, ignore_patterns: &[Pattern]) -> bool {
    ignore_patterns.iter().any(|pattern| pattern.matches_path(path))
}

fn is_csv(entry: &DirEntry) -> bool {
    entry.file_type().is_file()
        && entry
            .path()
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false)
}
