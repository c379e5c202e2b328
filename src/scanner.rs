use anyhow::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub fn scan_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_skipped_dir(e.path()))
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

        if !file_name.ends_with(".go") {
            continue;
        }

        // Test files never declare generated enums
        if file_name.ends_with("_test.go") {
            continue;
        }

        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}

// Directories the go toolchain itself ignores
fn is_skipped_dir(path: &Path) -> bool {
    if !path.is_dir() {
        return false;
    }
    match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => {
            name == "vendor" || name == "testdata" || name.starts_with('.') || name.starts_with('_')
        }
        None => false,
    }
}

pub fn expand_glob(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in glob::glob(pattern)? {
        let path = entry?;
        if path.is_file()
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(".go") && !n.ends_with("_test.go"))
        {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
