//! Input directory listing for spreadsheet packages.
//! Only the immediate children of the input directory are considered.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::services::package::PackageKind;
use crate::types::errors::ExtractError;

/// A spreadsheet package discovered in the input directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// File name without extension, used in generated image names.
    pub stem: String,
}

impl SourceFile {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// Prefix Office uses for owner/lock files next to an open workbook.
const LOCK_FILE_PREFIX: &str = "~$";

/// List `*.xlsx` / `*.xlsm` files directly inside `input_dir`, sorted by path.
pub fn scan_spreadsheets(input_dir: &Path) -> Result<Vec<SourceFile>, ExtractError> {
    if !input_dir.exists() {
        return Err(ExtractError::InputNotFound(input_dir.to_path_buf()));
    }

    if !input_dir.is_dir() {
        return Err(ExtractError::NotADirectory(input_dir.to_path_buf()));
    }

    let walker = WalkDir::new(input_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter();

    let mut files = Vec::new();

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                log::warn!("Skipping unreadable entry: {e}");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.into_path();
        if PackageKind::from_path(&path).is_none() {
            continue;
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if file_name.starts_with(LOCK_FILE_PREFIX) {
            continue;
        }

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        files.push(SourceFile { path, stem });
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

#[cfg(test)]
#[path = "tests/walker_tests.rs"]
mod tests;
