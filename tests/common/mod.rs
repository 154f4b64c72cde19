#![allow(dead_code)]

#[path = "../../src/test_utils.rs"]
mod fixtures;

pub use fixtures::*;

use std::fs;
use std::path::{Path, PathBuf};

/// Files directly inside `dir`, sorted by name.
pub fn list_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("read output dir")
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

/// Subdirectories directly inside `dir`.
pub fn list_dirs(dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(dir)
        .expect("read dir")
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect()
}
