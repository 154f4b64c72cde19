//! Run bookkeeping and the status text handed back to the caller.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Lifecycle of one extraction run. Phases only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum RunPhase {
    NotStarted,
    Scanning,
    ExtractingFiles,
    Finalized,
}

/// Images saved from one successfully opened package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileTally {
    pub file_name: String,
    pub images: usize,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    InputNotFound {
        input: PathBuf,
    },
    /// The run could not get as far as scanning (input is a file, output
    /// directory could not be created).
    Aborted {
        message: String,
    },
    NoFilesFound {
        input: PathBuf,
        output_dir: PathBuf,
    },
    Completed {
        files_discovered: usize,
        files_processed: usize,
        images_extracted: usize,
        images_skipped: usize,
        per_file: Vec<FileTally>,
        output_dir: PathBuf,
    },
}

impl RunOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, RunOutcome::InputNotFound { .. } | RunOutcome::Aborted { .. })
    }

    pub fn images_extracted(&self) -> usize {
        match self {
            RunOutcome::Completed {
                images_extracted, ..
            } => *images_extracted,
            _ => 0,
        }
    }

    /// Human-readable summary returned to the caller.
    pub fn status_text(&self) -> String {
        match self {
            RunOutcome::InputNotFound { input } => {
                format!("ERROR: input directory does not exist: {}", input.display())
            }
            RunOutcome::Aborted { message } => format!("ERROR: {message}"),
            RunOutcome::NoFilesFound { input, output_dir } => format!(
                "No spreadsheet files found in: {}\nOutput directory: {}",
                input.display(),
                output_dir.display()
            ),
            RunOutcome::Completed {
                files_processed,
                images_extracted,
                images_skipped,
                output_dir,
                ..
            } => {
                let (headline, dir_label) = if *images_extracted > 0 {
                    ("Extraction complete.", "Images saved to")
                } else {
                    ("No images found.", "Output directory")
                };

                let mut text = format!(
                    "{headline}\nResults:\n  - {files_processed} files processed\n  - {images_extracted} images extracted"
                );
                if *images_skipped > 0 {
                    text.push_str(&format!("\n  - {images_skipped} images skipped"));
                }
                text.push_str(&format!("\n{dir_label}: {}", output_dir.display()));
                text
            }
        }
    }
}

/// Counters for one run, built up as files are processed and turned into a
/// [`RunOutcome`] exactly once.
#[derive(Debug)]
pub struct RunReport {
    phase: RunPhase,
    input_dir: PathBuf,
    output_dir: Option<PathBuf>,
    files_discovered: usize,
    per_file: Vec<FileTally>,
    images_skipped: usize,
}

impl RunReport {
    pub fn new(input_dir: &Path) -> Self {
        Self {
            phase: RunPhase::NotStarted,
            input_dir: input_dir.to_path_buf(),
            output_dir: None,
            files_discovered: 0,
            per_file: Vec::new(),
            images_skipped: 0,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn begin_scanning(&mut self) {
        self.advance(RunPhase::Scanning);
    }

    pub fn begin_extracting(&mut self, files_discovered: usize, output_dir: &Path) {
        self.advance(RunPhase::ExtractingFiles);
        self.files_discovered = files_discovered;
        self.output_dir = Some(output_dir.to_path_buf());
    }

    /// Record a package that opened; `images` may be zero.
    pub fn record_file(&mut self, file_name: &str, images: usize) {
        self.per_file.push(FileTally {
            file_name: file_name.to_string(),
            images,
        });
    }

    pub fn record_image_skipped(&mut self) {
        self.images_skipped += 1;
    }

    pub fn files_processed(&self) -> usize {
        self.per_file.len()
    }

    pub fn images_extracted(&self) -> usize {
        self.per_file.iter().map(|f| f.images).sum()
    }

    pub fn into_input_not_found(mut self) -> RunOutcome {
        self.advance(RunPhase::Finalized);
        RunOutcome::InputNotFound {
            input: self.input_dir,
        }
    }

    pub fn into_aborted(mut self, message: impl Into<String>) -> RunOutcome {
        self.advance(RunPhase::Finalized);
        RunOutcome::Aborted {
            message: message.into(),
        }
    }

    /// Final outcome for a run that reached the extraction phase.
    pub fn into_outcome(mut self) -> RunOutcome {
        self.advance(RunPhase::Finalized);
        let output_dir = self.output_dir.take().unwrap_or_default();

        if self.files_discovered == 0 {
            return RunOutcome::NoFilesFound {
                input: self.input_dir,
                output_dir,
            };
        }

        let images_extracted = self.images_extracted();
        RunOutcome::Completed {
            files_discovered: self.files_discovered,
            files_processed: self.per_file.len(),
            images_extracted,
            images_skipped: self.images_skipped,
            per_file: self.per_file,
            output_dir,
        }
    }

    fn advance(&mut self, next: RunPhase) {
        if next <= self.phase {
            log::warn!("[Report] Ignoring phase change {:?} -> {:?}", self.phase, next);
            return;
        }
        log::debug!("[Report] {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }
}

#[cfg(test)]
#[path = "tests/report_tests.rs"]
mod tests;
