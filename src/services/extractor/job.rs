use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::report::{RunOutcome, RunReport};
use crate::services::app::log_sink::LogSink;
use crate::services::images::{
    decode, encode, output_file_name, prepare_for_output, resolve_output_spec, TargetFormat,
};
use crate::services::package::{EmbeddedImage, SpreadsheetPackage};
use crate::services::scanner::{scan_spreadsheets, SourceFile};
use crate::types::errors::ExtractError;

pub const DEFAULT_PREFIX: &str = "img_";

/// Parameters for one extraction run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractRequest {
    pub input_directory: PathBuf,
    /// Blank or `None` derives `{input}/image-{YYYYMMDD}`.
    pub output_directory: Option<PathBuf>,
    pub filename_prefix: String,
    pub image_format: TargetFormat,
    pub include_filename: bool,
}

impl Default for ExtractRequest {
    fn default() -> Self {
        Self {
            input_directory: PathBuf::new(),
            output_directory: None,
            filename_prefix: DEFAULT_PREFIX.to_string(),
            image_format: TargetFormat::Auto,
            include_filename: true,
        }
    }
}

impl ExtractRequest {
    pub fn new(input_directory: impl Into<PathBuf>) -> Self {
        Self {
            input_directory: input_directory.into(),
            ..Self::default()
        }
    }

    /// The explicit output directory, ignoring blank values.
    pub fn explicit_output_dir(&self) -> Option<&Path> {
        self.output_directory
            .as_deref()
            .filter(|p| !p.to_string_lossy().trim().is_empty())
    }

    /// Output directory for a run started today.
    pub fn resolved_output_dir(&self) -> PathBuf {
        match self.explicit_output_dir() {
            Some(dir) => dir.to_path_buf(),
            None => derived_output_dir(&self.input_directory),
        }
    }
}

/// `{input}/image-{YYYYMMDD}` using the local date.
pub fn derived_output_dir(input_dir: &Path) -> PathBuf {
    input_dir.join(format!("image-{}", Local::now().format("%Y%m%d")))
}

/// Run one extraction and return its status text. Never fails: every error
/// ends up in the returned text or the sink.
pub fn run_extraction(request: &ExtractRequest, sink: &dyn LogSink) -> String {
    execute(request, sink).status_text()
}

/// Same as [`run_extraction`] but hands back the structured outcome.
pub fn execute(request: &ExtractRequest, sink: &dyn LogSink) -> RunOutcome {
    let input = request.input_directory.as_path();
    let mut report = RunReport::new(input);
    report.begin_scanning();

    if input.as_os_str().is_empty() || !input.exists() {
        let outcome = report.into_input_not_found();
        sink.error(&outcome.status_text());
        return outcome;
    }
    if !input.is_dir() {
        let outcome = report.into_aborted(ExtractError::NotADirectory(input.to_path_buf()).to_string());
        sink.error(&outcome.status_text());
        return outcome;
    }

    let output_dir = match request.explicit_output_dir() {
        Some(dir) => dir.to_path_buf(),
        None => {
            let dir = derived_output_dir(input);
            sink.info(&format!(
                "No output directory given, using: {}",
                dir.display()
            ));
            dir
        }
    };

    if let Err(e) = fs::create_dir_all(&output_dir) {
        let outcome = report.into_aborted(format!(
            "Cannot create output directory {}: {e}",
            output_dir.display()
        ));
        sink.error(&outcome.status_text());
        return outcome;
    }

    let files = match scan_spreadsheets(input) {
        Ok(files) => files,
        Err(ExtractError::InputNotFound(_)) => {
            let outcome = report.into_input_not_found();
            sink.error(&outcome.status_text());
            return outcome;
        }
        Err(e) => {
            let outcome = report.into_aborted(e.to_string());
            sink.error(&outcome.status_text());
            return outcome;
        }
    };

    report.begin_extracting(files.len(), &output_dir);

    if files.is_empty() {
        let outcome = report.into_outcome();
        sink.info(&outcome.status_text());
        return outcome;
    }

    sink.info(&format!("Found {} spreadsheet files", files.len()));
    sink.info(&format!("Output directory: {}", output_dir.display()));

    let mut writer = ImageWriter::new(&output_dir, request);
    for file in &files {
        extract_file(file, &mut writer, &mut report, sink);
    }

    let outcome = report.into_outcome();
    sink.info(&outcome.status_text());
    outcome
}

/// Pull every image out of one package. Failures stay inside this file.
fn extract_file(
    file: &SourceFile,
    writer: &mut ImageWriter<'_>,
    report: &mut RunReport,
    sink: &dyn LogSink,
) {
    let file_name = file.file_name();
    sink.info(&format!("Processing file: {file_name}"));

    let mut package = match SpreadsheetPackage::open(&file.path) {
        Ok(package) => package,
        Err(e) => {
            sink.error(&format!("  Cannot open '{file_name}': {e}"));
            return;
        }
    };

    let sheets = package.sheets().to_vec();
    let mut saved = 0;

    for sheet in &sheets {
        for entry in package.sheet_images(sheet) {
            let image = match entry {
                Ok(image) => image,
                Err(e) => {
                    sink.warn(&format!("  Skipping image on sheet '{}': {e}", sheet.name));
                    report.record_image_skipped();
                    continue;
                }
            };

            match writer.write(&image, &file.stem) {
                Ok(name) => {
                    saved += 1;
                    sink.info(&format!("  Saved image: {name}"));
                }
                Err(e) => {
                    sink.error(&format!(
                        "  Failed to process {} on sheet '{}': {e}",
                        image.part, sheet.name
                    ));
                    report.record_image_skipped();
                }
            }
        }
    }

    if saved > 0 {
        sink.info(&format!("  '{file_name}': extracted {saved} images"));
    } else {
        sink.info(&format!("  '{file_name}': no images found"));
    }
    report.record_file(&file_name, saved);
}

/// Names and writes output images. Owns the run-wide counter.
struct ImageWriter<'a> {
    output_dir: &'a Path,
    request: &'a ExtractRequest,
    counter: usize,
}

impl<'a> ImageWriter<'a> {
    fn new(output_dir: &'a Path, request: &'a ExtractRequest) -> Self {
        Self {
            output_dir,
            request,
            counter: 0,
        }
    }

    /// Decode, convert and save one image, returning the written file name.
    ///
    /// The counter moves once the payload decodes, so a later encode or write
    /// failure leaves a gap rather than reusing the number.
    fn write(&mut self, image: &EmbeddedImage, stem: &str) -> Result<String, ExtractError> {
        let decoded = decode(image)?;
        self.counter += 1;

        let spec = resolve_output_spec(self.request.image_format, decoded.format);
        let stem = self.request.include_filename.then_some(stem);
        let name = output_file_name(
            &self.request.filename_prefix,
            stem,
            self.counter,
            &spec.extension,
        );

        let prepared = prepare_for_output(decoded, &spec);
        let bytes = encode(&prepared, &spec)?;
        fs::write(self.output_dir.join(&name), bytes)?;
        Ok(name)
    }
}

#[cfg(test)]
#[path = "tests/job_tests.rs"]
mod tests;
