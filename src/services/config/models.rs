use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::CliArgs;
use crate::services::extractor::{ExtractRequest, DEFAULT_PREFIX};
use crate::services::images::TargetFormat;

/// Defaults for the console tool. Every field is optional in the JSON file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ExtractSettings {
    pub input_directory: Option<PathBuf>,
    pub output_directory: Option<PathBuf>,
    pub filename_prefix: String,
    pub image_format: TargetFormat,
    pub include_filename: bool,
}

impl Default for ExtractSettings {
    fn default() -> Self {
        Self {
            input_directory: None,
            output_directory: None,
            filename_prefix: DEFAULT_PREFIX.to_string(),
            image_format: TargetFormat::Auto,
            include_filename: true,
        }
    }
}

impl ExtractSettings {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let settings = serde_json::from_str(&contents)
            .with_context(|| format!("Invalid settings file {}", path.display()))?;
        Ok(settings)
    }

    /// Apply command-line overrides on top of file or default values.
    pub fn merge_cli(&mut self, args: &CliArgs) {
        if let Some(input) = &args.input {
            self.input_directory = Some(input.clone());
        }
        if let Some(output) = &args.output {
            self.output_directory = Some(output.clone());
        }
        if let Some(prefix) = &args.prefix {
            self.filename_prefix = prefix.clone();
        }
        if let Some(format) = args.format {
            self.image_format = format;
        }
        if args.no_filename {
            self.include_filename = false;
        }
    }

    pub fn to_request(&self) -> ExtractRequest {
        ExtractRequest {
            input_directory: self.input_directory.clone().unwrap_or_default(),
            output_directory: self.output_directory.clone(),
            filename_prefix: self.filename_prefix.clone(),
            image_format: self.image_format,
            include_filename: self.include_filename,
        }
    }
}
