//! Console front end: argument parsing, interactive prompts and the
//! configuration banner.

use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::services::config::ExtractSettings;
use crate::services::extractor::ExtractRequest;
use crate::services::images::TargetFormat;

#[derive(Parser, Debug, Default)]
#[command(
    name = "excel-image-extractor",
    author,
    version,
    about = "Extract embedded images from .xlsx / .xlsm workbooks",
    long_about = None
)]
pub struct CliArgs {
    /// Directory containing the workbooks. Prompted for when omitted.
    pub input: Option<PathBuf>,

    /// Output directory (default: `{input}/image-{YYYYMMDD}`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Prefix for generated file names
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// auto, png, jpg, jpeg, bmp or gif
    #[arg(short, long)]
    pub format: Option<TargetFormat>,

    /// Leave the workbook name out of generated file names
    #[arg(long)]
    pub no_filename: bool,

    /// JSON settings file providing defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write the effective settings to this JSON file before running
    #[arg(long, value_name = "FILE")]
    pub save_config: Option<PathBuf>,
}

impl CliArgs {
    /// Without an input directory the CLI asks for every parameter.
    pub fn is_interactive(&self) -> bool {
        self.input.is_none()
    }
}

/// Ask for each parameter in turn. Blank answers keep the current value.
pub fn prompt_settings<R: BufRead, W: Write>(
    settings: &mut ExtractSettings,
    input: &mut R,
    out: &mut W,
) -> io::Result<()> {
    let current_input = settings
        .input_directory
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    let answer = ask(input, out, "Input directory", &current_input)?;
    if !answer.is_empty() {
        settings.input_directory = Some(PathBuf::from(answer));
    }

    let current_output = settings
        .output_directory
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "auto".to_string());
    let answer = ask(input, out, "Output directory", &current_output)?;
    if !answer.is_empty() {
        settings.output_directory = Some(PathBuf::from(answer));
    }

    let answer = ask(input, out, "File name prefix", &settings.filename_prefix)?;
    if !answer.is_empty() {
        settings.filename_prefix = answer;
    }

    let choices = TargetFormat::ALL.map(|f| f.as_str()).join("/");
    let label = format!("Image format ({choices})");
    let answer = ask(input, out, &label, settings.image_format.as_str())?;
    if !answer.is_empty() {
        match answer.parse::<TargetFormat>() {
            Ok(format) => settings.image_format = format,
            Err(e) => writeln!(out, "{e}; keeping {}", settings.image_format)?,
        }
    }

    let current = if settings.include_filename { "y" } else { "n" };
    let answer = ask(input, out, "Include workbook name in file names (y/n)", current)?;
    match answer.to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" | "1" => settings.include_filename = true,
        "n" | "no" | "false" | "0" => settings.include_filename = false,
        _ => {}
    }

    Ok(())
}

fn ask<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
    current: &str,
) -> io::Result<String> {
    if current.is_empty() {
        write!(out, "{label}: ")?;
    } else {
        write!(out, "{label} [{current}]: ")?;
    }
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Summary printed before a run starts.
pub fn render_banner(request: &ExtractRequest) -> String {
    let output = match request.explicit_output_dir() {
        Some(dir) => dir.display().to_string(),
        None => format!("{} (auto)", request.resolved_output_dir().display()),
    };

    let rule = "=".repeat(50);
    [
        rule.clone(),
        "Excel image extractor".to_string(),
        rule.clone(),
        format!("Input directory:  {}", request.input_directory.display()),
        format!("Output directory: {output}"),
        format!("File name prefix: {}", request.filename_prefix),
        format!("Image format:     {}", request.image_format),
        format!(
            "Include filename: {}",
            if request.include_filename { "yes" } else { "no" }
        ),
        rule,
    ]
    .join("\n")
}

#[cfg(test)]
#[path = "tests/cli_tests.rs"]
mod tests;
