use serde_json::{json, Value};

use crate::services::app::log_sink::LogCrateSink;
use crate::services::extractor::{run_extraction, ExtractRequest};
use crate::services::images::TargetFormat;
use crate::types::errors::CommandResult;

pub const NODE_ID: &str = "PD_excel_image";

/// Extract images from every workbook in `input_directory`.
/// Returns `{ "status_text": ... }`; run failures are reported in the text.
pub fn extract_images(mut args: Value) -> CommandResult<Value> {
    // Parsed apart from the request so `" PNG "` is accepted like on the CLI.
    let image_format = match args.as_object_mut().and_then(|m| m.remove("image_format")) {
        Some(Value::String(raw)) => raw.parse::<TargetFormat>()?,
        Some(other) => serde_json::from_value(other)?,
        None => TargetFormat::Auto,
    };

    let request = ExtractRequest {
        image_format,
        ..serde_json::from_value::<ExtractRequest>(args)?
    };
    let status_text = run_extraction(&request, &LogCrateSink::default());
    Ok(json!({ "status_text": status_text }))
}

#[cfg(test)]
#[path = "tests/extract_cmds_tests.rs"]
mod tests;
