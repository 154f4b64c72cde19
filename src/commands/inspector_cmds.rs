use serde_json::{json, Value};

use crate::services::inspector::{inspect_model as render_report, ModelRecord};
use crate::types::errors::{CommandError, CommandResult};

pub const NODE_ID: &str = "PD_ModelInspector";

/// Type name reported for a model given as a plain JSON object.
const PLAIN_OBJECT_TYPE: &str = "dict";

/// Pass the model through unchanged alongside its inspection report.
///
/// A model that is not a typed `ModelRecord` is inspected as a plain JSON
/// object, every key becoming an attribute.
pub fn inspect_model(mut args: Value) -> CommandResult<Value> {
    let model = args
        .get_mut("model")
        .map(Value::take)
        .ok_or_else(|| CommandError::InvalidInput("missing input 'model'".to_string()))?;

    let record = match serde_json::from_value::<ModelRecord>(model.clone()) {
        Ok(record) => record,
        Err(_) if model.is_object() => ModelRecord::from_json(PLAIN_OBJECT_TYPE, model.clone()),
        Err(e) => return Err(e.into()),
    };

    let inspection_info = render_report(&record);
    log::info!("[Inspector] {} inspected", record.class_name);
    log::debug!("{inspection_info}");

    Ok(json!({
        "model": model,
        "inspection_info": inspection_info,
    }))
}
