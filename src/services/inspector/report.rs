use super::model::{AttributeValue, Inspectable};

/// Attributes looked up by name regardless of what the model lists.
pub const COMMON_ATTRIBUTES: [&str; 5] = [
    "model",
    "model_config",
    "model_options",
    "patches",
    "patches_list",
];

const WIDTH: usize = 60;

/// Render the inspection report for `model`: every attribute, then the
/// LoRA-related and name-related subsets, then the common attributes with
/// any LoRA-keyed map entries.
pub fn inspect_model(model: &dyn Inspectable) -> String {
    let heavy = "=".repeat(WIDTH);
    let light = "-".repeat(WIDTH);
    let names: Vec<String> = model
        .attribute_names()
        .into_iter()
        .filter(|n| !n.starts_with("__"))
        .collect();

    let mut lines = vec![
        heavy.clone(),
        "Model inspection report".to_string(),
        heavy.clone(),
        String::new(),
        format!("Object type: {}", model.type_name()),
    ];

    section(&mut lines, &light, "All attributes:");
    for name in &names {
        let line = match model.attribute(name) {
            Some(value) if value.is_scalar() => {
                format!("  {name}: {value} ({})", value.type_name())
            }
            Some(value @ AttributeValue::Unavailable(_)) => format!("  {name}: {value}"),
            Some(value) => format!("  {name}: <{}>", value.type_name()),
            None => format!("  {name}: <unavailable: attribute vanished>"),
        };
        lines.push(line);
    }

    matching_section(&mut lines, &light, model, &names, "lora", "LoRA-related attributes:");
    matching_section(&mut lines, &light, model, &names, "name", "Name-related attributes:");

    section(&mut lines, &light, "Common attributes:");
    for name in COMMON_ATTRIBUTES {
        let Some(value) = model.attribute(name) else {
            continue;
        };
        if let AttributeValue::Unavailable(_) = value {
            lines.push(format!("  {name}: {value}"));
            continue;
        }
        lines.push(format!("  {name}: <{}>", value.type_name()));
        if let AttributeValue::Map(map) = &value {
            let lora_keys: Vec<&str> = map
                .keys()
                .filter(|k| k.to_lowercase().contains("lora"))
                .map(String::as_str)
                .collect();
            if !lora_keys.is_empty() {
                lines.push(format!("    LoRA-related keys: [{}]", lora_keys.join(", ")));
            }
        }
    }

    lines.push(String::new());
    lines.push(heavy);
    lines.join("\n")
}

fn section(lines: &mut Vec<String>, rule: &str, title: &str) {
    lines.push(String::new());
    lines.push(rule.to_string());
    lines.push(title.to_string());
    lines.push(rule.to_string());
}

fn matching_section(
    lines: &mut Vec<String>,
    rule: &str,
    model: &dyn Inspectable,
    names: &[String],
    needle: &str,
    title: &str,
) {
    section(lines, rule, title);

    let matches: Vec<&String> = names
        .iter()
        .filter(|n| n.to_lowercase().contains(needle))
        .collect();
    if matches.is_empty() {
        lines.push(format!("No attribute containing '{needle}'"));
        return;
    }

    lines.push(format!("Found {} possibly related attributes:", matches.len()));
    for name in matches {
        let line = match model.attribute(name) {
            Some(value) if value.is_scalar() || value.is_container() => {
                format!("  {name}: {value}")
            }
            Some(value @ AttributeValue::Unavailable(_)) => format!("  {name}: {value}"),
            Some(value) => format!("  {name}: <{}>", value.type_name()),
            None => format!("  {name}: <unavailable: attribute vanished>"),
        };
        lines.push(line);
    }
}

#[cfg(test)]
#[path = "tests/report_tests.rs"]
mod tests;
