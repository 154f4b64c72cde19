//! Static table of invocable nodes and the JSON dispatch into them.

use serde::Serialize;
use serde_json::Value;
use std::sync::LazyLock;

use super::{extract_cmds, inspector_cmds};
use crate::services::images::TargetFormat;
use crate::types::errors::{CommandError, CommandResult};

pub type NodeFunction = fn(Value) -> CommandResult<Value>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "choices", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InputKind {
    String,
    Boolean,
    Choice(Vec<&'static str>),
    Model,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputSpec {
    pub name: &'static str,
    pub kind: InputKind,
    pub required: bool,
    pub default: Option<Value>,
}

impl InputSpec {
    fn required(name: &'static str, kind: InputKind) -> Self {
        Self {
            name,
            kind,
            required: true,
            default: None,
        }
    }

    fn optional(name: &'static str, kind: InputKind, default: Value) -> Self {
        Self {
            name,
            kind,
            required: false,
            default: Some(default),
        }
    }

    fn check(&self, value: &Value) -> CommandResult<()> {
        let ok = match &self.kind {
            InputKind::String => value.is_string(),
            InputKind::Boolean => value.is_boolean(),
            InputKind::Choice(choices) => value
                .as_str()
                .map(|s| choices.contains(&s))
                .unwrap_or(false),
            InputKind::Model => value.is_object(),
        };
        if ok {
            Ok(())
        } else {
            Err(CommandError::InvalidInput(format!(
                "input '{}' has the wrong type or value: {value}",
                self.name
            )))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputSpec {
    pub name: &'static str,
    pub kind: InputKind,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeDescriptor {
    pub id: &'static str,
    pub display_name: &'static str,
    pub category: &'static str,
    pub inputs: Vec<InputSpec>,
    pub outputs: Vec<OutputSpec>,
    /// Name of the entry point, for listings.
    pub function_name: &'static str,
    #[serde(skip)]
    pub function: NodeFunction,
}

impl NodeDescriptor {
    /// Reject unknown keys, missing required inputs and mistyped values.
    pub fn validate(&self, args: &Value) -> CommandResult<()> {
        let Some(map) = args.as_object() else {
            return Err(CommandError::InvalidInput(format!(
                "arguments for '{}' must be a JSON object",
                self.id
            )));
        };

        if let Some(unknown) = map
            .keys()
            .find(|k| !self.inputs.iter().any(|i| i.name == k.as_str()))
        {
            return Err(CommandError::InvalidInput(format!(
                "unknown input '{unknown}' for node '{}'",
                self.id
            )));
        }

        for input in &self.inputs {
            match map.get(input.name) {
                Some(value) => input.check(value)?,
                None if input.required => {
                    return Err(CommandError::InvalidInput(format!(
                        "missing required input '{}' for node '{}'",
                        input.name, self.id
                    )))
                }
                None => {}
            }
        }
        Ok(())
    }
}

static REGISTRY: LazyLock<Vec<NodeDescriptor>> = LazyLock::new(|| {
    vec![
        NodeDescriptor {
            id: extract_cmds::NODE_ID,
            display_name: "PD:Excel_image_reduce",
            category: "PD_File/Excel",
            inputs: vec![
                InputSpec::required("input_directory", InputKind::String),
                InputSpec::optional("output_directory", InputKind::String, Value::from("")),
                InputSpec::optional("filename_prefix", InputKind::String, Value::from("img_")),
                InputSpec::optional(
                    "image_format",
                    InputKind::Choice(TargetFormat::ALL.iter().map(|f| f.as_str()).collect()),
                    Value::from("auto"),
                ),
                InputSpec::optional("include_filename", InputKind::Boolean, Value::from(true)),
            ],
            outputs: vec![OutputSpec {
                name: "status_text",
                kind: InputKind::String,
            }],
            function_name: "extract_images",
            function: extract_cmds::extract_images,
        },
        NodeDescriptor {
            id: inspector_cmds::NODE_ID,
            display_name: "PD Model Inspector",
            category: "PD/Model",
            inputs: vec![InputSpec::required("model", InputKind::Model)],
            outputs: vec![
                OutputSpec {
                    name: "model",
                    kind: InputKind::Model,
                },
                OutputSpec {
                    name: "inspection_info",
                    kind: InputKind::String,
                },
            ],
            function_name: "inspect_model",
            function: inspector_cmds::inspect_model,
        },
    ]
});

/// Every registered node, in registration order.
pub fn registry() -> &'static [NodeDescriptor] {
    &REGISTRY
}

pub fn find_node(id: &str) -> Option<&'static NodeDescriptor> {
    REGISTRY.iter().find(|node| node.id == id)
}

/// Validate `args` against the node's declared inputs and run it.
pub fn invoke(id: &str, args: Value) -> CommandResult<Value> {
    let node = find_node(id).ok_or_else(|| CommandError::NotFound(format!("node '{id}'")))?;
    node.validate(&args)?;
    log::debug!("[Registry] Invoking {} ({})", node.id, node.function_name);
    (node.function)(args)
}

#[cfg(test)]
#[path = "tests/registry_tests.rs"]
mod tests;
