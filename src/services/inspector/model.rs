use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A declared attribute value. Scalars and containers are shown in full;
/// anything else is reported by type name only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AttributeValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    List(Vec<AttributeValue>),
    Map(BTreeMap<String, AttributeValue>),
    /// A value with no printable form, e.g. a tensor or a nested model.
    Object(String),
    /// The attribute exists but reading it failed.
    Unavailable(String),
}

impl AttributeValue {
    pub fn type_name(&self) -> &str {
        match self {
            AttributeValue::Str(_) => "str",
            AttributeValue::Int(_) => "int",
            AttributeValue::Float(_) => "float",
            AttributeValue::Bool(_) => "bool",
            AttributeValue::List(_) => "list",
            AttributeValue::Map(_) => "dict",
            AttributeValue::Object(type_name) => type_name,
            AttributeValue::Unavailable(_) => "unavailable",
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            AttributeValue::Str(_)
                | AttributeValue::Int(_)
                | AttributeValue::Float(_)
                | AttributeValue::Bool(_)
        )
    }

    pub fn is_container(&self) -> bool {
        matches!(self, AttributeValue::List(_) | AttributeValue::Map(_))
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Str(s) => write!(f, "{s}"),
            AttributeValue::Int(i) => write!(f, "{i}"),
            AttributeValue::Float(x) => write!(f, "{x}"),
            AttributeValue::Bool(b) => write!(f, "{b}"),
            AttributeValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            AttributeValue::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
            AttributeValue::Object(type_name) => write!(f, "<{type_name}>"),
            AttributeValue::Unavailable(reason) => write!(f, "<unavailable: {reason}>"),
        }
    }
}

impl From<serde_json::Value> for AttributeValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => AttributeValue::Object("NoneType".to_string()),
            Value::Bool(b) => AttributeValue::Bool(b),
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => AttributeValue::Int(i),
                (None, Some(x)) if x.is_finite() => AttributeValue::Float(x),
                _ => AttributeValue::Unavailable(format!("number {n} is out of range")),
            },
            Value::String(s) => AttributeValue::Str(s),
            Value::Array(items) => {
                AttributeValue::List(items.into_iter().map(AttributeValue::from).collect())
            }
            Value::Object(map) => AttributeValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, AttributeValue::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Something whose attributes can be listed and read by name.
pub trait Inspectable {
    fn type_name(&self) -> &str;

    /// Attribute names in a stable order.
    fn attribute_names(&self) -> Vec<String>;

    /// `None` when the attribute does not exist.
    fn attribute(&self, name: &str) -> Option<AttributeValue>;
}

/// A model described as plain data: a class name and its attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelRecord {
    pub class_name: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl ModelRecord {
    pub fn new(class_name: &str) -> Self {
        Self {
            class_name: class_name.to_string(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with(mut self, name: &str, value: AttributeValue) -> Self {
        self.attributes.insert(name.to_string(), value);
        self
    }

    /// Build from a plain JSON object; every key becomes an attribute.
    pub fn from_json(class_name: &str, value: serde_json::Value) -> Self {
        let attributes = match value {
            serde_json::Value::Object(map) => map
                .into_iter()
                .map(|(k, v)| (k, AttributeValue::from(v)))
                .collect(),
            _ => BTreeMap::new(),
        };
        Self {
            class_name: class_name.to_string(),
            attributes,
        }
    }
}

impl Inspectable for ModelRecord {
    fn type_name(&self) -> &str {
        &self.class_name
    }

    fn attribute_names(&self) -> Vec<String> {
        self.attributes.keys().cloned().collect()
    }

    fn attribute(&self, name: &str) -> Option<AttributeValue> {
        self.attributes.get(name).cloned()
    }
}
