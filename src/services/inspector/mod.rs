//! Attribute introspection for host model records.

pub mod model;
pub mod report;

// Re-export public API
pub use model::{AttributeValue, Inspectable, ModelRecord};
pub use report::{inspect_model, COMMON_ATTRIBUTES};
