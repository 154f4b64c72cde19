pub mod extract_cmds;
pub mod inspector_cmds;
pub mod registry;

// Re-export public API
pub use registry::{find_node, invoke, registry, InputKind, InputSpec, NodeDescriptor};
