pub mod walker;

// Re-export public API
pub use walker::{scan_spreadsheets, SourceFile};
