//! Spreadsheet package (OOXML zip) reading: workbook sheets, drawings and
//! the picture payloads they reference.

mod drawing;
mod reader;
mod relationships;
mod types;

// Re-export public API
pub use reader::{SpreadsheetPackage, MAX_PART_BYTES};
pub use relationships::{resolve_target, Relationship};
pub use types::{EmbeddedImage, PackageKind, SheetInfo};
