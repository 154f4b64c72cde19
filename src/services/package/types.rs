use image::ImageFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Spreadsheet package flavour, detected from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PackageKind {
    Xlsx,
    Xlsm,
}

impl PackageKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "xlsx" => Some(Self::Xlsx),
            "xlsm" => Some(Self::Xlsm),
            _ => None,
        }
    }
}

/// A worksheet entry from `xl/workbook.xml`, resolved to its part name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetInfo {
    pub name: String,
    /// Part name inside the package, without a leading slash (`xl/worksheets/sheet1.xml`).
    pub part: String,
}

/// One picture payload pulled out of a drawing part.
#[derive(Debug, Clone)]
pub struct EmbeddedImage {
    pub bytes: Vec<u8>,
    /// Format implied by the media part's extension, when it names one we know.
    pub declared_format: Option<ImageFormat>,
    pub sheet: String,
    /// Media part the bytes came from (`xl/media/image1.png`).
    pub part: String,
}

impl EmbeddedImage {
    pub fn new(bytes: Vec<u8>, sheet: &str, part: &str) -> Self {
        Self {
            declared_format: declared_format_of(part),
            bytes,
            sheet: sheet.to_string(),
            part: part.to_string(),
        }
    }
}

fn declared_format_of(part: &str) -> Option<ImageFormat> {
    let ext = Path::new(part).extension()?.to_str()?;
    ImageFormat::from_extension(ext)
}
