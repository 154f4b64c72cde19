use std::fs;
use std::io::{Read, Seek};
use std::path::Path;

use zip::ZipArchive;

use super::drawing::{parse_drawing_pictures, parse_workbook_sheets};
use super::relationships::{
    parse_relationships, rels_part_for, resolve_target, Relationship, REL_DRAWING, REL_IMAGE,
    REL_OFFICE_DOCUMENT, REL_WORKSHEET,
};
use super::types::{EmbeddedImage, SheetInfo};
use crate::types::errors::ExtractError;

/// Upper bound on the inflated size of any single part we read into memory.
pub const MAX_PART_BYTES: u64 = 256 * 1024 * 1024;

const DEFAULT_WORKBOOK_PART: &str = "xl/workbook.xml";

/// An opened spreadsheet package with its sheet list resolved.
pub struct SpreadsheetPackage<R: Read + Seek = fs::File> {
    archive: ZipArchive<R>,
    sheets: Vec<SheetInfo>,
}

impl SpreadsheetPackage<fs::File> {
    /// Open a package from disk. Any failure to read the container or its
    /// workbook part is reported as `CorruptPackage`.
    pub fn open(path: &Path) -> Result<Self, ExtractError> {
        let file = fs::File::open(path).map_err(|e| ExtractError::corrupt(path, e))?;
        Self::from_reader(path, file)
    }
}

impl<R: Read + Seek> SpreadsheetPackage<R> {
    pub fn from_reader(path: &Path, reader: R) -> Result<Self, ExtractError> {
        let mut archive = ZipArchive::new(reader).map_err(|e| ExtractError::corrupt(path, e))?;

        let workbook_part = locate_workbook(&mut archive);
        let workbook_xml = read_part(&mut archive, &workbook_part)
            .map_err(|e| ExtractError::corrupt(path, e))?;
        let entries =
            parse_workbook_sheets(&workbook_xml).map_err(|e| ExtractError::corrupt(path, e))?;

        let workbook_rels = match read_part(&mut archive, &rels_part_for(&workbook_part)) {
            Ok(xml) => parse_relationships(&xml).map_err(|e| ExtractError::corrupt(path, e))?,
            Err(_) => Vec::new(),
        };

        let mut sheets = Vec::with_capacity(entries.len());
        for entry in entries {
            let target = workbook_rels
                .iter()
                .find(|r| r.id == entry.rel_id && r.is_type(REL_WORKSHEET) && !r.external)
                .and_then(|r| resolve_target(&workbook_part, &r.target));

            // Chart sheets and dialog sheets carry no worksheet relationship.
            let Some(part) = target else {
                log::debug!("Skipping non-worksheet sheet '{}'", entry.name);
                continue;
            };
            sheets.push(SheetInfo {
                name: entry.name,
                part,
            });
        }

        Ok(Self {
            archive,
            sheets,
        })
    }

    /// Worksheets in workbook tab order.
    pub fn sheets(&self) -> &[SheetInfo] {
        &self.sheets
    }

    /// Every picture anchored on `sheet`, in drawing order.
    ///
    /// Each element stands alone: a reference that cannot be resolved to
    /// bytes is returned as `UnreadableImageRef` without affecting the rest.
    pub fn sheet_images(&mut self, sheet: &SheetInfo) -> Vec<Result<EmbeddedImage, ExtractError>> {
        let mut images = Vec::new();

        let sheet_rels = match self.read_rels(&sheet.part) {
            Some(Ok(rels)) => rels,
            Some(Err(e)) => {
                images.push(Err(ExtractError::unreadable(
                    rels_part_for(&sheet.part),
                    e,
                )));
                return images;
            }
            // No relationships, no drawings.
            None => return images,
        };

        for drawing_rel in sheet_rels.iter().filter(|r| r.is_type(REL_DRAWING)) {
            if drawing_rel.external {
                continue;
            }
            let Some(drawing_part) = resolve_target(&sheet.part, &drawing_rel.target) else {
                images.push(Err(ExtractError::unreadable(
                    &drawing_rel.target,
                    "target escapes the package root",
                )));
                continue;
            };
            self.collect_drawing_images(sheet, &drawing_part, &mut images);
        }

        images
    }

    fn collect_drawing_images(
        &mut self,
        sheet: &SheetInfo,
        drawing_part: &str,
        images: &mut Vec<Result<EmbeddedImage, ExtractError>>,
    ) {
        let embeds = match read_part(&mut self.archive, drawing_part)
            .and_then(|xml| parse_drawing_pictures(&xml))
        {
            Ok(embeds) => embeds,
            Err(e) => {
                images.push(Err(ExtractError::unreadable(drawing_part, e)));
                return;
            }
        };

        if embeds.is_empty() {
            return;
        }

        let drawing_rels = match self.read_rels(drawing_part) {
            Some(Ok(rels)) => rels,
            Some(Err(e)) => {
                for rel_id in &embeds {
                    images.push(Err(ExtractError::unreadable(
                        format!("{drawing_part}#{rel_id}"),
                        &e,
                    )));
                }
                return;
            }
            None => {
                for rel_id in &embeds {
                    images.push(Err(ExtractError::unreadable(
                        format!("{drawing_part}#{rel_id}"),
                        "drawing has no relationships part",
                    )));
                }
                return;
            }
        };

        for rel_id in embeds {
            let reference = format!("{drawing_part}#{rel_id}");
            let result = self
                .resolve_image_part(drawing_part, &rel_id, &drawing_rels)
                .and_then(|part| {
                    read_part(&mut self.archive, &part)
                        .map(|bytes| EmbeddedImage::new(bytes, &sheet.name, &part))
                })
                .map_err(|e| ExtractError::unreadable(&reference, e));
            images.push(result);
        }
    }

    fn resolve_image_part(
        &self,
        drawing_part: &str,
        rel_id: &str,
        rels: &[Relationship],
    ) -> Result<String, String> {
        let rel = rels
            .iter()
            .find(|r| r.id == rel_id)
            .ok_or_else(|| format!("relationship {rel_id} not found"))?;

        if rel.external {
            return Err(format!("linked image {} is not stored in the package", rel.target));
        }
        if !rel.is_type(REL_IMAGE) {
            return Err(format!("relationship {rel_id} is not an image ({})", rel.rel_type));
        }

        resolve_target(drawing_part, &rel.target)
            .ok_or_else(|| format!("target {} escapes the package root", rel.target))
    }

    /// `None` when the part has no relationships part at all.
    fn read_rels(&mut self, part: &str) -> Option<Result<Vec<Relationship>, String>> {
        let rels_part = rels_part_for(part);
        if self.archive.index_for_name(&rels_part).is_none() {
            return None;
        }
        Some(read_part(&mut self.archive, &rels_part).and_then(|xml| parse_relationships(&xml)))
    }
}

/// Follow the package-level `officeDocument` relationship, falling back to
/// the conventional location.
fn locate_workbook<R: Read + Seek>(archive: &mut ZipArchive<R>) -> String {
    read_part(archive, &rels_part_for(""))
        .and_then(|xml| parse_relationships(&xml))
        .ok()
        .and_then(|rels| {
            rels.into_iter()
                .find(|r| r.is_type(REL_OFFICE_DOCUMENT) && !r.external)
                .and_then(|r| resolve_target("", &r.target))
        })
        .unwrap_or_else(|| DEFAULT_WORKBOOK_PART.to_string())
}

fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, part: &str) -> Result<Vec<u8>, String> {
    let entry = archive
        .by_name(part)
        .map_err(|e| format!("Missing part {part}: {e}"))?;

    if entry.size() > MAX_PART_BYTES {
        return Err(format!(
            "Part {part} is too large ({} bytes, limit {MAX_PART_BYTES})",
            entry.size()
        ));
    }

    let mut bytes = Vec::with_capacity(entry.size() as usize);
    entry
        .take(MAX_PART_BYTES)
        .read_to_end(&mut bytes)
        .map_err(|e| format!("Failed to read part {part}: {e}"))?;
    Ok(bytes)
}

#[cfg(test)]
#[path = "tests/reader_tests.rs"]
mod tests;
