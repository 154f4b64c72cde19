//! OPC relationship parts (`_rels/*.rels`) and part-name resolution.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

pub const REL_WORKSHEET: &str = "/worksheet";
pub const REL_DRAWING: &str = "/drawing";
pub const REL_IMAGE: &str = "/image";
pub const REL_OFFICE_DOCUMENT: &str = "/officeDocument";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    pub external: bool,
}

impl Relationship {
    /// Relationship types are full URIs that differ between transitional and
    /// strict OOXML, so only the trailing segment is compared.
    pub fn is_type(&self, suffix: &str) -> bool {
        self.rel_type.ends_with(suffix)
    }
}

/// Read the `value` of the attribute whose local name is `local`.
pub(super) fn attr_value(element: &BytesStart, local: &[u8]) -> Option<String> {
    element
        .attributes()
        .filter_map(Result::ok)
        .find(|attr| attr.key.local_name().as_ref() == local)
        .and_then(|attr| attr.unescape_value().ok())
        .map(|value| value.into_owned())
}

/// Parse a relationships part into its entries, in document order.
pub fn parse_relationships(xml: &[u8]) -> Result<Vec<Relationship>, String> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut relationships = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e) | Event::Empty(e)) => {
                if e.local_name().as_ref() != b"Relationship" {
                    continue;
                }

                let (Some(id), Some(target)) = (attr_value(&e, b"Id"), attr_value(&e, b"Target"))
                else {
                    continue;
                };

                let rel_type = attr_value(&e, b"Type").unwrap_or_default();
                let external = attr_value(&e, b"TargetMode")
                    .map(|mode| mode.eq_ignore_ascii_case("External"))
                    .unwrap_or(false);

                relationships.push(Relationship {
                    id,
                    rel_type,
                    target,
                    external,
                });
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!(
                    "Malformed relationships at byte {}: {e}",
                    reader.buffer_position()
                ))
            }
            _ => {}
        }
    }

    Ok(relationships)
}

/// Name of the relationships part that belongs to `part`.
///
/// `xl/workbook.xml` → `xl/_rels/workbook.xml.rels`, and the package root
/// (`""`) → `_rels/.rels`.
pub fn rels_part_for(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, name)) => format!("{dir}/_rels/{name}.rels"),
        None => format!("_rels/{part}.rels"),
    }
}

/// Resolve a relationship `target` against the part that declared it.
///
/// Absolute targets (`/xl/media/image1.png`) are taken from the package root;
/// relative ones are joined to the source part's directory with `.` and `..`
/// segments collapsed. Returns `None` when `..` climbs above the root.
pub fn resolve_target(source_part: &str, target: &str) -> Option<String> {
    let target = target.replace('\\', "/");

    let joined = if let Some(absolute) = target.strip_prefix('/') {
        absolute.to_string()
    } else {
        match source_part.rsplit_once('/') {
            Some((dir, _)) => format!("{dir}/{target}"),
            None => target,
        }
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        return None;
    }
    Some(segments.join("/"))
}

#[cfg(test)]
#[path = "tests/relationships_tests.rs"]
mod tests;
