//! Workbook and drawing part parsing.

use quick_xml::events::Event;
use quick_xml::Reader;

use super::relationships::attr_value;

/// A `<sheet>` entry of `xl/workbook.xml`: display name plus relationship id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetEntry {
    pub name: String,
    pub rel_id: String,
}

/// Sheets declared in the workbook part, in tab order.
pub fn parse_workbook_sheets(xml: &[u8]) -> Result<Vec<SheetEntry>, String> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut sheets = Vec::new();
    let mut saw_workbook = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e) | Event::Empty(e)) => match e.local_name().as_ref() {
                b"workbook" => saw_workbook = true,
                b"sheet" => {
                    let name = attr_value(&e, b"name").unwrap_or_default();
                    // `r:id`; sheets carry no other attribute named `id`.
                    if let Some(rel_id) = attr_value(&e, b"id") {
                        sheets.push(SheetEntry { name, rel_id });
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!(
                    "Malformed workbook at byte {}: {e}",
                    reader.buffer_position()
                ))
            }
            _ => {}
        }
    }

    if !saw_workbook {
        return Err("Workbook part has no <workbook> root".to_string());
    }

    Ok(sheets)
}

/// Relationship ids of every picture (`<xdr:pic>` → `<a:blip r:embed>`) in a
/// drawing part, in document order.
///
/// Blips outside a picture element (shape fills, backgrounds) are ignored.
pub fn parse_drawing_pictures(xml: &[u8]) -> Result<Vec<String>, String> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut embeds = Vec::new();
    let mut pic_depth: usize = 0;
    let mut current: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"pic" => {
                    pic_depth += 1;
                    current = None;
                }
                b"blip" if pic_depth > 0 => {
                    if let Some(id) = attr_value(&e, b"embed") {
                        current = Some(id);
                    }
                }
                _ => {}
            },
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"blip" && pic_depth > 0 {
                    if let Some(id) = attr_value(&e, b"embed") {
                        current = Some(id);
                    }
                }
            }
            Ok(Event::End(e)) => {
                if e.local_name().as_ref() == b"pic" && pic_depth > 0 {
                    pic_depth -= 1;
                    if let Some(id) = current.take() {
                        embeds.push(id);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!(
                    "Malformed drawing at byte {}: {e}",
                    reader.buffer_position()
                ))
            }
            _ => {}
        }
    }

    Ok(embeds)
}

#[cfg(test)]
#[path = "tests/drawing_tests.rs"]
mod tests;
