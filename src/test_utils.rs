//! Fixture builders shared by unit tests and the integration suite
//! (`tests/common/mod.rs` pulls this file in by path).
//!
//! Only external crates are referenced here so the file compiles in both places.

#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::Once;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// One worksheet of a fixture workbook.
pub struct FixtureSheet {
    pub name: String,
    /// `(media file name, bytes)`; names must be unique across the workbook.
    pub images: Vec<(String, Vec<u8>)>,
    /// Adds a picture whose `r:embed` points at a relationship that does not exist.
    pub dangling_refs: usize,
}

impl FixtureSheet {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            images: Vec::new(),
            dangling_refs: 0,
        }
    }

    pub fn image(mut self, media_name: &str, bytes: Vec<u8>) -> Self {
        self.images.push((media_name.to_string(), bytes));
        self
    }

    pub fn dangling_ref(mut self) -> Self {
        self.dangling_refs += 1;
        self
    }
}

/// Writes a minimal but well-formed `.xlsx` package.
#[derive(Default)]
pub struct XlsxBuilder {
    sheets: Vec<FixtureSheet>,
}

impl XlsxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheet(mut self, sheet: FixtureSheet) -> Self {
        self.sheets.push(sheet);
        self
    }

    pub fn write_to(self, path: &Path) {
        let file = std::fs::File::create(path).expect("create fixture package");
        let mut zip = ZipWriter::new(file);
        let options = SimpleFileOptions::default();

        let put = |zip: &mut ZipWriter<std::fs::File>, name: &str, bytes: &[u8]| {
            zip.start_file(name, options).expect("start zip entry");
            zip.write_all(bytes).expect("write zip entry");
        };

        put(&mut zip, "[Content_Types].xml", CONTENT_TYPES.as_bytes());
        put(&mut zip, "_rels/.rels", ROOT_RELS.as_bytes());

        let mut sheet_elems = String::new();
        let mut workbook_rels = String::new();
        for (idx, sheet) in self.sheets.iter().enumerate() {
            let n = idx + 1;
            sheet_elems.push_str(&format!(
                r#"<sheet name="{}" sheetId="{n}" r:id="rId{n}"/>"#,
                sheet.name
            ));
            workbook_rels.push_str(&format!(
                r#"<Relationship Id="rId{n}" Type="{REL_NS}/worksheet" Target="worksheets/sheet{n}.xml"/>"#
            ));
        }

        put(
            &mut zip,
            "xl/workbook.xml",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="{REL_NS}"><sheets>{sheet_elems}</sheets></workbook>"#
            )
            .as_bytes(),
        );
        put(
            &mut zip,
            "xl/_rels/workbook.xml.rels",
            rels_xml(&workbook_rels).as_bytes(),
        );

        for (idx, sheet) in self.sheets.iter().enumerate() {
            let n = idx + 1;
            let has_drawing = !sheet.images.is_empty() || sheet.dangling_refs > 0;
            let drawing_elem = if has_drawing {
                r#"<drawing r:id="rId1"/>"#
            } else {
                ""
            };
            put(
                &mut zip,
                &format!("xl/worksheets/sheet{n}.xml"),
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="{REL_NS}"><sheetData/>{drawing_elem}</worksheet>"#
                )
                .as_bytes(),
            );

            if !has_drawing {
                continue;
            }

            put(
                &mut zip,
                &format!("xl/worksheets/_rels/sheet{n}.xml.rels"),
                rels_xml(&format!(
                    r#"<Relationship Id="rId1" Type="{REL_NS}/drawing" Target="../drawings/drawing{n}.xml"/>"#
                ))
                .as_bytes(),
            );

            let mut pics = String::new();
            let mut drawing_rels = String::new();
            for (img_idx, (media_name, bytes)) in sheet.images.iter().enumerate() {
                let rid = img_idx + 1;
                pics.push_str(&pic_anchor(&format!("rId{rid}")));
                drawing_rels.push_str(&format!(
                    r#"<Relationship Id="rId{rid}" Type="{REL_NS}/image" Target="../media/{media_name}"/>"#
                ));
                put(&mut zip, &format!("xl/media/{media_name}"), bytes);
            }
            for dangling in 0..sheet.dangling_refs {
                pics.push_str(&pic_anchor(&format!("rIdMissing{dangling}")));
            }

            put(
                &mut zip,
                &format!("xl/drawings/drawing{n}.xml"),
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><xdr:wsDr xmlns:xdr="http://schemas.openxmlformats.org/drawingml/2006/spreadsheetDrawing" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="{REL_NS}">{pics}</xdr:wsDr>"#
                )
                .as_bytes(),
            );
            put(
                &mut zip,
                &format!("xl/drawings/_rels/drawing{n}.xml.rels"),
                rels_xml(&drawing_rels).as_bytes(),
            );
        }

        zip.finish().expect("finish fixture package");
    }
}

const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/><Default Extension="jpeg" ContentType="image/jpeg"/><Default Extension="gif" ContentType="image/gif"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

fn rels_xml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{body}</Relationships>"#
    )
}

fn pic_anchor(rel_id: &str) -> String {
    format!(
        r#"<xdr:oneCellAnchor><xdr:from><xdr:col>0</xdr:col><xdr:row>0</xdr:row></xdr:from><xdr:pic><xdr:nvPicPr><xdr:cNvPr id="1" name="Picture"/><xdr:cNvPicPr/></xdr:nvPicPr><xdr:blipFill><a:blip r:embed="{rel_id}"/></xdr:blipFill></xdr:pic><xdr:clientData/></xdr:oneCellAnchor>"#
    )
}

pub fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), format)
        .expect("encode fixture image");
    bytes
}

/// Opaque RGB gradient.
pub fn rgb_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 20) as u8, (y * 20) as u8, 128])
    }))
}

/// Left half fully transparent, right half opaque red.
pub fn rgba_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgba([0, 0, 0, 0])
        } else {
            Rgba([255, 0, 0, 255])
        }
    }))
}

pub fn png_bytes() -> Vec<u8> {
    encode(&rgb_image(8, 6), ImageFormat::Png)
}

pub fn rgba_png_bytes() -> Vec<u8> {
    encode(&rgba_image(8, 6), ImageFormat::Png)
}

pub fn jpeg_bytes() -> Vec<u8> {
    encode(&rgb_image(8, 6), ImageFormat::Jpeg)
}

/// An opaque GIF built from a handful of flat colours.
pub fn gif_bytes() -> Vec<u8> {
    let image = DynamicImage::ImageRgba8(RgbaImage::from_fn(6, 4, |x, y| {
        if (x + y) % 2 == 0 {
            Rgba([255, 255, 255, 255])
        } else {
            Rgba([0, 0, 255, 255])
        }
    }));
    encode(&image, ImageFormat::Gif)
}
