//! Decode embedded picture payloads and re-encode them for output.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ColorType, DynamicImage, ImageFormat, Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Cursor;
use std::str::FromStr;

use crate::services::package::EmbeddedImage;
use crate::types::errors::ExtractError;

/// Format used in `auto` mode when neither the payload nor the package names one.
pub const DEFAULT_AUTO_FORMAT: ImageFormat = ImageFormat::Png;

pub const JPEG_QUALITY: u8 = 95;

/// Background used when transparency has to be dropped.
const FLATTEN_BACKGROUND: [u8; 3] = [255, 255, 255];

/// Output format requested by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    /// Keep whatever format the picture was stored in.
    #[default]
    Auto,
    Png,
    Jpg,
    Jpeg,
    Bmp,
    Gif,
}

impl TargetFormat {
    pub const ALL: [TargetFormat; 6] = [
        TargetFormat::Auto,
        TargetFormat::Png,
        TargetFormat::Jpg,
        TargetFormat::Jpeg,
        TargetFormat::Bmp,
        TargetFormat::Gif,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetFormat::Auto => "auto",
            TargetFormat::Png => "png",
            TargetFormat::Jpg => "jpg",
            TargetFormat::Jpeg => "jpeg",
            TargetFormat::Bmp => "bmp",
            TargetFormat::Gif => "gif",
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetFormat {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        TargetFormat::ALL
            .into_iter()
            .find(|f| f.as_str() == wanted)
            .ok_or_else(|| ExtractError::InvalidFormat(s.to_string()))
    }
}

/// How the source picture stores colour, as far as transparency is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Opaque,
    /// Has an alpha channel.
    Alpha,
    /// Stored as indexed colour (GIF, palette PNG, <=8bpp BMP).
    Palette,
}

impl ColorMode {
    pub fn carries_transparency(&self) -> bool {
        matches!(self, ColorMode::Alpha | ColorMode::Palette)
    }
}

#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub image: DynamicImage,
    pub mode: ColorMode,
    /// Format the payload was decoded as.
    pub format: Option<ImageFormat>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    pub jpeg_quality: Option<u8>,
    pub optimize: bool,
}

/// Resolved `(format, extension, options)` for one output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSpec {
    pub format: ImageFormat,
    pub extension: String,
    pub options: EncodeOptions,
}

impl OutputSpec {
    fn new(format: ImageFormat, extension: &str) -> Self {
        let options = match format {
            ImageFormat::Jpeg => EncodeOptions {
                jpeg_quality: Some(JPEG_QUALITY),
                optimize: true,
            },
            ImageFormat::Png => EncodeOptions {
                jpeg_quality: None,
                optimize: true,
            },
            _ => EncodeOptions::default(),
        };
        Self {
            format,
            extension: extension.to_string(),
            options,
        }
    }
}

/// Lowercase format name, which doubles as the file extension in `auto` mode.
pub fn format_name(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Png => "png",
        ImageFormat::Jpeg => "jpeg",
        ImageFormat::Gif => "gif",
        ImageFormat::Bmp => "bmp",
        ImageFormat::Tiff => "tiff",
        ImageFormat::WebP => "webp",
        ImageFormat::Ico => "ico",
        other => other.extensions_str().first().copied().unwrap_or("img"),
    }
}

/// Decode a payload, trusting its magic bytes first and the package's
/// declared format second.
pub fn decode(embedded: &EmbeddedImage) -> Result<DecodedImage, ExtractError> {
    let format = image::guess_format(&embedded.bytes)
        .ok()
        .or(embedded.declared_format)
        .ok_or_else(|| ExtractError::Decode(format!("unrecognised image data in {}", embedded.part)))?;

    let image = image::load_from_memory_with_format(&embedded.bytes, format)
        .map_err(|e| ExtractError::Decode(format!("{}: {e}", embedded.part)))?;

    let mode = if is_palette_encoded(&embedded.bytes, format) {
        ColorMode::Palette
    } else if image.color().has_alpha() {
        ColorMode::Alpha
    } else {
        ColorMode::Opaque
    };

    Ok(DecodedImage {
        image,
        mode,
        format: Some(format),
    })
}

/// Pick the output format for one image.
pub fn resolve_output_spec(target: TargetFormat, source: Option<ImageFormat>) -> OutputSpec {
    match target {
        TargetFormat::Auto => {
            let format = source.unwrap_or(DEFAULT_AUTO_FORMAT);
            OutputSpec::new(format, format_name(format))
        }
        TargetFormat::Png => OutputSpec::new(ImageFormat::Png, "png"),
        TargetFormat::Jpg => OutputSpec::new(ImageFormat::Jpeg, "jpg"),
        TargetFormat::Jpeg => OutputSpec::new(ImageFormat::Jpeg, "jpeg"),
        TargetFormat::Bmp => OutputSpec::new(ImageFormat::Bmp, "bmp"),
        TargetFormat::Gif => OutputSpec::new(ImageFormat::Gif, "gif"),
    }
}

/// Composite onto an opaque white background, producing RGB8.
pub fn flatten_onto_white(image: &DynamicImage) -> DynamicImage {
    let rgba = image.to_rgba8();
    let flat = RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let px = rgba.get_pixel(x, y).0;
        let alpha = px[3] as u32;
        let blend = |c: u8, bg: u8| -> u8 {
            ((c as u32 * alpha + bg as u32 * (255 - alpha) + 127) / 255) as u8
        };
        Rgb([
            blend(px[0], FLATTEN_BACKGROUND[0]),
            blend(px[1], FLATTEN_BACKGROUND[1]),
            blend(px[2], FLATTEN_BACKGROUND[2]),
        ])
    });
    DynamicImage::ImageRgb8(flat)
}

/// Apply the alpha policy and any channel-depth change the encoder needs.
///
/// Only a JPEG target with a transparent-capable source is flattened; every
/// other pairing keeps its pixels.
pub fn prepare_for_output(decoded: DecodedImage, spec: &OutputSpec) -> DynamicImage {
    let DecodedImage { image, mode, .. } = decoded;

    match spec.format {
        ImageFormat::Jpeg => {
            if mode.carries_transparency() || image.color().has_alpha() {
                return flatten_onto_white(&image);
            }
            match image.color() {
                ColorType::L8 | ColorType::Rgb8 => image,
                ColorType::L16 => DynamicImage::ImageLuma8(image.to_luma8()),
                _ => DynamicImage::ImageRgb8(image.to_rgb8()),
            }
        }
        ImageFormat::Gif => match image.color() {
            ColorType::Rgb8 | ColorType::Rgba8 => image,
            _ => DynamicImage::ImageRgba8(image.to_rgba8()),
        },
        ImageFormat::Bmp | ImageFormat::WebP => match image.color() {
            ColorType::L8 | ColorType::La8 | ColorType::Rgb8 | ColorType::Rgba8 => image,
            color if color.has_alpha() => DynamicImage::ImageRgba8(image.to_rgba8()),
            _ => DynamicImage::ImageRgb8(image.to_rgb8()),
        },
        _ => match image.color() {
            ColorType::Rgb32F => DynamicImage::ImageRgb16(image.to_rgb16()),
            ColorType::Rgba32F => DynamicImage::ImageRgba16(image.to_rgba16()),
            _ => image,
        },
    }
}

/// Encode with the per-format options from `spec`.
pub fn encode(image: &DynamicImage, spec: &OutputSpec) -> Result<Vec<u8>, ExtractError> {
    let mut bytes: Vec<u8> = Vec::new();

    let result = match spec.format {
        ImageFormat::Jpeg => {
            let quality = spec.options.jpeg_quality.unwrap_or(JPEG_QUALITY);
            image.write_with_encoder(JpegEncoder::new_with_quality(&mut bytes, quality))
        }
        ImageFormat::Png if spec.options.optimize => image.write_with_encoder(
            PngEncoder::new_with_quality(&mut bytes, CompressionType::Best, FilterType::Adaptive),
        ),
        format => image.write_to(&mut Cursor::new(&mut bytes), format),
    };

    result.map_err(|e| ExtractError::Encode(format!("{}: {e}", format_name(spec.format))))?;
    Ok(bytes)
}

/// Whether the encoded payload stores indexed colour.
fn is_palette_encoded(bytes: &[u8], format: ImageFormat) -> bool {
    match format {
        ImageFormat::Gif => true,
        // IHDR colour type sits right after the 8-byte signature, chunk header,
        // width, height and bit depth.
        ImageFormat::Png => bytes.get(25) == Some(&3),
        ImageFormat::Bmp => bmp_bits_per_pixel(bytes).is_some_and(|bits| bits <= 8),
        _ => false,
    }
}

/// Size of the BMP file header; the DIB header follows it.
const BMP_FILE_HEADER_LEN: usize = 14;
/// OS/2 `BITMAPCOREHEADER`, which stores width and height as 16-bit values.
const BMP_CORE_HEADER_LEN: u32 = 12;

fn bmp_bits_per_pixel(bytes: &[u8]) -> Option<u16> {
    let read_u16 = |at: usize| bytes.get(at..at + 2).map(|b| u16::from_le_bytes([b[0], b[1]]));

    let header = bytes.get(BMP_FILE_HEADER_LEN..BMP_FILE_HEADER_LEN + 4)?;
    let header_len = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
    match header_len {
        BMP_CORE_HEADER_LEN => read_u16(BMP_FILE_HEADER_LEN + 10),
        len if len >= 16 => read_u16(BMP_FILE_HEADER_LEN + 14),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/transcode_tests.rs"]
mod tests;
