//! Human-readable metadata blocks for an imported image.
//!
//! Three categories are produced as multi-line text: image info (derived
//! file facts), EXIF (with GPS position lines appended) and baseline TIFF
//! tags. A category with no data is an empty string so callers can skip it.
//! Tags that fail to parse are logged and treated as absent.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use exif::{Context, Exif, Field, In, Reader, Tag, Value};
use thiserror::Error;

use crate::decode::{DecodedImage, ImportedImage, SourceInfo};
use crate::histogram::compute_histogram;

/// Line written after every EXIF field.
pub const FIELD_SEPARATOR: &str = "---------------------------------------------";

/// Tags that only locate other directories.
const POINTER_TAGS: [Tag; 4] = [
    Tag::ExifIFDPointer,
    Tag::GPSInfoIFDPointer,
    Tag::InteropIFDPointer,
    Tag::MakerNote,
];

/// Baseline TIFF tags listed in the TIFF block.
const BASELINE_TIFF_TAGS: [Tag; 19] = [
    Tag::ImageWidth,
    Tag::ImageLength,
    Tag::BitsPerSample,
    Tag::Compression,
    Tag::PhotometricInterpretation,
    Tag::ImageDescription,
    Tag::Make,
    Tag::Model,
    Tag::Orientation,
    Tag::SamplesPerPixel,
    Tag::RowsPerStrip,
    Tag::XResolution,
    Tag::YResolution,
    Tag::PlanarConfiguration,
    Tag::ResolutionUnit,
    Tag::Software,
    Tag::DateTime,
    Tag::Artist,
    Tag::Copyright,
];

/// Errors while gathering metadata. Missing tags are not errors.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Failed to read metadata from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The three metadata blocks of one image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataReport {
    pub image_info: String,
    pub exif: String,
    pub tiff: String,
}

impl MetadataReport {
    /// Non-empty blocks with their titles, in display order.
    pub fn blocks(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("Image info", self.image_info.as_str()),
            ("EXIF", self.exif.as_str()),
            ("TIFF", self.tiff.as_str()),
        ]
        .into_iter()
        .filter(|(_, text)| !text.is_empty())
    }
}

/// Gather every metadata block for an imported image.
///
/// # Errors
///
/// `MetadataError::Io` when the TIFF source file cannot be reopened.
pub fn extract_metadata(imported: &ImportedImage) -> Result<MetadataReport, MetadataError> {
    Ok(MetadataReport {
        image_info: image_info(&imported.image, &imported.source),
        exif: exif_block(&imported.source),
        tiff: tiff_block(&imported.source)?,
    })
}

/// Format a byte count as KB below one megabyte, MB otherwise.
pub fn format_file_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let bytes = bytes as f64;
    if bytes < MB {
        format!("{:.2} KB", bytes / KB)
    } else {
        format!("{:.2} MB", bytes / MB)
    }
}

/// Derived file facts: format, name, size, dimensions, mode, bands, bit depth
/// and entropy.
pub fn image_info(image: &DecodedImage, source: &SourceInfo) -> String {
    let format = source.original_format.unwrap_or(image.format);
    let mut lines = vec![format!("Format: {}", source.format_name())];
    if let Some(name) = source.file_name() {
        lines.push(format!("File: {}", name));
    }
    lines.push(format!("Size: {}", format_file_size(source.file_size)));
    lines.push(format!("Dimensions: {} x {}", image.width, image.height));
    lines.push(format!("Mode: {}", format.mode_name()));
    lines.push(format!("Bands: {}", format.channels()));
    lines.push(format!("Bit depth: {}", source.bit_depth.max(8)));
    lines.push(format!("Entropy: {:.4}", compute_histogram(image).entropy()));

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn parse_exif(source: &SourceInfo) -> Option<Exif> {
    let raw = source.exif.as_ref()?;
    match Reader::new().read_raw(raw.clone()) {
        Ok(exif) => Some(exif),
        Err(e) => {
            tracing::warn!(error = %e, "unreadable EXIF block");
            None
        }
    }
}

/// `Name: value` with the bare value; units are never appended.
fn field_line(field: &Field) -> String {
    let value = field.display_value().to_string();
    format!("{}: {}", field.tag, value.trim_matches('"'))
}

/// One `Name: value` line per primary EXIF field, each followed by a
/// separator line, then the decoded GPS position if present.
pub fn exif_block(source: &SourceInfo) -> String {
    let Some(exif) = parse_exif(source) else {
        return String::new();
    };

    let mut text = String::new();
    for field in exif.fields() {
        if field.ifd_num != In::PRIMARY
            || field.tag.context() == Context::Gps
            || POINTER_TAGS.contains(&field.tag)
        {
            continue;
        }
        text.push_str(&field_line(field));
        text.push('\n');
        text.push_str(FIELD_SEPARATOR);
        text.push('\n');
    }

    for (name, value) in gps_position(&exif) {
        text.push_str(&format!("{}: {}\n", name, value));
    }
    text
}

/// Decimal GPS lines: Latitude, Longitude and Altitude when present.
fn gps_position(exif: &Exif) -> Vec<(&'static str, String)> {
    let mut lines = Vec::new();
    if let Some(lat) = gps_coordinate(exif, Tag::GPSLatitude, Tag::GPSLatitudeRef) {
        lines.push(("Latitude", format!("{:.6}", lat)));
    }
    if let Some(lon) = gps_coordinate(exif, Tag::GPSLongitude, Tag::GPSLongitudeRef) {
        lines.push(("Longitude", format!("{:.6}", lon)));
    }
    if let Some(alt) = gps_altitude(exif) {
        lines.push(("Altitude", format!("{:.2}", alt)));
    }
    lines
}

/// Degrees/minutes/seconds to signed decimal degrees.
fn gps_coordinate(exif: &Exif, coord_tag: Tag, ref_tag: Tag) -> Option<f64> {
    let coord = exif.get_field(coord_tag, In::PRIMARY)?;
    let degrees = match &coord.value {
        Value::Rational(parts) if parts.len() >= 3 => {
            parts[0].to_f64() + parts[1].to_f64() / 60.0 + parts[2].to_f64() / 3600.0
        }
        _ => return None,
    };

    let negative = exif
        .get_field(ref_tag, In::PRIMARY)
        .map(|f| {
            let r = f.display_value().to_string();
            r.contains('S') || r.contains('W')
        })
        .unwrap_or(false);

    Some(if negative { -degrees } else { degrees })
}

/// Altitude in metres; negative below sea level.
fn gps_altitude(exif: &Exif) -> Option<f64> {
    let field = exif.get_field(Tag::GPSAltitude, In::PRIMARY)?;
    let altitude = match &field.value {
        Value::Rational(parts) => parts.first()?.to_f64(),
        _ => return None,
    };
    let below = matches!(
        exif.get_field(Tag::GPSAltitudeRef, In::PRIMARY).map(|f| &f.value),
        Some(Value::Byte(v)) if v.first() == Some(&1)
    );
    Some(if below { -altitude } else { altitude })
}

/// Baseline TIFF tags, re-read from the source file. Empty for other
/// containers or images not loaded from disk.
///
/// # Errors
///
/// `MetadataError::Io` when the file cannot be opened.
pub fn tiff_block(source: &SourceInfo) -> Result<String, MetadataError> {
    if source.format != Some(image::ImageFormat::Tiff) {
        return Ok(String::new());
    }
    let Some(path) = source.path.as_deref() else {
        return Ok(String::new());
    };

    let Some(exif) = read_container(path)? else {
        return Ok(String::new());
    };

    let mut text = String::new();
    for tag in BASELINE_TIFF_TAGS {
        if let Some(field) = exif.get_field(tag, In::PRIMARY) {
            text.push_str(&field_line(field));
            text.push('\n');
        }
    }
    Ok(text)
}

fn read_container(path: &Path) -> Result<Option<Exif>, MetadataError> {
    let file = File::open(path).map_err(|source| MetadataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);
    match Reader::new().read_from_container(&mut reader) {
        Ok(exif) => Ok(Some(exif)),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "unreadable TIFF tags");
            Ok(None)
        }
    }
}
