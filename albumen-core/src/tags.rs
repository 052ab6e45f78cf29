use std::{collections::HashMap, io::Cursor};

use exif::{Field, In, Tag, Value};
use tracing::trace;

use crate::error::TagError;

/// Tag name (e.g. `"DateTimeOriginal"`) to its rendered value.
pub type TagMap = HashMap<String, TagValue>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagValue {
    pub description: String,
}

impl TagValue {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// Turns raw file bytes into a tag mapping.
///
/// Implementations report malformed input as an error; callers decide how to
/// recover.
pub trait TagParser: Send + Sync {
    fn parse_tags(&self, bytes: &[u8]) -> Result<TagMap, TagError>;
}

/// [`TagParser`] backed by `kamadak-exif`.
///
/// Reads the primary image directory of JPEG, TIFF, PNG, WebP and HEIF
/// containers. Thumbnail tags are ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExifTagParser;

impl ExifTagParser {
    pub fn new() -> Self {
        Self
    }
}

impl TagParser for ExifTagParser {
    fn parse_tags(&self, bytes: &[u8]) -> Result<TagMap, TagError> {
        let mut cursor = Cursor::new(bytes);
        let exif = exif::Reader::new().read_from_container(&mut cursor)?;

        let mut tags = TagMap::new();
        for field in exif.fields().filter(|f| f.ifd_num == In::PRIMARY) {
            let description = match field.tag {
                Tag::GPSLatitude => {
                    gps_coordinate(field, exif.get_field(Tag::GPSLatitudeRef, In::PRIMARY), 'S')
                }
                Tag::GPSLongitude => {
                    gps_coordinate(field, exif.get_field(Tag::GPSLongitudeRef, In::PRIMARY), 'W')
                }
                Tag::GPSProcessingMethod => processing_method(&field.value),
                _ => Some(describe(&field.value, field)),
            };

            match description {
                Some(description) => {
                    tags.insert(field.tag.to_string(), TagValue::new(description));
                }
                None => trace!(tag = %field.tag, "skipping tag without usable value"),
            }
        }

        Ok(tags)
    }
}

fn describe(value: &Value, field: &Field) -> String {
    match value {
        Value::Ascii(parts) => parts
            .first()
            .map(|part| ascii_text(part))
            .unwrap_or_default(),
        _ => field.display_value().to_string(),
    }
}

fn ascii_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_end_matches('\0')
        .trim()
        .to_string()
}

/// Degrees/minutes/seconds rationals as signed decimal degrees.
fn gps_coordinate(field: &Field, reference: Option<&Field>, negative_ref: char) -> Option<String> {
    let Value::Rational(parts) = &field.value else {
        return None;
    };
    if parts.is_empty() || parts.iter().any(|r| r.denom == 0) {
        return None;
    }

    let degrees = parts
        .iter()
        .take(3)
        .zip([1.0, 60.0, 3600.0])
        .map(|(part, divisor)| part.to_f64() / divisor)
        .sum::<f64>();

    let negative = reference
        .map(|r| describe(&r.value, r))
        .is_some_and(|r| r.starts_with(negative_ref));

    Some(format_degrees(if negative { -degrees } else { degrees }))
}

fn format_degrees(value: f64) -> String {
    let fixed = format!("{value:.6}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// GPSProcessingMethod starts with an 8 byte character code (`ASCII\0\0\0`,
/// `UNICODE\0`, ...) followed by the text.
fn processing_method(value: &Value) -> Option<String> {
    let text = match value {
        Value::Undefined(bytes, _) => {
            let body = if bytes.len() >= 8 { &bytes[8..] } else { &bytes[..] };
            ascii_text(body)
        }
        Value::Ascii(parts) => parts.first().map(|p| ascii_text(p))?,
        _ => return None,
    };

    (!text.is_empty()).then_some(text)
}
