use std::{path::Path, sync::Arc};

use chrono::NaiveDateTime;
use tracing::debug;

use crate::{
    error::TagError,
    photo::{ExifSummary, UNKNOWN_DATE_TIME, UNKNOWN_LOCATION},
    tags::{ExifTagParser, TagMap, TagParser},
};

/// Date tags in order of preference.
const DATE_TAGS: [&str; 3] = ["DateTime", "DateTimeOriginal", "DateTimeDigitized"];

/// Raw EXIF date layouts, most common first.
const RAW_DATE_FORMATS: [&str; 2] = ["%Y:%m:%d %H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Long form rendering: `January 2, 2024 03:04`.
const LONG_DATE_FORMAT: &str = "%B %-d, %Y %H:%M";

/// Derives an [`ExifSummary`] from raw file contents.
#[derive(Clone)]
pub struct MetadataExtractor {
    parser: Arc<dyn TagParser>,
}

impl std::fmt::Debug for MetadataExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataExtractor").finish_non_exhaustive()
    }
}

impl Default for MetadataExtractor {
    fn default() -> Self {
        Self::new(Arc::new(ExifTagParser::new()))
    }
}

impl MetadataExtractor {
    pub fn new(parser: Arc<dyn TagParser>) -> Self {
        Self { parser }
    }

    /// Summarize the metadata block in `bytes`.
    ///
    /// Never fails: unreadable input yields [`ExifSummary::unknown`].
    pub fn extract(&self, bytes: &[u8]) -> ExifSummary {
        match self.parser.parse_tags(bytes) {
            Ok(tags) => summarize(&tags),
            Err(e) => {
                debug!("No usable metadata: {}", e);
                ExifSummary::unknown()
            }
        }
    }

    /// Read `path` and summarize it, falling back to [`ExifSummary::unknown`]
    /// when the file cannot be read or parsed.
    pub fn extract_file<P: AsRef<Path>>(&self, path: P) -> ExifSummary {
        let path = path.as_ref();
        match self.try_extract_file(path) {
            Ok(summary) => summary,
            Err(e) => {
                debug!("Failed to read metadata from {}: {}", path.display(), e);
                ExifSummary::unknown()
            }
        }
    }

    fn try_extract_file(&self, path: &Path) -> Result<ExifSummary, TagError> {
        let bytes = std::fs::read(path)?;
        let tags = self.parser.parse_tags(&bytes)?;
        Ok(summarize(&tags))
    }
}

/// Build a summary from an already parsed tag mapping.
pub fn summarize(tags: &TagMap) -> ExifSummary {
    ExifSummary {
        date_time: date_time(tags),
        location: location(tags),
        camera_info: camera_info(tags),
    }
}

fn tag<'a>(tags: &'a TagMap, name: &str) -> Option<&'a str> {
    tags.get(name).map(|value| value.description.as_str())
}

fn date_time(tags: &TagMap) -> String {
    DATE_TAGS
        .iter()
        .find_map(|name| tag(tags, name))
        .map(format_capture_date)
        .unwrap_or_else(|| UNKNOWN_DATE_TIME.to_string())
}

/// Render a raw EXIF date in long form. Values that do not parse are returned
/// untouched.
pub fn format_capture_date(raw: &str) -> String {
    let trimmed = raw.trim();
    RAW_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|parsed| parsed.format(LONG_DATE_FORMAT).to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn location(tags: &TagMap) -> String {
    match (tag(tags, "GPSLatitude"), tag(tags, "GPSLongitude")) {
        (Some(lat), Some(lng)) => match tag(tags, "GPSProcessingMethod") {
            Some(method) => method.to_string(),
            None => format!("{lat}, {lng}"),
        },
        _ => UNKNOWN_LOCATION.to_string(),
    }
}

fn camera_info(tags: &TagMap) -> String {
    match (tag(tags, "Make"), tag(tags, "Model")) {
        (Some(make), Some(model)) => format!("{make} {model}"),
        _ => String::new(),
    }
}
