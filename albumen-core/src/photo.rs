use serde::{Deserialize, Serialize};

/// Placeholder capture time when no usable date tag exists.
pub const UNKNOWN_DATE_TIME: &str = "unknown";
/// Placeholder location when no GPS tags exist.
pub const UNKNOWN_LOCATION: &str = "unknown location";

/// Normalized description of one image file in the photo directory.
///
/// The listing and the single-photo lookup fill different optional fields:
/// listings carry `exif`, lookups carry `created_date`. Absent fields are
/// left out of the serialized body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRecord {
    pub filename: String,
    pub original_name: String,
    pub extension: String,
    pub size: u64,
    /// Local calendar date, `YYYY-MM-DD`.
    pub modified_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exif: Option<ExifSummary>,
}

/// Human readable capture details derived from a file's tag mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExifSummary {
    pub date_time: String,
    pub location: String,
    /// `"{make} {model}"`; empty when either tag is missing.
    pub camera_info: String,
}

impl ExifSummary {
    /// Summary used when the metadata block is missing or unreadable.
    pub fn unknown() -> Self {
        Self {
            date_time: UNKNOWN_DATE_TIME.to_string(),
            location: UNKNOWN_LOCATION.to_string(),
            camera_info: String::new(),
        }
    }
}

impl Default for ExifSummary {
    fn default() -> Self {
        Self::unknown()
    }
}
