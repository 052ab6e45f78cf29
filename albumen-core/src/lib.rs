//! # Albumen Core
//!
//! Photo catalog listing and embedded metadata extraction for the Albumen
//! photo server.
//!
//! - [`catalog`]: scans the photo directory and builds [`PhotoRecord`]s
//! - [`metadata`]: condenses a file's tags into an [`ExifSummary`]
//! - [`tags`]: the [`TagParser`] seam and its `kamadak-exif` implementation
//!
//! ```no_run
//! use albumen_core::{Catalog, CatalogConfig};
//!
//! let catalog = Catalog::with_exif_parser(CatalogConfig::new("./photos"));
//! for photo in catalog.list()? {
//!     println!("{} taken {}", photo.filename, photo.exif.unwrap_or_default().date_time);
//! }
//! # Ok::<(), albumen_core::CatalogError>(())
//! ```

#![allow(missing_docs)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod metadata;
pub mod photo;
pub mod tags;

pub use catalog::Catalog;
pub use config::{CatalogConfig, DEFAULT_IMAGE_EXTENSIONS, DEFAULT_URL_PREFIX};
pub use error::{CatalogError, Result, TagError};
pub use metadata::MetadataExtractor;
pub use photo::{ExifSummary, PhotoRecord, UNKNOWN_DATE_TIME, UNKNOWN_LOCATION};
pub use tags::{ExifTagParser, TagMap, TagParser, TagValue};
