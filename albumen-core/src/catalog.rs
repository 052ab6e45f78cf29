use std::{
    borrow::Cow,
    fs::{self, Metadata},
    io,
    path::{Component, Path},
    sync::Arc,
    time::SystemTime,
};

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::{
    config::{CatalogConfig, extension_of},
    error::{CatalogError, Result},
    metadata::MetadataExtractor,
    photo::PhotoRecord,
    tags::{ExifTagParser, TagParser},
};

/// Read-only view over a directory of photos.
///
/// Every call rescans the directory; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct Catalog {
    config: CatalogConfig,
    extractor: MetadataExtractor,
}

impl Catalog {
    pub fn new(config: CatalogConfig, parser: Arc<dyn TagParser>) -> Self {
        Self {
            config,
            extractor: MetadataExtractor::new(parser),
        }
    }

    /// Catalog reading tags with [`ExifTagParser`].
    pub fn with_exif_parser(config: CatalogConfig) -> Self {
        Self::new(config, Arc::new(ExifTagParser::new()))
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// List every image in the photo directory, newest modification date
    /// first. Records with the same date are ordered by filename.
    ///
    /// Entries that cannot be inspected are skipped; files whose metadata
    /// cannot be read are listed with [`ExifSummary::unknown`](crate::ExifSummary::unknown).
    pub fn list(&self) -> Result<Vec<PhotoRecord>> {
        let root = &self.config.photos_dir;

        if !root.is_dir() {
            return Err(CatalogError::DirectoryNotFound(root.clone()));
        }

        debug!("Listing photos in {}", root.display());

        let walker = WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true);

        let mut photos = Vec::new();
        let mut skipped = 0usize;

        for entry in walker {
            match entry {
                Ok(entry) => match self.list_entry(&entry) {
                    Ok(Some(record)) => photos.push(record),
                    Ok(None) => skipped += 1,
                    Err(e) => {
                        warn!("Skipping {}: {}", entry.path().display(), e);
                        skipped += 1;
                    }
                },
                Err(e) if e.depth() == 0 => return Err(CatalogError::Io(e.into())),
                Err(e) => {
                    warn!("Error reading photo directory entry: {}", e);
                    skipped += 1;
                }
            }
        }

        sort_catalog(&mut photos);

        info!(
            photos = photos.len(),
            skipped,
            "Listed photo directory {}",
            root.display()
        );

        Ok(photos)
    }

    fn list_entry(&self, entry: &DirEntry) -> io::Result<Option<PhotoRecord>> {
        if !entry.file_type().is_file() {
            return Ok(None);
        }

        let path = entry.path();
        if !self.config.is_image_file(path) {
            return Ok(None);
        }

        let filename = entry.file_name().to_string_lossy();
        if matches!(filename, Cow::Owned(_)) {
            debug!("Listing non UTF-8 file name as {:?}", filename);
        }

        let metadata = entry.metadata().map_err(io::Error::from)?;
        let mut record = self.base_record(&filename, &metadata)?;
        record.exif = Some(self.extractor.extract_file(path));

        Ok(Some(record))
    }

    /// Describe a single file.
    ///
    /// `filename` is percent-decoded before it touches the filesystem and must
    /// name a plain file directly inside the photo directory.
    pub fn lookup(&self, filename: &str) -> Result<PhotoRecord> {
        let decoded = urlencoding::decode(filename)
            .map_err(|_| CatalogError::FileNotFound(filename.to_string()))?;
        let name = decoded.as_ref();

        if !is_plain_file_name(name) {
            warn!("Rejected photo lookup for {:?}", name);
            return Err(CatalogError::FileNotFound(name.to_string()));
        }

        let path = self.config.photos_dir.join(name);
        let metadata = match fs::metadata(&path) {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => return Err(CatalogError::FileNotFound(name.to_string())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(CatalogError::FileNotFound(name.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let mut record = self.base_record(name, &metadata)?;
        let created = metadata.created().or_else(|e| {
            debug!("Creation time unavailable for {}: {}", path.display(), e);
            metadata.modified()
        })?;
        record.created_date = Some(local_date(created));

        Ok(record)
    }

    fn base_record(&self, filename: &str, metadata: &Metadata) -> io::Result<PhotoRecord> {
        let path = Path::new(filename);

        Ok(PhotoRecord {
            filename: filename.to_string(),
            original_name: path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default(),
            extension: extension_of(path),
            size: metadata.len(),
            modified_date: local_date(metadata.modified()?),
            created_date: None,
            url: self.photo_url(filename),
            exif: None,
        })
    }

    /// Percent-encoded URL of `filename` under the static file prefix.
    pub fn photo_url(&self, filename: &str) -> String {
        format!(
            "{}/{}",
            self.config.url_prefix.trim_end_matches('/'),
            urlencoding::encode(filename)
        )
    }
}

fn sort_catalog(photos: &mut [PhotoRecord]) {
    photos.sort_by(|a, b| {
        b.modified_date
            .cmp(&a.modified_date)
            .then_with(|| a.filename.cmp(&b.filename))
    });
}

fn local_date(time: SystemTime) -> String {
    DateTime::<Local>::from(time).format("%Y-%m-%d").to_string()
}

fn is_plain_file_name(name: &str) -> bool {
    if name.chars().any(std::path::is_separator) {
        return false;
    }

    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
