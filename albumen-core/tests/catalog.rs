use std::{
    fs::{self, File},
    io::Cursor,
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::SystemTime,
};

use albumen_core::{
    Catalog, CatalogConfig, CatalogError, ExifSummary, TagError, TagMap, TagParser, TagValue,
};
use chrono::{Local, TimeZone};
use exif::{Field, In, Rational, Tag, Value, experimental::Writer};
use tempfile::TempDir;

fn local_noon(year: i32, month: u32, day: u32) -> SystemTime {
    Local
        .with_ymd_and_hms(year, month, day, 12, 0, 0)
        .single()
        .expect("unambiguous local time")
        .into()
}

fn write_photo(dir: &Path, name: &str, contents: &[u8], modified: SystemTime) {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    File::options()
        .write(true)
        .open(&path)
        .unwrap()
        .set_modified(modified)
        .unwrap();
}

fn ascii(tag: Tag, text: &str) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Ascii(vec![text.as_bytes().to_vec()]),
    }
}

fn dms(tag: Tag, degrees: u32, minutes: u32, centiseconds: u32) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Rational(vec![
            Rational {
                num: degrees,
                denom: 1,
            },
            Rational {
                num: minutes,
                denom: 1,
            },
            Rational {
                num: centiseconds,
                denom: 100,
            },
        ]),
    }
}

/// Minimal JPEG: SOI, an APP1 Exif segment holding `fields`, EOI.
fn jpeg_with_exif(fields: &[Field]) -> Vec<u8> {
    let mut writer = Writer::new();
    for field in fields {
        writer.push_field(field);
    }
    let mut tiff = Cursor::new(Vec::new());
    writer.write(&mut tiff, false).unwrap();
    let tiff = tiff.into_inner();

    let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE1];
    let segment_len = u16::try_from(2 + 6 + tiff.len()).unwrap();
    jpeg.extend_from_slice(&segment_len.to_be_bytes());
    jpeg.extend_from_slice(b"Exif\0\0");
    jpeg.extend_from_slice(&tiff);
    jpeg.extend_from_slice(&[0xFF, 0xD9]);
    jpeg
}

fn catalog_for(dir: &TempDir) -> Catalog {
    Catalog::with_exif_parser(CatalogConfig::new(dir.path()))
}

#[test]
fn test_list_orders_newest_first_and_skips_non_images() {
    let temp_dir = TempDir::new().unwrap();
    write_photo(temp_dir.path(), "a.png", b"png bytes", local_noon(2024, 1, 1));
    write_photo(temp_dir.path(), "b.jpg", b"jpeg bytes", local_noon(2024, 3, 1));
    write_photo(temp_dir.path(), "notes.txt", b"hello", local_noon(2024, 6, 1));

    let photos = catalog_for(&temp_dir).list().unwrap();

    let names: Vec<_> = photos.iter().map(|p| p.filename.as_str()).collect();
    assert_eq!(names, vec!["b.jpg", "a.png"]);
    assert_eq!(photos[0].modified_date, "2024-03-01");
    assert_eq!(photos[1].modified_date, "2024-01-01");

    for pair in photos.windows(2) {
        assert!(pair[0].modified_date >= pair[1].modified_date);
    }
}

#[test]
fn test_list_record_fields() {
    let temp_dir = TempDir::new().unwrap();
    write_photo(
        temp_dir.path(),
        "Summer Trip.JPG",
        b"0123456789",
        local_noon(2023, 8, 15),
    );

    let photos = catalog_for(&temp_dir).list().unwrap();
    assert_eq!(photos.len(), 1);

    let photo = &photos[0];
    assert_eq!(photo.filename, "Summer Trip.JPG");
    assert_eq!(photo.original_name, "Summer Trip");
    assert_eq!(photo.extension, ".jpg");
    assert_eq!(photo.size, 10);
    assert_eq!(photo.modified_date, "2023-08-15");
    assert_eq!(photo.url, "/photos/Summer%20Trip.JPG");
    assert_eq!(photo.created_date, None);
    assert!(photo.exif.is_some());
}

#[test]
fn test_list_only_non_images_is_empty() {
    let temp_dir = TempDir::new().unwrap();
    write_photo(temp_dir.path(), "readme.md", b"# hi", local_noon(2024, 1, 1));
    write_photo(temp_dir.path(), "video.mp4", b"mp4", local_noon(2024, 1, 2));
    fs::create_dir(temp_dir.path().join("album.jpg")).unwrap();

    let photos = catalog_for(&temp_dir).list().unwrap();
    assert!(photos.is_empty());
}

#[test]
fn test_list_empty_directory() {
    let temp_dir = TempDir::new().unwrap();
    assert!(catalog_for(&temp_dir).list().unwrap().is_empty());
}

#[test]
fn test_unsupported_extension_ignored_even_with_metadata() {
    let temp_dir = TempDir::new().unwrap();
    let jpeg = jpeg_with_exif(&[ascii(Tag::Make, "Canon"), ascii(Tag::Model, "EOS R5")]);
    write_photo(temp_dir.path(), "scan.tiff", &jpeg, local_noon(2024, 1, 1));
    write_photo(temp_dir.path(), "scan.jpg.bak", &jpeg, local_noon(2024, 1, 1));

    assert!(catalog_for(&temp_dir).list().unwrap().is_empty());
}

#[test]
fn test_corrupt_metadata_still_listed() {
    let temp_dir = TempDir::new().unwrap();
    write_photo(
        temp_dir.path(),
        "broken.jpg",
        &[0xFF, 0xD8, 0xFF, 0xE1, 0x00, 0x10, b'E', b'x'],
        local_noon(2024, 2, 2),
    );
    write_photo(temp_dir.path(), "empty.webp", b"", local_noon(2024, 2, 1));

    let photos = catalog_for(&temp_dir).list().unwrap();

    assert_eq!(photos.len(), 2);
    for photo in &photos {
        assert_eq!(photo.exif, Some(ExifSummary::unknown()));
        let exif = photo.exif.as_ref().unwrap();
        assert_eq!(exif.date_time, "unknown");
        assert_eq!(exif.location, "unknown location");
        assert_eq!(exif.camera_info, "");
    }
}

#[test]
fn test_exif_summary_from_real_tags() {
    let temp_dir = TempDir::new().unwrap();
    let jpeg = jpeg_with_exif(&[
        ascii(Tag::Make, "FUJIFILM"),
        ascii(Tag::Model, "X100V"),
        ascii(Tag::DateTimeOriginal, "2023:07:04 21:15:30"),
        ascii(Tag::GPSLatitudeRef, "N"),
        dms(Tag::GPSLatitude, 37, 46, 2964),
        ascii(Tag::GPSLongitudeRef, "W"),
        dms(Tag::GPSLongitude, 122, 25, 984),
    ]);
    write_photo(temp_dir.path(), "bridge.jpeg", &jpeg, local_noon(2024, 1, 1));

    let photos = catalog_for(&temp_dir).list().unwrap();
    let exif = photos[0].exif.clone().unwrap();

    assert_eq!(exif.date_time, "July 4, 2023 21:15");
    assert_eq!(exif.location, "37.7749, -122.4194");
    assert_eq!(exif.camera_info, "FUJIFILM X100V");
}

#[test]
fn test_processing_method_overrides_coordinates() {
    let temp_dir = TempDir::new().unwrap();
    let mut method = b"ASCII\0\0\0".to_vec();
    method.extend_from_slice(b"Shanghai");
    let jpeg = jpeg_with_exif(&[
        ascii(Tag::DateTime, "not a date"),
        dms(Tag::GPSLatitude, 31, 13, 0),
        dms(Tag::GPSLongitude, 121, 28, 0),
        Field {
            tag: Tag::GPSProcessingMethod,
            ifd_num: In::PRIMARY,
            value: Value::Undefined(method, 0),
        },
    ]);
    write_photo(temp_dir.path(), "bund.jpg", &jpeg, local_noon(2024, 1, 1));

    let photos = catalog_for(&temp_dir).list().unwrap();
    let exif = photos[0].exif.clone().unwrap();

    assert_eq!(exif.date_time, "not a date");
    assert_eq!(exif.location, "Shanghai");
    assert_eq!(exif.camera_info, "");
}

#[test]
fn test_missing_directory_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let catalog = Catalog::with_exif_parser(CatalogConfig::new(temp_dir.path().join("gone")));

    match catalog.list() {
        Err(CatalogError::DirectoryNotFound(path)) => {
            assert_eq!(path, temp_dir.path().join("gone"));
        }
        other => panic!("Expected DirectoryNotFound, got {other:?}"),
    }
}

#[test]
fn test_file_path_is_not_a_directory() {
    let temp_dir = TempDir::new().unwrap();
    write_photo(temp_dir.path(), "a.jpg", b"x", local_noon(2024, 1, 1));
    let catalog = Catalog::with_exif_parser(CatalogConfig::new(temp_dir.path().join("a.jpg")));

    assert!(matches!(catalog.list(), Err(CatalogError::DirectoryNotFound(_))));
}

struct CountingParser {
    calls: AtomicUsize,
}

impl TagParser for CountingParser {
    fn parse_tags(&self, bytes: &[u8]) -> Result<TagMap, TagError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut tags = TagMap::new();
        tags.insert(
            "DateTimeOriginal".to_string(),
            TagValue::new(String::from_utf8_lossy(bytes).into_owned()),
        );
        Ok(tags)
    }
}

#[test]
fn test_catalog_uses_injected_parser() {
    let temp_dir = TempDir::new().unwrap();
    write_photo(temp_dir.path(), "one.gif", b"2022:02:22 22:22:22", local_noon(2024, 1, 1));
    write_photo(temp_dir.path(), "two.bmp", b"2021:01:11 11:11:11", local_noon(2024, 1, 2));
    write_photo(temp_dir.path(), "skip.txt", b"2020:01:01 00:00:00", local_noon(2024, 1, 3));

    let parser = Arc::new(CountingParser {
        calls: AtomicUsize::new(0),
    });
    let catalog = Catalog::new(CatalogConfig::new(temp_dir.path()), parser.clone());

    let photos = catalog.list().unwrap();

    assert_eq!(parser.calls.load(Ordering::SeqCst), 2);
    assert_eq!(photos[0].filename, "two.bmp");
    assert_eq!(
        photos[0].exif.as_ref().unwrap().date_time,
        "January 11, 2021 11:11"
    );
    assert_eq!(
        photos[1].exif.as_ref().unwrap().date_time,
        "February 22, 2022 22:22"
    );
}

#[test]
fn test_custom_extensions() {
    let temp_dir = TempDir::new().unwrap();
    write_photo(temp_dir.path(), "a.heic", b"x", local_noon(2024, 1, 1));
    write_photo(temp_dir.path(), "b.jpg", b"x", local_noon(2024, 1, 1));

    let config = CatalogConfig::new(temp_dir.path()).with_extensions(["heic"]);
    let photos = Catalog::with_exif_parser(config).list().unwrap();

    let names: Vec<_> = photos.iter().map(|p| p.filename.as_str()).collect();
    assert_eq!(names, vec!["a.heic"]);
}

// Linux filesystems accept arbitrary bytes in names; others may refuse them.
#[cfg(target_os = "linux")]
#[test]
fn test_non_utf8_name_listed_lossily() {
    use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

    let temp_dir = TempDir::new().unwrap();
    let raw_name = OsStr::from_bytes(b"caf\xE9.jpg");
    fs::write(temp_dir.path().join(raw_name), b"latin1").unwrap();
    write_photo(temp_dir.path(), "plain.jpg", b"x", local_noon(2024, 1, 1));

    let photos = catalog_for(&temp_dir).list().unwrap();

    assert_eq!(photos.len(), 2);
    let lossy = photos
        .iter()
        .find(|p| p.filename != "plain.jpg")
        .expect("non UTF-8 file listed");
    assert_eq!(lossy.filename, "caf\u{FFFD}.jpg");
    assert_eq!(lossy.original_name, "caf\u{FFFD}");
    assert_eq!(lossy.extension, ".jpg");
    assert_eq!(lossy.size, 6);
    assert_eq!(lossy.url, "/photos/caf%EF%BF%BD.jpg");
}

#[test]
fn test_lookup_decodes_percent_encoding() {
    let temp_dir = TempDir::new().unwrap();
    write_photo(temp_dir.path(), "my photo.png", b"abc", local_noon(2024, 4, 5));

    let photo = catalog_for(&temp_dir).lookup("my%20photo.png").unwrap();

    assert_eq!(photo.filename, "my photo.png");
    assert_eq!(photo.original_name, "my photo");
    assert_eq!(photo.extension, ".png");
    assert_eq!(photo.size, 3);
    assert_eq!(photo.modified_date, "2024-04-05");
    assert_eq!(photo.url, "/photos/my%20photo.png");
    assert!(photo.created_date.is_some());
    assert!(photo.exif.is_none());
}

#[test]
fn test_lookup_plain_name() {
    let temp_dir = TempDir::new().unwrap();
    write_photo(temp_dir.path(), "notes.txt", b"abc", local_noon(2024, 4, 5));

    let photo = catalog_for(&temp_dir).lookup("notes.txt").unwrap();
    assert_eq!(photo.extension, ".txt");
}

#[test]
fn test_lookup_missing_file() {
    let temp_dir = TempDir::new().unwrap();

    match catalog_for(&temp_dir).lookup("nope.jpg") {
        Err(CatalogError::FileNotFound(name)) => assert_eq!(name, "nope.jpg"),
        other => panic!("Expected FileNotFound, got {other:?}"),
    }
}

#[test]
fn test_lookup_rejects_escapes_and_directories() {
    let temp_dir = TempDir::new().unwrap();
    let photos = temp_dir.path().join("photos");
    fs::create_dir(&photos).unwrap();
    fs::create_dir(photos.join("album")).unwrap();
    write_photo(temp_dir.path(), "secret.jpg", b"x", local_noon(2024, 1, 1));

    let catalog = Catalog::with_exif_parser(CatalogConfig::new(&photos));

    for name in ["..%2Fsecret.jpg", "../secret.jpg", "album", "..", "%FF%FE", ""] {
        assert!(
            matches!(catalog.lookup(name), Err(CatalogError::FileNotFound(_))),
            "lookup({name:?}) should be FileNotFound"
        );
    }
}
