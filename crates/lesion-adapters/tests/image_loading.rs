//! Integration tests for loading images from disk.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::Path;

use image::{DynamicImage, GrayImage, Luma};
use lesion_adapters::FsImageSource;
use lesion_core::{ImageInfo, ImageSource, LesionError};

fn write_fixtures(dir: &Path) {
    DynamicImage::new_rgb8(8, 8).save(dir.join("a.jpg")).unwrap();
    DynamicImage::new_rgba8(8, 8).save(dir.join("b.png")).unwrap();
    DynamicImage::ImageLuma8(GrayImage::from_pixel(8, 8, Luma([90])))
        .save(dir.join("c.png"))
        .unwrap();
    DynamicImage::new_rgb8(8, 8)
        .save_with_format(dir.join("d.JPEG"), image::ImageFormat::Jpeg)
        .unwrap();
    fs::write(dir.join("notes.txt"), "not an image").unwrap();
}

#[test]
fn test_load_directory() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());

    let source = FsImageSource::new(vec![dir.path().to_path_buf()], false);
    let images: Vec<_> = source.images().collect();

    assert_eq!(images.len(), 4);
    for result in images {
        let info: ImageInfo = result.expect("all fixtures should load");
        assert_eq!((info.width, info.height), (8, 8));
    }
}

#[test]
fn test_directory_order_is_sorted() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());

    let source = FsImageSource::new(vec![dir.path().to_path_buf()], false);
    let names: Vec<String> = source
        .images()
        .map(|r| {
            let path = r.unwrap().path;
            Path::new(&path)
                .file_name()
                .unwrap()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    assert_eq!(names, ["a.jpg", "b.png", "c.png", "d.JPEG"]);
}

#[test]
fn test_count_hint() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());

    let source = FsImageSource::new(vec![dir.path().to_path_buf()], false);
    assert_eq!(source.count_hint(), Some(4));
}

#[test]
fn test_recursive_scan() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("nested");
    fs::create_dir(&nested).unwrap();
    DynamicImage::new_rgb8(4, 4).save(dir.path().join("top.png")).unwrap();
    DynamicImage::new_rgb8(4, 4).save(nested.join("deep.png")).unwrap();

    let flat = FsImageSource::new(vec![dir.path().to_path_buf()], false);
    assert_eq!(flat.count_hint(), Some(1));

    let recursive = FsImageSource::new(vec![dir.path().to_path_buf()], true);
    assert_eq!(recursive.count_hint(), Some(2));
}

#[test]
fn test_corrupt_file_yields_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("broken.jpg"), b"\xff\xd8 truncated").unwrap();

    let source = FsImageSource::new(vec![dir.path().to_path_buf()], false);
    let images: Vec<_> = source.images().collect();

    assert_eq!(images.len(), 1);
    match &images[0] {
        Err(LesionError::Decode { path, .. }) => assert!(path.ends_with("broken.jpg")),
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[test]
fn test_mislabelled_extension_still_decodes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("actually_png.jpg");
    DynamicImage::new_rgb8(5, 5)
        .save_with_format(&path, image::ImageFormat::Png)
        .unwrap();

    let source = FsImageSource::new(vec![path], false);
    let info = source.images().next().unwrap().expect("content sniffing");
    assert_eq!(info.width, 5);
}

#[test]
fn test_explicit_unsupported_file_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scan.tiff");
    fs::write(&path, b"ignored").unwrap();

    let source = FsImageSource::new(vec![path], false);
    assert_eq!(source.count_hint(), Some(0));
}

#[test]
fn test_listing_is_scanned_once() {
    let dir = tempfile::tempdir().unwrap();
    DynamicImage::new_rgb8(4, 4).save(dir.path().join("first.png")).unwrap();

    let source = FsImageSource::new(vec![dir.path().to_path_buf()], false);
    assert_eq!(source.count_hint(), Some(1));

    // Files added after the first scan are not picked up.
    DynamicImage::new_rgb8(4, 4).save(dir.path().join("second.png")).unwrap();
    assert_eq!(source.count_hint(), Some(1));
    assert_eq!(source.images().count(), 1);
}
