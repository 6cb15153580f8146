use crate::error::{Error, ExtractError};
use crate::extraction::ZipExtractor;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Create a valid ZIP archive containing a single file with the given name and content
fn create_zip_archive(archive_path: &Path, file_name: &str, content: &[u8]) {
    let file = std::fs::File::create(archive_path).unwrap();
    let mut writer = ::zip::ZipWriter::new(file);
    let options =
        ::zip::write::FileOptions::default().compression_method(::zip::CompressionMethod::Stored);
    writer.start_file(file_name, options).unwrap();
    std::io::Write::write_all(&mut writer, content).unwrap();
    writer.finish().unwrap();
}

/// Create a valid ZIP archive containing multiple files
fn create_zip_archive_multi(archive_path: &Path, files: &[(&str, &[u8])]) {
    let file = std::fs::File::create(archive_path).unwrap();
    let mut writer = ::zip::ZipWriter::new(file);
    let options =
        ::zip::write::FileOptions::default().compression_method(::zip::CompressionMethod::Stored);
    for (name, content) in files {
        writer.start_file(*name, options).unwrap();
        std::io::Write::write_all(&mut writer, content).unwrap();
    }
    writer.finish().unwrap();
}

/// Create a ZIP archive with an explicit directory entry plus a nested file
fn create_zip_with_directory(archive_path: &Path) {
    let file = std::fs::File::create(archive_path).unwrap();
    let mut writer = ::zip::ZipWriter::new(file);
    let options =
        ::zip::write::FileOptions::default().compression_method(::zip::CompressionMethod::Stored);
    writer.add_directory("lib/", options).unwrap();
    writer.start_file("lib/app.so", options).unwrap();
    std::io::Write::write_all(&mut writer, b"binary").unwrap();
    writer.finish().unwrap();
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

#[test]
fn extracts_single_file_to_destination() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("APK1.zip");
    let dest = dir.path().join("repo");
    create_zip_archive(&archive, "app-release.apk", b"apk bytes");

    let files = ZipExtractor::extract(&archive, &dest).unwrap();

    assert_eq!(files, vec![dest.join("app-release.apk")]);
    assert_eq!(std::fs::read(&files[0]).unwrap(), b"apk bytes");
}

#[test]
fn extracts_nested_entries_creating_parent_directories() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("APK2.zip");
    let dest = dir.path().join("repo");
    create_zip_archive_multi(
        &archive,
        &[
            ("app.apk", b"apk".as_slice()),
            ("meta/version.txt", b"1.2.3".as_slice()),
            ("meta/notes/changelog.md", b"fixed things".as_slice()),
        ],
    );

    let files = ZipExtractor::extract(&archive, &dest).unwrap();

    assert_eq!(files.len(), 3);
    assert_eq!(
        std::fs::read_to_string(dest.join("meta/version.txt")).unwrap(),
        "1.2.3"
    );
    assert_eq!(
        std::fs::read_to_string(dest.join("meta/notes/changelog.md")).unwrap(),
        "fixed things"
    );
}

#[test]
fn directory_entries_are_created_but_not_listed() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("APK3.zip");
    let dest = dir.path().join("repo");
    create_zip_with_directory(&archive);

    let files = ZipExtractor::extract(&archive, &dest).unwrap();

    assert!(dest.join("lib").is_dir());
    assert_eq!(files, vec![dest.join("lib/app.so")]);
}

#[test]
fn creates_missing_destination_directory() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("APK4.zip");
    let dest = dir.path().join("deep/nested/repo");
    create_zip_archive(&archive, "file.txt", b"x");

    ZipExtractor::extract(&archive, &dest).unwrap();

    assert!(dest.join("file.txt").is_file());
}

#[test]
fn re_extraction_overwrites_existing_files() {
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("repo");

    let first = dir.path().join("APK5.zip");
    create_zip_archive(&first, "app.apk", b"old build");
    ZipExtractor::extract(&first, &dest).unwrap();

    let second = dir.path().join("APK6.zip");
    create_zip_archive(&second, "app.apk", b"new build");
    ZipExtractor::extract(&second, &dest).unwrap();

    assert_eq!(std::fs::read(dest.join("app.apk")).unwrap(), b"new build");
}

#[test]
fn empty_archive_extracts_nothing() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("empty.zip");
    let dest = dir.path().join("repo");

    let file = std::fs::File::create(&archive).unwrap();
    let mut writer = ::zip::ZipWriter::new(file);
    writer.finish().unwrap();

    let files = ZipExtractor::extract(&archive, &dest).unwrap();
    assert!(files.is_empty());
    assert!(dest.is_dir());
}

#[cfg(unix)]
#[test]
fn unix_permission_bits_are_applied() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("APK7.zip");
    let dest = dir.path().join("repo");

    let file = std::fs::File::create(&archive).unwrap();
    let mut writer = ::zip::ZipWriter::new(file);
    let options = ::zip::write::FileOptions::default()
        .compression_method(::zip::CompressionMethod::Stored)
        .unix_permissions(0o755);
    writer.start_file("run.sh", options).unwrap();
    std::io::Write::write_all(&mut writer, b"#!/bin/sh\n").unwrap();
    writer.finish().unwrap();

    ZipExtractor::extract(&archive, &dest).unwrap();

    let mode = std::fs::metadata(dest.join("run.sh")).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o755);
}

#[cfg(unix)]
#[test]
fn unix_permission_bits_are_applied_to_directories() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("APK8.zip");
    let dest = dir.path().join("repo");

    let file = std::fs::File::create(&archive).unwrap();
    let mut writer = ::zip::ZipWriter::new(file);
    let options = ::zip::write::FileOptions::default()
        .compression_method(::zip::CompressionMethod::Stored)
        .unix_permissions(0o700);
    writer.add_directory("private/", options).unwrap();
    writer.start_file("private/secret.txt", options).unwrap();
    std::io::Write::write_all(&mut writer, b"x").unwrap();
    writer.finish().unwrap();

    ZipExtractor::extract(&archive, &dest).unwrap();

    let mode = std::fs::metadata(dest.join("private"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o700);
    assert!(dest.join("private/secret.txt").is_file());
}

// ---------------------------------------------------------------------------
// Failure cases
// ---------------------------------------------------------------------------

#[test]
fn traversal_entry_aborts_extraction() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("evil.zip");
    let dest = dir.path().join("repo");
    create_zip_archive_multi(
        &archive,
        &[
            ("safe.txt", b"fine".as_slice()),
            ("../escape.txt", b"not fine".as_slice()),
            ("after.txt", b"never reached".as_slice()),
        ],
    );

    let err = ZipExtractor::extract(&archive, &dest).unwrap_err();

    match err {
        Error::Extract(ExtractError::PathTraversal { entry, .. }) => {
            assert_eq!(entry, "../escape.txt");
        }
        other => panic!("expected PathTraversal, got {other:?}"),
    }

    // Nothing is written outside the destination and nothing for the
    // offending entry or any entry after it
    assert!(!dir.path().join("escape.txt").exists());
    assert!(!dest.join("after.txt").exists());
    // Entries before the offending one were already on disk
    assert!(dest.join("safe.txt").is_file());
}

#[test]
fn absolute_path_entry_aborts_extraction() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("abs.zip");
    let dest = dir.path().join("repo");
    create_zip_archive(&archive, "/tmp/abs-escape.txt", b"x");

    let err = ZipExtractor::extract(&archive, &dest).unwrap_err();

    assert!(matches!(
        err,
        Error::Extract(ExtractError::PathTraversal { .. })
    ));
    assert!(!Path::new("/tmp/abs-escape.txt").exists());
}

#[test]
fn missing_archive_is_an_open_error() {
    let dir = TempDir::new().unwrap();
    let err = ZipExtractor::extract(&dir.path().join("nope.zip"), &dir.path().join("repo"))
        .unwrap_err();
    assert!(matches!(err, Error::Extract(ExtractError::Open { .. })));
}

#[test]
fn garbage_bytes_are_an_open_error() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("garbage.zip");
    std::fs::write(&archive, b"this is not a zip file").unwrap();

    let err = ZipExtractor::extract(&archive, &dir.path().join("repo")).unwrap_err();
    match err {
        Error::Extract(ExtractError::Open { reason, .. }) => {
            assert!(reason.contains("not a valid zip archive"), "reason: {reason}");
        }
        other => panic!("expected Open error, got {other:?}"),
    }
}

#[test]
fn error_message_names_the_offending_entry() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("evil.zip");
    create_zip_archive(&archive, "../../etc/cron.d/evil", b"x");

    let err = ZipExtractor::extract(&archive, &dir.path().join("repo")).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("../../etc/cron.d/evil"), "message: {msg}");
    assert!(msg.contains("escapes the destination"), "message: {msg}");
}
