//! Testing utilities for relic-preview
//!
//! Builders for in-memory archive fixtures, so tests never depend on
//! binary files checked into the repository.
//!
//! Only available when compiled with `cfg(test)`.

use std::io::{Cursor, Write};

use flate2::write::GzEncoder;
use flate2::Compression;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Build an uncompressed ZIP archive
///
/// Paths ending in `/` become directory entries; everything else is a file
/// with the given UTF-8 content.
///
/// # Panics
/// Panics if the in-memory writer fails.
pub fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    for (path, content) in entries {
        if path.ends_with('/') {
            writer.add_directory(*path, options).expect("add zip directory");
        } else {
            writer.start_file(*path, options).expect("start zip file");
            writer.write_all(content.as_bytes()).expect("write zip file");
        }
    }

    writer.finish().expect("finish zip").into_inner()
}

/// Build a plain tar archive with the same path conventions as [`zip_bytes`]
///
/// # Panics
/// Panics if the in-memory builder fails.
pub fn tar_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());

    for (path, content) in entries {
        let mut header = tar::Header::new_gnu();
        if path.ends_with('/') {
            header.set_entry_type(tar::EntryType::Directory);
            header.set_mode(0o755);
            header.set_size(0);
            builder
                .append_data(&mut header, path, std::io::empty())
                .expect("append tar directory");
        } else {
            header.set_entry_type(tar::EntryType::Regular);
            header.set_mode(0o644);
            header.set_size(content.len() as u64);
            builder
                .append_data(&mut header, path, content.as_bytes())
                .expect("append tar file");
        }
    }

    builder.into_inner().expect("finish tar")
}

/// Gzip-compress arbitrary bytes
///
/// # Panics
/// Panics if the in-memory encoder fails.
pub fn gzip_bytes(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).expect("write gzip");
    encoder.finish().expect("finish gzip")
}

/// Build a tar.gz archive
pub fn tar_gz_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
    gzip_bytes(&tar_bytes(entries))
}

/// A two-file unified diff with one hunk per file
pub const TWO_FILE_DIFF: &str = "\
diff --git a/src/lib.rs b/src/lib.rs
index 3b18e51..a9c1f2d 100644
--- a/src/lib.rs
+++ b/src/lib.rs
@@ -1,4 +1,5 @@
 pub mod archive;
-pub mod diff;
+pub mod diff;
+pub mod index;
 pub mod registry;
 pub mod units;
diff --git a/README.md b/README.md
index 1111111..2222222 100644
--- a/README.md
+++ b/README.md
@@ -10,3 +10,3 @@ Usage
 Run the tool.
-Old line.
+New line.
 End.
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zip_fixture_has_local_header_magic() {
        let bytes = zip_bytes(&[("a.txt", "a")]);
        assert!(bytes.starts_with(b"PK\x03\x04"));
    }

    #[test]
    fn test_tar_fixture_has_ustar_magic() {
        let bytes = tar_bytes(&[("a.txt", "a")]);
        assert_eq!(&bytes[257..262], b"ustar");
    }

    #[test]
    fn test_gzip_fixture_has_magic() {
        assert!(gzip_bytes(b"x").starts_with(&[0x1f, 0x8b]));
    }
}
