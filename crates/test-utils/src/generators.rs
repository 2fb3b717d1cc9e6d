//! Test data generators for CSV sources and value matrices.
//!
//! These generators create predictable, verifiable inputs that can be used
//! across the test suite.

use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::TempDir;

/// Creates a value matrix with predictable values.
///
/// Each entry is calculated as: `day * 1000 + cell`
///
/// # Example
///
/// ```
/// use test_utils::create_ramp_matrix;
///
/// let m = create_ramp_matrix(3, 4);
/// assert_eq!(m.len(), 3);
/// assert_eq!(m[0][1], 1.0);
/// assert_eq!(m[2][3], 2003.0);
/// ```
pub fn create_ramp_matrix(days: usize, cells: usize) -> Vec<Vec<f64>> {
    (0..days)
        .map(|day| (0..cells).map(|cell| (day * 1000 + cell) as f64).collect())
        .collect()
}

/// Builds a CSV document from a header line and pre-formatted rows.
pub fn csv_document(header: &str, rows: &[&str]) -> String {
    let mut out = String::with_capacity(header.len() + rows.len() * 32);
    out.push_str(header);
    out.push('\n');
    for row in rows {
        out.push_str(row);
        out.push('\n');
    }
    out
}

/// Gzip-compresses `contents`.
pub fn gzip_bytes(contents: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(contents)
        .expect("writing into a Vec cannot fail");
    encoder.finish().expect("writing into a Vec cannot fail")
}

/// Writes `contents` to `dir/name` and returns the path.
pub fn write_fixture(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("failed to write fixture file");
    path
}

/// Writes a CSV document into a fresh temporary directory.
///
/// The returned `TempDir` must be kept alive for as long as the file is used.
pub fn temp_csv(name: &str, contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = write_fixture(dir.path(), name, contents.as_bytes());
    (dir, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    #[test]
    fn test_csv_document() {
        let doc = csv_document("a,b", &["1,2", "3,4"]);
        assert_eq!(doc, "a,b\n1,2\n3,4\n");
    }

    #[test]
    fn test_gzip_bytes_decodes() {
        let compressed = gzip_bytes(b"date,cell_id,value\n");
        assert_eq!(&compressed[..2], &[0x1f, 0x8b]);

        let mut decoded = String::new();
        GzDecoder::new(&compressed[..])
            .read_to_string(&mut decoded)
            .unwrap();
        assert_eq!(decoded, "date,cell_id,value\n");
    }

    #[test]
    fn test_temp_csv_written() {
        let (_dir, path) = temp_csv("x.csv", "a\n");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "a\n");
    }
}
