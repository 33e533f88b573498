//! Enumeration of unprocessed uploads in the input area.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::types::ImageFormat;

/// Discover supported image files sitting in the input area.
///
/// The input area is flat, so traversal does not recurse. Results come
/// back sorted by name for a deterministic batch order.
pub fn discover_uploads(input_dir: &Path) -> Result<Vec<PathBuf>> {
    if !input_dir.exists() {
        return Err(Error::Storage(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("input area does not exist: {}", input_dir.display()),
        )));
    }

    let mut uploads = Vec::new();
    for entry in WalkDir::new(input_dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        if is_image_path(entry.path()) {
            uploads.push(entry.path().to_path_buf());
        }
    }

    uploads.sort();
    Ok(uploads)
}

/// Returns if the given path has a supported image extension
pub fn is_image_path(path: &Path) -> bool {
    match ImageFormat::from_path(path) {
        Some(format) => format.is_supported(),
        None => false,
    }
}

// -- Tests --

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::tempdir;

    fn create_test_image(dir: &Path, name: &str, ext: &str) -> PathBuf {
        let file_path = dir.join(format!("{}.{}", name, ext));
        let mut file = File::create(&file_path).unwrap();
        // Write some dummy data to simulate an image
        file.write_all(b"DUMMY IMAGE DATA").unwrap();
        file_path
    }

    #[test]
    fn test_is_image_path() {
        assert!(is_image_path(Path::new("test.jpg")));
        assert!(is_image_path(Path::new("test.JPEG")));
        assert!(is_image_path(Path::new("test.png")));
        assert!(is_image_path(Path::new("test.webp")));
        assert!(!is_image_path(Path::new("test.txt")));
        assert!(!is_image_path(Path::new("test")));
    }

    #[test]
    fn test_discover_uploads_sorted_and_filtered() {
        let dir = tempdir().unwrap();
        let b = create_test_image(dir.path(), "b_photo", "png");
        let a = create_test_image(dir.path(), "a_photo", "jpg");

        let non_image_path = dir.path().join("document.txt");
        let mut file = File::create(&non_image_path).unwrap();
        file.write_all(b"NOT AN IMAGE").unwrap();

        let uploads = discover_uploads(dir.path()).unwrap();
        assert_eq!(uploads, vec![a, b]);
    }

    #[test]
    fn test_discover_uploads_does_not_recurse() {
        let dir = tempdir().unwrap();
        create_test_image(dir.path(), "top", "jpg");

        let subdir = dir.path().join("nested");
        fs::create_dir(&subdir).unwrap();
        create_test_image(&subdir, "nested", "jpg");

        let uploads = discover_uploads(dir.path()).unwrap();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].file_name().unwrap(), "top.jpg");
    }

    #[test]
    fn test_discover_uploads_missing_directory() {
        let result = discover_uploads(Path::new("/path/that/does/not/exist"));
        assert!(result.is_err());
    }
}
