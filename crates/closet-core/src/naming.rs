//! Naming and storage policy for the three image areas.
//!
//! Files move between three flat directories: *input* holds freshly
//! uploaded originals, *output* holds extracted results and composites,
//! *archive* holds originals that were archived after processing. An
//! original is never present in both input and archive at once.

use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::log_fs_modification;

/// Handle to the three storage areas
#[derive(Debug, Clone)]
pub struct StorageAreas {
    input: PathBuf,
    output: PathBuf,
    archive: PathBuf,
}

impl StorageAreas {
    /// Build the storage areas from configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            input: config.input_dir.clone(),
            output: config.output_dir.clone(),
            archive: config.archive_dir.clone(),
        }
    }

    /// Assure that all three area directories exist
    pub fn ensure_exists(&self) -> Result<()> {
        for dir in [&self.input, &self.output, &self.archive] {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    pub fn input_dir(&self) -> &Path {
        &self.input
    }

    pub fn output_dir(&self) -> &Path {
        &self.output
    }

    pub fn archive_dir(&self) -> &Path {
        &self.archive
    }

    /// Write raw upload bytes into the input area.
    ///
    /// The file keeps its original name where possible; a numeric suffix
    /// is appended if that name is already taken.
    pub fn stage_upload(&self, bytes: &[u8], filename: &str) -> Result<PathBuf> {
        let safe = sanitize_filename(filename)?;
        let name = disambiguate(&self.input, &safe, |p| p.exists());
        let path = self.input.join(&name);
        fs::write(&path, bytes)?;
        log_fs_modification("stage_upload", &path, None);
        Ok(path)
    }

    /// Write extracted image bytes into the output area under `filename`
    pub fn write_output(&self, bytes: &[u8], filename: &str) -> Result<PathBuf> {
        let path = self.output.join(filename);
        fs::write(&path, bytes)?;
        log_fs_modification("write_output", &path, None);
        Ok(path)
    }

    /// Move an original from the input area to the archive area.
    ///
    /// The move is a rename, so the file exists in exactly one of the two
    /// areas at any point. A name collision in the archive is resolved
    /// with a numeric suffix rather than an overwrite.
    pub fn archive_original(&self, input_path: &Path) -> Result<PathBuf> {
        let filename = input_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                Error::Validation(format!("invalid input path: {}", input_path.display()))
            })?;

        let name = disambiguate(&self.archive, filename, |p| p.exists());
        let dest = self.archive.join(&name);
        fs::rename(input_path, &dest)?;
        info!("Archived {} -> {}", input_path.display(), dest.display());
        Ok(dest)
    }
}

/// Lowercase and trim an article label, collapsing internal whitespace
pub fn sanitize_article(article: &str) -> String {
    article
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Derive the output filename for an extracted item:
/// `<source-stem> - <article>.png`
pub fn output_filename(source: &Path, article: &str) -> String {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("upload");
    format!("{} - {}.png", stem, sanitize_article(article))
}

/// Strip any path components from an upload filename
fn sanitize_filename(filename: &str) -> Result<String> {
    let name = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string);

    match name {
        Some(n) if !n.is_empty() => Ok(n),
        _ => Err(Error::Validation(format!(
            "invalid upload filename: {:?}",
            filename
        ))),
    }
}

/// Append ` (n)` before the extension until `taken` reports no collision.
///
/// `taken` is consulted with the candidate's full path in `dir`; callers
/// that also need catalog-level uniqueness fold that check into the
/// closure.
pub fn disambiguate<F>(dir: &Path, filename: &str, taken: F) -> String
where
    F: Fn(&Path) -> bool,
{
    if !taken(&dir.join(filename)) {
        return filename.to_string();
    }

    let path = Path::new(filename);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);
    let ext = path.extension().and_then(|e| e.to_str());

    let mut counter = 1;
    loop {
        let candidate = match ext {
            Some(ext) => format!("{} ({}).{}", stem, counter, ext),
            None => format!("{} ({})", stem, counter),
        };
        if !taken(&dir.join(&candidate)) {
            return candidate;
        }
        counter += 1;
    }
}

// -- Tests --

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn areas(root: &Path) -> StorageAreas {
        let mut config = Config::default();
        config.input_dir = root.join("input");
        config.output_dir = root.join("output");
        config.archive_dir = root.join("archive");
        let areas = StorageAreas::from_config(&config);
        areas.ensure_exists().unwrap();
        areas
    }

    #[test]
    fn test_output_filename() {
        assert_eq!(
            output_filename(Path::new("photo1.jpg"), "sweater"),
            "photo1 - sweater.png"
        );
        assert_eq!(
            output_filename(Path::new("IMG_0042.JPEG"), "  Blue  Jeans "),
            "IMG_0042 - blue jeans.png"
        );
    }

    #[test]
    fn test_disambiguate_counts_up() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("photo1 - sweater.png"), b"x").unwrap();
        std::fs::write(dir.path().join("photo1 - sweater (1).png"), b"x").unwrap();

        let name = disambiguate(dir.path(), "photo1 - sweater.png", |p| p.exists());
        assert_eq!(name, "photo1 - sweater (2).png");
    }

    #[test]
    fn test_disambiguate_no_collision() {
        let dir = tempdir().unwrap();
        let name = disambiguate(dir.path(), "photo1 - sweater.png", |p| p.exists());
        assert_eq!(name, "photo1 - sweater.png");
    }

    #[test]
    fn test_stage_upload_keeps_original_name() {
        let dir = tempdir().unwrap();
        let areas = areas(dir.path());

        let path = areas.stage_upload(b"bytes", "photo1.jpg").unwrap();
        assert_eq!(path.file_name().unwrap(), "photo1.jpg");
        assert!(path.exists());

        // A second upload with the same name must not overwrite the first
        let second = areas.stage_upload(b"other", "photo1.jpg").unwrap();
        assert_eq!(second.file_name().unwrap(), "photo1 (1).jpg");
        assert_eq!(std::fs::read(&path).unwrap(), b"bytes");
    }

    #[test]
    fn test_stage_upload_strips_directories() {
        let dir = tempdir().unwrap();
        let areas = areas(dir.path());

        let path = areas.stage_upload(b"bytes", "../../etc/photo1.jpg").unwrap();
        assert_eq!(path.parent().unwrap(), areas.input_dir());
        assert_eq!(path.file_name().unwrap(), "photo1.jpg");
    }

    #[test]
    fn test_archive_moves_out_of_input() {
        let dir = tempdir().unwrap();
        let areas = areas(dir.path());

        let staged = areas.stage_upload(b"bytes", "photo1.jpg").unwrap();
        let archived = areas.archive_original(&staged).unwrap();

        assert!(!staged.exists());
        assert!(archived.exists());
        assert_eq!(archived.parent().unwrap(), areas.archive_dir());
    }
}
