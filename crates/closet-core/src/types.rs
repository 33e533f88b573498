use serde::{Deserialize, Serialize};
use std::path::Path;

/// Supported image formats for uploads
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Webp,
    Other(String),
}

impl ImageFormat {
    /// Determine format from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => Self::Jpeg,
            "png" => Self::Png,
            "gif" => Self::Gif,
            "webp" => Self::Webp,
            other => Self::Other(other.to_string()),
        }
    }

    /// Determine format from a file path, if it has an extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
    }

    /// Check if format is accepted for processing
    pub fn is_supported(&self) -> bool {
        match self {
            Self::Jpeg | Self::Png | Self::Gif | Self::Webp => true,
            Self::Other(_) => false,
        }
    }
}

/// Caller-supplied metadata accompanying an upload.
///
/// All fields are optional; the article label itself is a required
/// argument of `process_upload` and is not duplicated here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadMetadata {
    /// Free-text description of the item
    pub description: Option<String>,

    /// Clothing categories to attach (shirt, pants, shoes, ...)
    pub categories: Vec<String>,

    /// Descriptive tags to attach
    pub tags: Vec<String>,
}

// -- Tests --

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ImageFormat::from_extension("JPG"), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_extension("jpeg"), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_extension("png"), ImageFormat::Png);
        assert_eq!(
            ImageFormat::from_extension("bmp"),
            ImageFormat::Other("bmp".to_string())
        );
    }

    #[test]
    fn test_supported_formats() {
        assert!(ImageFormat::Jpeg.is_supported());
        assert!(ImageFormat::Png.is_supported());
        assert!(!ImageFormat::Other("tiff".to_string()).is_supported());
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ImageFormat::from_path(Path::new("photo1.jpg")),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(ImageFormat::from_path(Path::new("noext")), None);
    }
}
