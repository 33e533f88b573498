use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

/// Custom error types for the closet library
#[derive(Error, Debug)]
pub enum Error {
    /// Bad or missing input from the caller
    #[error("Validation error: {0}")]
    Validation(String),

    /// One or more referenced item ids are absent from the catalog
    #[error("Items not found: {}", format_ids(.0))]
    NotFound(Vec<i64>),

    /// External extraction call failed, timed out, or returned an
    /// unparseable result
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Filesystem write/move failure
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Image decoding or encoding error
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// Invalid configuration error
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Catalog database failure; a storage concern like the filesystem
    #[error("Catalog error: {0}")]
    Catalog(String),
}

fn format_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl Error {
    /// Machine-readable error kind, stable across message wording changes
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::Extraction(_) => "extraction",
            Self::Storage(_) => "storage",
            Self::Image(_) => "image",
            Self::Configuration(_) => "configuration",
            Self::Catalog(_) => "storage",
        }
    }
}

// -- Tests --
