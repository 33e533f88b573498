//! Boundary to the external AI image-isolation capability.
//!
//! The capability is a black box with real latency, a non-zero failure
//! rate, and no byte-level idempotence guarantee. Retry policy, if any,
//! belongs to the caller; nothing in here retries.

mod gemini;

pub use gemini::GeminiClient;

use thiserror::Error;

/// Extraction client errors
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// No API key available in the environment
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,

    /// Transport-level failure (connection, timeout)
    #[error("Request to extraction service failed: {0}")]
    Transport(String),

    /// Service answered with a non-success status
    #[error("Extraction service returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Response parsed but contained no image part
    #[error("Extraction service returned no image: {0}")]
    NoImage(String),

    /// Response body could not be parsed
    #[error("Failed to parse extraction response: {0}")]
    Parse(String),
}

impl From<ExtractionError> for crate::Error {
    fn from(err: ExtractionError) -> Self {
        crate::Error::Extraction(err.to_string())
    }
}

/// A capability that isolates a named clothing article in a photo.
///
/// Given the raw bytes of a photo and an article label, implementations
/// return the bytes of a new image containing only that article.
pub trait ExtractionClient {
    fn extract(&self, image: &[u8], article: &str) -> Result<Vec<u8>, ExtractionError>;
}

/// Build the task prompt instructing the model to isolate `article`
pub fn extraction_prompt(article: &str) -> String {
    format!(
        "I'm going to send you a picture of a {article}, i want you to remove the rest \
         of the image and only show the {article}. Remove any people, pets, or other \
         objects that are not the {article}. I'm trying to make an app that will show \
         all the things in your closet. If you can't find the article, don't return an image."
    )
}

// -- Tests --
