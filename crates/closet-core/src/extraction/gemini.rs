//! Gemini-backed implementation of the extraction capability.
//!
//! One blocking `generateContent` call per extraction. The response is
//! scanned for the first inline image part; everything else is an error.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use log::debug;
use serde::{Deserialize, Serialize};

use super::{extraction_prompt, ExtractionClient, ExtractionError};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Client for the Gemini image generation API
pub struct GeminiClient {
    http: reqwest::blocking::Client,
    api_key: Option<String>,
    model: String,
}

impl GeminiClient {
    /// Create a client for `model`, reading the API key from the
    /// `GEMINI_API_KEY` environment variable (a `.env` file is honoured).
    ///
    /// A missing key is not an error until an extraction is attempted.
    pub fn from_env(model: &str) -> Self {
        dotenv::dotenv().ok();
        let api_key = std::env::var("GEMINI_API_KEY").ok();
        Self {
            http: reqwest::blocking::Client::new(),
            api_key,
            model: model.to_string(),
        }
    }

    pub fn new(model: &str, api_key: String) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            api_key: Some(api_key),
            model: model.to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", API_BASE, self.model)
    }
}

impl ExtractionClient for GeminiClient {
    fn extract(&self, image: &[u8], article: &str) -> Result<Vec<u8>, ExtractionError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ExtractionError::MissingApiKey)?;

        let prompt = extraction_prompt(article);
        debug!("Extraction prompt: {}", prompt);

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part {
                        text: Some(prompt),
                        inline_data: None,
                    },
                    Part {
                        text: None,
                        inline_data: Some(InlineData {
                            mime_type: sniff_mime_type(image).to_string(),
                            data: BASE64.encode(image),
                        }),
                    },
                ],
            }],
        };

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .map_err(|e| ExtractionError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(ExtractionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateContentResponse = response
            .json()
            .map_err(|e| ExtractionError::Parse(e.to_string()))?;

        let image_part = body
            .candidates
            .into_iter()
            .flat_map(|c| c.content.parts)
            .find_map(|part| part.inline_data)
            .ok_or_else(|| {
                ExtractionError::NoImage(format!("no {} found in the photo", article))
            })?;

        BASE64
            .decode(image_part.data.as_bytes())
            .map_err(|e| ExtractionError::Parse(format!("invalid image payload: {}", e)))
    }
}

/// Best-effort mime type from magic bytes; the API only needs a hint
fn sniff_mime_type(image: &[u8]) -> &'static str {
    match image {
        [0x89, b'P', b'N', b'G', ..] => "image/png",
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [b'G', b'I', b'F', b'8', ..] => "image/gif",
        [b'R', b'I', b'F', b'F', ..] => "image/webp",
        _ => "image/png",
    }
}

// -- Wire format --

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

// -- Tests --

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_mime_type() {
        assert_eq!(sniff_mime_type(&[0x89, b'P', b'N', b'G', 0x0D]), "image/png");
        assert_eq!(sniff_mime_type(&[0xFF, 0xD8, 0xFF, 0xE0]), "image/jpeg");
        assert_eq!(sniff_mime_type(b"not an image"), "image/png");
    }

    #[test]
    fn test_response_parsing_finds_inline_image() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "here you go"},
                        {"inlineData": {"mimeType": "image/png", "data": "aGVsbG8="}}
                    ]
                }
            }]
        }"#;

        let body: GenerateContentResponse = serde_json::from_str(json).unwrap();
        let data = body
            .candidates
            .into_iter()
            .flat_map(|c| c.content.parts)
            .find_map(|p| p.inline_data)
            .unwrap();
        assert_eq!(BASE64.decode(data.data).unwrap(), b"hello");
    }

    #[test]
    fn test_response_without_image_is_detected() {
        let json = r#"{
            "candidates": [{
                "content": {"parts": [{"text": "could not find the article"}]}
            }]
        }"#;

        let body: GenerateContentResponse = serde_json::from_str(json).unwrap();
        let image = body
            .candidates
            .into_iter()
            .flat_map(|c| c.content.parts)
            .find_map(|p| p.inline_data);
        assert!(image.is_none());
    }

    #[test]
    fn test_endpoint_includes_model() {
        let client = GeminiClient::new("gemini-2.5-flash-image-preview", "key".into());
        assert!(client
            .endpoint()
            .ends_with("gemini-2.5-flash-image-preview:generateContent"));
    }
}
