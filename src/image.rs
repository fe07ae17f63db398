use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::debug;
use std::path::Path;
use tokio::fs;

use crate::error::AnalysisError;

/// An image ready to be sent inline to a vision model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    /// MIME type, e.g. `image/png`
    pub mime_type: String,
    /// Base64-encoded image bytes (no `data:` prefix)
    pub data: String,
}

/// Where an image comes from
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Image from a file path
    Path(String),
    /// Image as base64-encoded data, optionally as a `data:` URL
    Base64 { data: String, mime_type: Option<String> },
}

impl ImageSource {
    /// Resolve the source into an inline image
    pub async fn load(&self) -> Result<ImageInput, AnalysisError> {
        match self {
            ImageSource::Path(path) => ImageInput::from_file(path).await,
            ImageSource::Base64 { data, mime_type } => {
                if data.trim_start().starts_with("data:") {
                    ImageInput::from_data_url(data)
                } else {
                    ImageInput::from_base64(
                        data.clone(),
                        mime_type.clone().unwrap_or_else(|| "image/png".to_string()),
                    )
                }
            }
        }
    }
}

impl ImageInput {
    /// Encode raw image bytes
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Result<Self, AnalysisError> {
        if bytes.is_empty() {
            return Err(AnalysisError::InvalidInput("image is empty".to_string()));
        }
        Ok(Self {
            mime_type: mime_type.into(),
            data: STANDARD.encode(bytes),
        })
    }

    /// Wrap already-encoded data, checking that it is valid base64
    pub fn from_base64(
        data: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Result<Self, AnalysisError> {
        let data: String = data.into().split_whitespace().collect();
        if data.is_empty() {
            return Err(AnalysisError::InvalidInput("image is empty".to_string()));
        }
        STANDARD
            .decode(&data)
            .map_err(|e| AnalysisError::InvalidInput(format!("image is not valid base64: {}", e)))?;
        Ok(Self {
            mime_type: mime_type.into(),
            data,
        })
    }

    /// Parse a `data:<mime>;base64,<payload>` URL
    pub fn from_data_url(url: &str) -> Result<Self, AnalysisError> {
        let rest = url
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| AnalysisError::InvalidInput("not a data URL".to_string()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| AnalysisError::InvalidInput("data URL has no payload".to_string()))?;
        let mime_type = header.strip_suffix(";base64").ok_or_else(|| {
            AnalysisError::InvalidInput("only base64 data URLs are supported".to_string())
        })?;
        if !mime_type.starts_with("image/") {
            return Err(AnalysisError::InvalidInput(format!(
                "unsupported media type `{}`",
                mime_type
            )));
        }
        Self::from_base64(payload, mime_type)
    }

    /// Read and encode an image file; the MIME type is taken from the extension
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, AnalysisError> {
        let path = path.as_ref();
        let mime_type = mime_type_for(path).ok_or_else(|| {
            AnalysisError::InvalidInput(format!("unsupported image type: {}", path.display()))
        })?;
        let bytes = fs::read(path).await?;
        debug!("Read {} bytes from {}", bytes.len(), path.display());
        Self::from_bytes(&bytes, mime_type)
    }

    /// `data:` URL form used by OpenAI-compatible endpoints
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

fn mime_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}
