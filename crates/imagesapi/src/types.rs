use std::fmt;
use std::future::Future;

use anyhow::Result;
use reqwest::StatusCode;

use crate::providers::openai::models::ImagesResponse;
use crate::utils::normalize_base_url;

pub const DEFAULT_IMAGE_SIZE: &str = "1024x1024";
pub const DEFAULT_IMAGE_COUNT: u32 = 1;
pub const GENERATIONS_PATH: &str = "images/generations";

/// Connection settings for one OpenAI-compatible image endpoint.
#[derive(Clone)]
pub struct ImageClient {
    pub(crate) base_url: String,
    pub(crate) api_key: String,
    pub(crate) model: String,
    pub(crate) size: String,
}

impl ImageClient {
    pub fn new(
        base_url: impl AsRef<str>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let model: String = model.into();
        Self {
            base_url: normalize_base_url(base_url.as_ref()),
            api_key: api_key.into(),
            model: model.trim().to_string(),
            size: DEFAULT_IMAGE_SIZE.to_string(),
        }
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = size.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn size(&self) -> &str {
        &self.size
    }

    pub fn generations_url(&self) -> String {
        format!("{}/{}", self.base_url, GENERATIONS_PATH)
    }
}

impl fmt::Debug for ImageClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageClient")
            .field("base_url", &self.base_url)
            .field("api_key", &if self.api_key.is_empty() { "" } else { "<redacted>" })
            .field("model", &self.model)
            .field("size", &self.size)
            .finish()
    }
}

/// What the first element of a generation response carries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImagePayload {
    Inline(String),
    Remote(String),
    Missing,
}

#[derive(Clone, Debug)]
pub struct DownloadedImage {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// A non-2xx answer from the endpoint. `body` falls back to the status
/// reason phrase when the server sent nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpStatusError {
    pub status: u16,
    pub body: String,
}

impl HttpStatusError {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        let body = body.into();
        let body = if body.trim().is_empty() {
            status.canonical_reason().unwrap_or_default().to_string()
        } else {
            body
        };

        Self {
            status: status.as_u16(),
            body,
        }
    }
}

impl fmt::Display for HttpStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}: {}", self.status, self.body)
    }
}

impl std::error::Error for HttpStatusError {}

pub trait ImageBackend {
    fn generate(
        &self,
        client: &ImageClient,
        prompt: &str,
    ) -> impl Future<Output = Result<ImagesResponse>> + Send;

    fn download(&self, url: &str) -> impl Future<Output = Result<DownloadedImage>> + Send;
}
