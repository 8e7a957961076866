mod api;
pub mod models;

pub use api::{build_generation_body, send_generation_request};

use anyhow::Result;
use reqwest::Client;

use crate::types::{DownloadedImage, ImageBackend, ImageClient};
use crate::utils::download_image;

use models::ImagesResponse;

/// `ImageBackend` over a shared reqwest client. No timeout is configured, so
/// requests wait as long as the platform's HTTP stack lets them.
#[derive(Clone, Default)]
pub struct OpenAiImages {
    http: Client,
}

impl OpenAiImages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

impl ImageBackend for OpenAiImages {
    async fn generate(&self, client: &ImageClient, prompt: &str) -> Result<ImagesResponse> {
        send_generation_request(&self.http, client, prompt).await
    }

    async fn download(&self, url: &str) -> Result<DownloadedImage> {
        download_image(&self.http, url).await
    }
}
