use anyhow::{Context, Result};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde_json::{Value, json};

use crate::types::{DEFAULT_IMAGE_COUNT, HttpStatusError, ImageClient};

use super::models::ImagesResponse;

pub fn build_generation_body(client: &ImageClient, prompt: &str) -> Value {
    let mut body = json!({
        "prompt": prompt,
        "n": DEFAULT_IMAGE_COUNT,
        "size": client.size(),
    });

    if !client.model().is_empty() {
        body["model"] = json!(client.model());
    }

    body
}

pub async fn send_generation_request(
    http: &Client,
    client: &ImageClient,
    prompt: &str,
) -> Result<ImagesResponse> {
    let url = client.generations_url();
    let body = build_generation_body(client, prompt);

    let mut request = http
        .post(&url)
        .header(CONTENT_TYPE, "application/json")
        .json(&body);

    if !client.api_key().is_empty() {
        request = request.bearer_auth(client.api_key());
    }

    tracing::debug!(%url, model = client.model(), "sending image generation request");

    let response = request
        .send()
        .await
        .with_context(|| format!("Image generation request to {} failed", url))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(HttpStatusError::new(status, body).into());
    }

    let response_text = response
        .text()
        .await
        .context("Failed to read image generation response body")?;

    serde_json::from_str(&response_text).with_context(|| {
        format!(
            "Failed to decode image generation response JSON. Raw response: {}",
            response_text
        )
    })
}
