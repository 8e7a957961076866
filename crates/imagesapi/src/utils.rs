use anyhow::{Context, Result};
use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;

use crate::types::{DownloadedImage, HttpStatusError};

pub const DEFAULT_IMAGE_EXTENSION: &str = "png";

/// Accepts padded and unpadded payloads alike.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

pub fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

/// Maps a `Content-Type` header value to a file extension, ignoring
/// parameters such as `charset`. Unknown or absent types map to png.
pub fn extension_for_content_type(content_type: Option<&str>) -> &'static str {
    let Some(value) = content_type else {
        return DEFAULT_IMAGE_EXTENSION;
    };

    let essence = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.as_str() {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => DEFAULT_IMAGE_EXTENSION,
    }
}

pub fn decode_base64_image(data: &str) -> Result<Vec<u8>> {
    let trimmed = data.trim();
    let encoded = match trimmed.strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map(|(_, payload)| payload).unwrap_or(rest),
        None => trimmed,
    };

    let compact: String = encoded
        .chars()
        .filter(|ch| !ch.is_ascii_whitespace())
        .collect();

    LENIENT_BASE64
        .decode(compact)
        .context("Failed to decode base64 image payload")
}

pub async fn download_image(http: &Client, url: &str) -> Result<DownloadedImage> {
    let response = http
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to send request to {}", url))?;

    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string());

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(HttpStatusError::new(status, body).into());
    }

    let bytes = response
        .bytes()
        .await
        .context("Failed to read response bytes")?;

    Ok(DownloadedImage {
        bytes: bytes.to_vec(),
        content_type,
    })
}
