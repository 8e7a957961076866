use std::path::Path;

use imagesapi::utils::{
    DEFAULT_IMAGE_EXTENSION, decode_base64_image, extension_for_content_type, normalize_base_url,
};
use imagesapi::{ImageBackend, ImageClient, ImagePayload};
use tokio::fs;

use crate::constants::DEFAULT_NAME_PREFIX;
use crate::errors::GenerateError;
use crate::fs_utils::{absolute_path, file_url, next_sequence, sanitize_name_prefix};
use crate::models::{GenerateImageRequest, GenerationResult};
use crate::session::Session;

/// Requests one image and saves it as `<prefix>-<n>.<ext>` in the output
/// directory. All validation happens before the first request goes out.
pub async fn generate_image<B: ImageBackend>(
    backend: &B,
    payload: GenerateImageRequest,
) -> Result<GenerationResult, GenerateError> {
    let base_url = normalize_base_url(&payload.base_url);
    if base_url.is_empty() {
        return Err(GenerateError::BaseUrlRequired);
    }

    let prompt = payload.prompt.trim();
    if prompt.is_empty() {
        return Err(GenerateError::PromptRequired);
    }

    let output_dir = payload.output_dir.trim();
    if output_dir.is_empty() {
        return Err(GenerateError::OutputDirRequired);
    }

    let prefix = resolve_name_prefix(payload.name_prefix.as_deref())?;
    let client = ImageClient::new(&base_url, payload.api_key.trim(), payload.model.as_str());

    tracing::info!(
        endpoint = %client.generations_url(),
        model = client.model(),
        "requesting image generation"
    );

    let response = backend
        .generate(&client, prompt)
        .await
        .map_err(GenerateError::from_api)?;

    let (bytes, extension) = match response.into_payload() {
        ImagePayload::Inline(data) => {
            tracing::debug!(encoded_len = data.len(), "response carries inline image");
            let bytes = decode_base64_image(&data).map_err(GenerateError::Request)?;
            (bytes, DEFAULT_IMAGE_EXTENSION)
        }
        ImagePayload::Remote(url) => {
            tracing::debug!(%url, "response carries image url, downloading");
            let image = backend
                .download(&url)
                .await
                .map_err(GenerateError::from_download)?;
            let extension = extension_for_content_type(image.content_type.as_deref());
            (image.bytes, extension)
        }
        ImagePayload::Missing => return Err(GenerateError::UnparseableResponse),
    };

    let output_dir = absolute_path(Path::new(output_dir)).map_err(|source| GenerateError::Write {
        path: output_dir.into(),
        source,
    })?;

    let sequence = next_sequence(&output_dir, &prefix)
        .await
        .ok_or_else(|| GenerateError::SequenceExhausted(prefix.clone()))?;
    let target_path = output_dir.join(format!("{prefix}-{sequence}.{extension}"));

    fs::write(&target_path, &bytes)
        .await
        .map_err(|source| GenerateError::Write {
            path: target_path.clone(),
            source,
        })?;

    tracing::info!(path = %target_path.display(), size = bytes.len(), "saved generated image");

    Ok(GenerationResult {
        saved_url: file_url(&target_path),
        saved_path: target_path,
    })
}

/// Runs the pipeline for the session's current provider and directories,
/// keeping the busy flag and status text in step.
pub async fn generate_for_session<B: ImageBackend>(
    session: &mut Session,
    backend: &B,
    prompt: &str,
) -> Result<GenerationResult, String> {
    session.begin("Generating...")?;

    let request = session.generation_request(prompt);
    match generate_image(backend, request).await {
        Ok(result) => {
            session.finish(format!("Saved: {}", result.saved_path.display()));
            Ok(result)
        }
        Err(err) => {
            let message = err.to_string();
            tracing::warn!(error = %message, "image generation failed");
            session.finish(message.clone());
            Err(message)
        }
    }
}

fn resolve_name_prefix(candidate: Option<&str>) -> Result<String, GenerateError> {
    match candidate.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(DEFAULT_NAME_PREFIX.to_string()),
        Some(value) => sanitize_name_prefix(value)
            .ok_or_else(|| GenerateError::InvalidNamePrefix(value.to_string())),
    }
}
