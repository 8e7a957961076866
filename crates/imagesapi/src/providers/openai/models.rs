use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::types::ImagePayload;

#[derive(Debug, Default, Deserialize)]
pub struct ImagesResponse {
    /// Elements that are not objects with string fields read as `None`, and a
    /// `data` that is not an array reads as empty.
    #[serde(default, deserialize_with = "lenient_data")]
    pub data: Vec<Option<ImageDatum>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ImageDatum {
    pub b64_json: Option<String>,
    pub url: Option<String>,
    pub revised_prompt: Option<String>,
}

impl ImagesResponse {
    /// Only the first element is consulted. Empty strings count as absent.
    pub fn into_payload(self) -> ImagePayload {
        let Some(first) = self.data.into_iter().next().flatten() else {
            return ImagePayload::Missing;
        };

        let present = |value: Option<String>| value.filter(|value| !value.trim().is_empty());

        if let Some(data) = present(first.b64_json) {
            ImagePayload::Inline(data)
        } else if let Some(url) = present(first.url) {
            ImagePayload::Remote(url.trim().to_string())
        } else {
            ImagePayload::Missing
        }
    }
}

fn lenient_data<'de, D>(deserializer: D) -> Result<Vec<Option<ImageDatum>>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };

    Ok(items
        .into_iter()
        .map(|item| serde_json::from_value(item).ok())
        .collect())
}
