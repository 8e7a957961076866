pub mod providers;
pub mod types;
pub mod utils;

pub use providers::OpenAiImages;
pub use providers::openai::models::{ImageDatum, ImagesResponse};
pub use types::{DownloadedImage, HttpStatusError, ImageBackend, ImageClient, ImagePayload};
