use std::fmt;
use std::io;
use std::path::PathBuf;

use imagesapi::HttpStatusError;

#[derive(Debug)]
pub enum GenerateError {
    BaseUrlRequired,
    PromptRequired,
    OutputDirRequired,
    InvalidNamePrefix(String),
    Api { status: u16, body: String },
    Download { status: u16, body: String },
    UnparseableResponse,
    SequenceExhausted(String),
    Request(anyhow::Error),
    Write { path: PathBuf, source: io::Error },
}

impl GenerateError {
    /// True for the errors raised before any network or disk access.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::BaseUrlRequired
                | Self::PromptRequired
                | Self::OutputDirRequired
                | Self::InvalidNamePrefix(_)
        )
    }

    pub(crate) fn from_api(err: anyhow::Error) -> Self {
        match err.downcast_ref::<HttpStatusError>() {
            Some(status) => Self::Api {
                status: status.status,
                body: status.body.clone(),
            },
            None => Self::Request(err),
        }
    }

    pub(crate) fn from_download(err: anyhow::Error) -> Self {
        match err.downcast_ref::<HttpStatusError>() {
            Some(status) => Self::Download {
                status: status.status,
                body: status.body.clone(),
            },
            None => Self::Request(err),
        }
    }
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BaseUrlRequired => write!(f, "API base URL is required."),
            Self::PromptRequired => write!(f, "A prompt is required."),
            Self::OutputDirRequired => write!(f, "Choose an output directory first."),
            Self::InvalidNamePrefix(prefix) => write!(f, "Invalid file name prefix: '{}'", prefix),
            Self::Api { status, body } => write!(f, "API request failed ({}): {}", status, body),
            Self::Download { status, body } => {
                write!(f, "Failed to download generated image ({}): {}", status, body)
            }
            Self::UnparseableResponse => write!(
                f,
                "Unable to parse API response (neither data[0].b64_json nor data[0].url was found)"
            ),
            Self::SequenceExhausted(prefix) => write!(
                f,
                "No free sequence number left for prefix '{}'; choose another prefix",
                prefix
            ),
            Self::Request(err) => write!(f, "{:#}", err),
            Self::Write { path, source } => {
                write!(f, "Unable to write '{}': {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for GenerateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Request(err) => Some(&**err),
            Self::Write { source, .. } => Some(source),
            _ => None,
        }
    }
}
