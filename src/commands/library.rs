use std::path::Path;

use crate::fs_utils::collect_directory_images;
use crate::models::ImageEntry;
use crate::session::{STATUS_READY, Session};

/// Lists images under `dir_path`. No directory at all is an empty listing,
/// an unreadable one is an error.
pub async fn list_images(dir_path: Option<&Path>) -> Result<Vec<ImageEntry>, String> {
    let Some(dir) = dir_path.filter(|dir| !dir.as_os_str().is_empty()) else {
        return Ok(Vec::new());
    };

    let images = collect_directory_images(dir).await?;
    tracing::debug!(dir = %dir.display(), count = images.len(), "listed images");
    Ok(images)
}

/// Re-lists the session's image directory under the busy guard.
pub async fn refresh_images(session: &mut Session) -> Result<Vec<ImageEntry>, String> {
    session.begin("Refreshing...")?;

    match list_images(session.image_dir()).await {
        Ok(images) => {
            session.finish(STATUS_READY);
            Ok(images)
        }
        Err(err) => {
            session.finish(err.clone());
            Err(err)
        }
    }
}
