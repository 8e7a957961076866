use std::io;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use tokio::fs;
use url::Url;

use crate::constants::IMAGE_EXTENSIONS;
use crate::models::ImageEntry;

pub fn absolute_path(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

pub fn file_url(path: &Path) -> String {
    Url::from_file_path(path)
        .map(|url| url.to_string())
        .unwrap_or_else(|_| format!("file://{}", path.display()))
}

pub fn is_image_extension(extension: &str) -> bool {
    IMAGE_EXTENSIONS
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(extension))
}

pub fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(is_image_extension)
        .unwrap_or(false)
}

pub fn resolve_mime_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or("application/octet-stream")
        .to_string()
}

/// Rejects prefixes that could escape the output directory once joined.
pub fn sanitize_name_prefix(prefix: &str) -> Option<String> {
    let trimmed = prefix.trim();
    if trimmed.is_empty()
        || trimmed.contains(['/', '\\'])
        || trimmed.contains("..")
        || trimmed.contains('\0')
    {
        return None;
    }

    Some(trimmed.to_string())
}

/// Lists allowed image files in `dir`, newest first. Files with equal
/// modification times keep directory enumeration order.
pub async fn collect_directory_images(dir: &Path) -> Result<Vec<ImageEntry>, String> {
    let dir = absolute_path(dir)
        .map_err(|err| format!("Unable to resolve directory '{}': {}", dir.display(), err))?;
    let mut images_with_timestamp: Vec<(ImageEntry, u128)> = Vec::new();

    let mut entries = fs::read_dir(&dir)
        .await
        .map_err(|err| format!("Unable to read directory '{}': {}", dir.display(), err))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|err| format!("Failed to iterate directory '{}': {}", dir.display(), err))?
    {
        let file_type = entry
            .file_type()
            .await
            .map_err(|err| format!("Failed to read file type: {}", err))?;

        if !file_type.is_file() {
            continue;
        }

        let path = entry.path();
        if !has_image_extension(&path) {
            continue;
        }

        let file_name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(_) => continue,
        };

        let metadata = fs::metadata(&path)
            .await
            .map_err(|err| format!("Failed to read metadata for '{}': {}", path.display(), err))?;

        let modified_time = metadata
            .modified()
            .ok()
            .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
            .map(|duration| duration.as_nanos())
            .unwrap_or(0);

        let image = ImageEntry {
            name: file_name,
            url: file_url(&path),
            mime_type: resolve_mime_type(&path),
            path,
        };
        images_with_timestamp.push((image, modified_time));
    }

    images_with_timestamp.sort_by(|a, b| b.1.cmp(&a.1));

    Ok(images_with_timestamp
        .into_iter()
        .map(|(image, _)| image)
        .collect())
}

/// Parses `<prefix>-<digits>.<ext>` and returns the digit group.
pub fn parse_sequence(file_name: &str, prefix: &str) -> Option<u64> {
    let rest = file_name.strip_prefix(prefix)?.strip_prefix('-')?;
    let (digits, extension) = rest.split_once('.')?;

    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    if !is_image_extension(extension) {
        return None;
    }

    digits.parse().ok()
}

/// Next free suffix for `prefix` in `dir`. An unreadable directory counts as
/// empty. Not a lock: two concurrent callers can get the same number.
/// `None` once the highest existing suffix is `u64::MAX`.
pub async fn next_sequence(dir: &Path, prefix: &str) -> Option<u64> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(err) => {
            tracing::debug!(dir = %dir.display(), %err, "sequence scan skipped");
            return Some(1);
        }
    };

    let mut highest = 0u64;
    while let Ok(Some(entry)) = entries.next_entry().await {
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if let Some(sequence) = parse_sequence(&name, prefix) {
            highest = highest.max(sequence);
        }
    }

    highest.checked_add(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::{Duration, SystemTime};

    fn touch(dir: &Path, name: &str, age_secs: u64) -> PathBuf {
        let path = dir.join(name);
        let file = File::create(&path).unwrap();
        file.set_modified(SystemTime::now() - Duration::from_secs(age_secs))
            .unwrap();
        path
    }

    #[tokio::test]
    async fn lists_newest_first() {
        let temp = tempfile::tempdir().unwrap();
        touch(temp.path(), "a.png", 600);
        touch(temp.path(), "b.jpg", 10);

        let images = collect_directory_images(temp.path()).await.unwrap();
        let names: Vec<_> = images.iter().map(|image| image.name.as_str()).collect();
        assert_eq!(names, ["b.jpg", "a.png"]);
    }

    #[tokio::test]
    async fn lists_only_allowed_image_files() {
        let temp = tempfile::tempdir().unwrap();
        touch(temp.path(), "keep.WEBP", 30);
        touch(temp.path(), "keep.jpeg", 20);
        touch(temp.path(), "notes.txt", 10);
        touch(temp.path(), "noext", 10);
        std::fs::create_dir(temp.path().join("folder.png")).unwrap();

        let images = collect_directory_images(temp.path()).await.unwrap();
        let names: Vec<_> = images.iter().map(|image| image.name.as_str()).collect();
        assert_eq!(names, ["keep.jpeg", "keep.WEBP"]);
    }

    #[tokio::test]
    async fn entries_carry_absolute_path_and_file_url() {
        let temp = tempfile::tempdir().unwrap();
        touch(temp.path(), "shot.png", 0);

        let images = collect_directory_images(temp.path()).await.unwrap();
        let image = &images[0];
        assert!(image.path.is_absolute());
        assert!(image.path.ends_with("shot.png"));
        assert!(image.url.starts_with("file://"));
        assert!(image.url.ends_with("/shot.png"));
        assert_eq!(image.mime_type, "image/png");
    }

    #[tokio::test]
    async fn missing_directory_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let err = collect_directory_images(&temp.path().join("absent"))
            .await
            .unwrap_err();
        assert!(err.starts_with("Unable to read directory"));
    }

    #[tokio::test]
    async fn next_sequence_follows_highest_match() {
        let temp = tempfile::tempdir().unwrap();
        for name in ["generated-3.png", "generated-7.jpg", "generated-2.png"] {
            touch(temp.path(), name, 0);
        }

        assert_eq!(next_sequence(temp.path(), "generated").await, Some(8));
    }

    #[tokio::test]
    async fn next_sequence_ignores_near_misses() {
        let temp = tempfile::tempdir().unwrap();
        for name in [
            "generated-40.txt",
            "generated-x.png",
            "generated-.png",
            "generated-5",
            "other-90.png",
            "generated_60.png",
            "generatedx-70.png",
        ] {
            touch(temp.path(), name, 0);
        }

        assert_eq!(next_sequence(temp.path(), "generated").await, Some(1));
    }

    #[tokio::test]
    async fn next_sequence_matches_extension_case_insensitively() {
        let temp = tempfile::tempdir().unwrap();
        touch(temp.path(), "fox-12.PNG", 0);
        touch(temp.path(), "fox-3.Jpeg", 0);

        assert_eq!(next_sequence(temp.path(), "fox").await, Some(13));
    }

    #[tokio::test]
    async fn next_sequence_starts_at_one_for_unreadable_directory() {
        let temp = tempfile::tempdir().unwrap();
        assert_eq!(next_sequence(&temp.path().join("absent"), "generated").await, Some(1));
    }

    #[tokio::test]
    async fn next_sequence_stops_at_the_largest_suffix() {
        let temp = tempfile::tempdir().unwrap();
        touch(temp.path(), "generated-18446744073709551615.png", 0);
        touch(temp.path(), "generated-99999999999999999999.png", 0);

        assert_eq!(next_sequence(temp.path(), "generated").await, None);
        assert_eq!(next_sequence(temp.path(), "other").await, Some(1));
    }

    #[test]
    fn parse_sequence_reads_digit_group() {
        assert_eq!(parse_sequence("generated-007.gif", "generated"), Some(7));
        assert_eq!(parse_sequence("my-shot-2.png", "my-shot"), Some(2));
        assert_eq!(parse_sequence("generated-2.tar.png", "generated"), None);
    }

    #[test]
    fn sanitize_rejects_path_like_prefixes() {
        assert_eq!(sanitize_name_prefix("  fox "), Some("fox".into()));
        assert_eq!(sanitize_name_prefix("../fox"), None);
        assert_eq!(sanitize_name_prefix("a/b"), None);
        assert_eq!(sanitize_name_prefix("a\\b"), None);
        assert_eq!(sanitize_name_prefix("   "), None);
    }
}
