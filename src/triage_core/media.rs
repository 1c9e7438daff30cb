use std::path::Path;

/// Image file extensions (lowercase).
const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "tiff", "tif", "webp", "heic", "heif", "avif",
];

/// Video file extensions (lowercase).
const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mov", "m4v", "avi", "mkv", "webm", "3gp", "wmv",
];

/// Extension carried by export sidecar files.
pub const SIDECAR_EXTENSION: &str = "json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Detect the media kind of a file from its extension.
///
/// Only the fixed extension sets above are supported; anything else
/// (including sidecars) is not treated as media.
pub fn detect_media_kind(path: &Path) -> Option<MediaKind> {
    let ext = path.extension().and_then(|e| e.to_str())?;
    let ext_lower = ext.to_lowercase();

    if IMAGE_EXTENSIONS.contains(&ext_lower.as_str()) {
        return Some(MediaKind::Image);
    }

    if VIDEO_EXTENSIONS.contains(&ext_lower.as_str()) {
        return Some(MediaKind::Video);
    }

    None
}

/// Check if a file is an image based on its extension.
pub fn is_image(path: &Path) -> bool {
    detect_media_kind(path) == Some(MediaKind::Image)
}

/// Check if a file is an export sidecar based on its extension.
pub fn is_sidecar(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(SIDECAR_EXTENSION))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_image_extensions() {
        assert_eq!(detect_media_kind(Path::new("photo.jpg")), Some(MediaKind::Image));
        assert_eq!(detect_media_kind(Path::new("photo.HEIC")), Some(MediaKind::Image));
        assert_eq!(detect_media_kind(Path::new("shot.PNG")), Some(MediaKind::Image));
    }

    #[test]
    fn test_detect_video_extensions() {
        assert_eq!(detect_media_kind(Path::new("video.mp4")), Some(MediaKind::Video));
        assert_eq!(detect_media_kind(Path::new("video.MOV")), Some(MediaKind::Video));
        assert_eq!(detect_media_kind(Path::new("clip.3gp")), Some(MediaKind::Video));
    }

    #[test]
    fn test_detect_unsupported_extension() {
        assert_eq!(detect_media_kind(Path::new("file.xyz")), None);
        assert_eq!(detect_media_kind(Path::new("photo.jpg.json")), None);
        assert_eq!(detect_media_kind(Path::new("noext")), None);
    }

    #[test]
    fn test_is_sidecar() {
        assert!(is_sidecar(Path::new("photo.jpg.json")));
        assert!(is_sidecar(Path::new("PHOTO.JPG.JSON")));
        assert!(!is_sidecar(Path::new("photo.jpg")));
    }
}
