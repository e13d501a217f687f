//! Content-addressed logo storage on the local filesystem

use std::path::PathBuf;

use tracker_core::{ImageError, ImageStore};
use tracker_fs::{NormalizedPath, checksum, io};

/// Image formats accepted as logos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
    Svg,
}

impl ImageFormat {
    /// Classify `data` by its leading bytes.
    pub fn sniff(data: &[u8]) -> Option<Self> {
        if data.starts_with(b"\x89PNG\r\n\x1a\n") {
            return Some(Self::Png);
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }
        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Some(Self::Gif);
        }
        if data.len() >= 12 && &data[..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(Self::Webp);
        }
        if looks_like_svg(data) {
            return Some(Self::Svg);
        }
        None
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::Webp => "webp",
            Self::Svg => "svg",
        }
    }
}

fn looks_like_svg(data: &[u8]) -> bool {
    let head = &data[..data.len().min(512)];
    let Ok(text) = std::str::from_utf8(head) else {
        return false;
    };
    let text = text.trim_start_matches('\u{feff}').trim_start();
    (text.starts_with("<?xml") || text.starts_with("<svg") || text.starts_with("<!--"))
        && text.contains("<svg")
}

/// Writes each image once as `<sha256>.<ext>` under a directory.
#[derive(Debug, Clone)]
pub struct FsImageStore {
    dir: PathBuf,
}

impl FsImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ImageStore for FsImageStore {
    fn save_image(&self, data: &[u8]) -> Result<String, ImageError> {
        let format = ImageFormat::sniff(data).ok_or(ImageError::UnsupportedFormat)?;
        let image_id = checksum::content_hex(data);
        let path = NormalizedPath::new(&self.dir).join(&format!("{image_id}.{}", format.extension()));

        if path.exists() {
            tracing::debug!(image_id = %image_id, "Image already stored");
        } else {
            io::write_atomic(&path, data)?;
        }
        Ok(image_id)
    }
}
