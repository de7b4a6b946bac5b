//! 画像ファイル読み込み
//!
//! MIMEタイプは内容から判定し、判定できない形式（HEIC等）は拡張子で補う。

use crate::error::{Result, TableScanError};
use crate::gateway::ImageInput;
use image::ImageFormat;
use std::path::Path;
use tracing::debug;

/// 拡張子 → MIMEタイプ
const IMAGE_EXTENSIONS: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("webp", "image/webp"),
    ("gif", "image/gif"),
    ("heic", "image/heic"),
    ("heif", "image/heif"),
];

/// 画像ファイルを読み込む
pub fn load_image(path: &Path) -> Result<ImageInput> {
    if !path.is_file() {
        return Err(TableScanError::FileNotFound(path.display().to_string()));
    }

    let data = std::fs::read(path)?;
    let mime_type = detect_mime_type(path, &data)
        .ok_or_else(|| TableScanError::UnsupportedImage(path.display().to_string()))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    debug!(file = %file_name, mime = mime_type, bytes = data.len(), "画像読み込み");

    Ok(ImageInput {
        file_name,
        mime_type: mime_type.to_string(),
        data,
    })
}

fn detect_mime_type(path: &Path, data: &[u8]) -> Option<&'static str> {
    if let Ok(format) = image::guess_format(data) {
        if is_supported_format(format) {
            return Some(format.to_mime_type());
        }
    }

    let ext = path.extension()?.to_string_lossy().to_lowercase();
    IMAGE_EXTENSIONS
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}

fn is_supported_format(format: ImageFormat) -> bool {
    matches!(
        format,
        ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::WebP | ImageFormat::Gif
    )
}
