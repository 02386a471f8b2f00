//! 撮影ソースのスキャン
//!
//! FileCamera のファインダーとなる画像ファイル／フォルダを列挙する。

use crate::error::CaptureError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub file_name: String,
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "JPG", "JPEG", "PNG"];

/// 撮影ソースから画像を列挙
///
/// - ファイル指定: そのファイル1枚（拡張子は問わない）
/// - フォルダ指定: 直下の画像をファイル名順
pub fn scan_source(source: &Path) -> Result<Vec<ImageInfo>, CaptureError> {
    if !source.exists() {
        return Err(CaptureError::SourceNotFound(source.display().to_string()));
    }

    if source.is_file() {
        return Ok(vec![ImageInfo {
            path: source.to_path_buf(),
            file_name: file_name_of(source),
        }]);
    }

    let mut images = Vec::new();

    for entry in WalkDir::new(source)
        .max_depth(1)  // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        if let Some(ext) = path.extension() {
            if is_image_extension(&ext.to_string_lossy()) {
                images.push(ImageInfo {
                    path: path.to_path_buf(),
                    file_name: file_name_of(path),
                });
            }
        }
    }

    // ファイル名でソート
    images.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(images)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.contains(&ext)
}
