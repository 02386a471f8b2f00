//! 画像ファイルをファインダーとするカメラ
//!
//! 実機カメラの無い環境向け。撮影のたびにソースの画像を順番に1枚読み込み、
//! 指定品質のJPEGに再エンコードして保存フォルダに書き出す。

use super::{CameraDevice, CameraHandle, CaptureOptions, RawImage};
use crate::error::CaptureError;
use crate::scanner;
use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use nutriscan_common::{PhotoUri, DEFAULT_IMAGE_MIME_TYPE};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

pub struct FileCamera {
    source: PathBuf,
    captures_dir: PathBuf,
    in_use: Arc<AtomicBool>,
    cursor: Arc<AtomicUsize>,
}

impl FileCamera {
    /// # Arguments
    /// * `source` - 画像ファイル、または画像の入ったフォルダ
    /// * `captures_dir` - 撮影画像の保存先
    pub fn new(source: impl Into<PathBuf>, captures_dir: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            captures_dir: captures_dir.into(),
            in_use: Arc::new(AtomicBool::new(false)),
            cursor: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl CameraDevice for FileCamera {
    type Handle = FileCameraHandle;

    fn open(&self) -> Result<FileCameraHandle, CaptureError> {
        if self.in_use.swap(true, Ordering::SeqCst) {
            return Err(CaptureError::DeviceBusy);
        }

        // ここから先の失敗では使用中フラグを戻す
        let frames = match scanner::scan_source(&self.source) {
            Ok(images) if images.is_empty() => {
                self.in_use.store(false, Ordering::SeqCst);
                return Err(CaptureError::NoFrames(self.source.display().to_string()));
            }
            Ok(images) => images.into_iter().map(|i| i.path).collect(),
            Err(e) => {
                self.in_use.store(false, Ordering::SeqCst);
                return Err(e);
            }
        };

        log::debug!("[CAPTURE] {} を開きました", self.source.display());

        Ok(FileCameraHandle {
            frames,
            captures_dir: self.captures_dir.clone(),
            in_use: Arc::clone(&self.in_use),
            cursor: Arc::clone(&self.cursor),
        })
    }
}

pub struct FileCameraHandle {
    frames: Vec<PathBuf>,
    captures_dir: PathBuf,
    in_use: Arc<AtomicBool>,
    cursor: Arc<AtomicUsize>,
}

impl Drop for FileCameraHandle {
    fn drop(&mut self) {
        self.in_use.store(false, Ordering::SeqCst);
    }
}

#[async_trait]
impl CameraHandle for FileCameraHandle {
    async fn take_picture(&mut self, options: CaptureOptions) -> Result<RawImage, CaptureError> {
        let index = self.cursor.fetch_add(1, Ordering::SeqCst);
        let frame = self.frames[index % self.frames.len()].clone();
        let dest = self.captures_dir.join(capture_file_name(index));
        let quality = options.jpeg_quality();

        let (dest, bytes) = tokio::task::spawn_blocking(move || encode_frame(&frame, &dest, quality))
            .await
            .map_err(|e| CaptureError::Device(format!("撮影タスクが中断されました: {}", e)))??;

        Ok(RawImage::from_bytes(PhotoUri::from_path(&dest), &bytes, DEFAULT_IMAGE_MIME_TYPE))
    }
}

fn capture_file_name(index: usize) -> String {
    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S%3f");
    format!("scan-{}-{}.jpg", stamp, index + 1)
}

/// フレームを読み込みJPEGで保存。保存先と書き出したバイト列を返す
fn encode_frame(frame: &Path, dest: &Path, quality: u8) -> Result<(PathBuf, Vec<u8>), CaptureError> {
    let img = image::open(frame)
        .map_err(|e| CaptureError::Device(format!("{}: {}", frame.display(), e)))?;

    let mut bytes = Vec::new();
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality);
        encoder
            .encode_image(&img.to_rgb8())
            .map_err(|e| CaptureError::Device(format!("JPEGエンコード失敗: {}", e)))?;
    }

    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(dest, &bytes)?;

    Ok((dest.to_path_buf(), bytes))
}
