//! 撮影モジュール
//!
//! - CameraDevice / CameraHandle: カメラの抽象（ハンドルは排他、Dropで解放）
//! - CaptureController: ハンドルを唯一保持し、静止画を1枚撮る
//! - FileCamera: 画像ファイルをファインダーとするデバイス実装

mod file_camera;

pub use file_camera::{FileCamera, FileCameraHandle};

use crate::config::DEFAULT_CAPTURE_QUALITY;
use crate::error::CaptureError;
use async_trait::async_trait;
use base64::Engine;
use nutriscan_common::PhotoUri;

/// 撮影オプション
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureOptions {
    /// 圧縮品質（0.0〜1.0）
    pub quality: f32,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self { quality: DEFAULT_CAPTURE_QUALITY }
    }
}

impl CaptureOptions {
    /// JPEGエンコーダ用の品質（1〜100）
    pub fn jpeg_quality(&self) -> u8 {
        let q = if self.quality.is_finite() { self.quality.clamp(0.0, 1.0) } else { DEFAULT_CAPTURE_QUALITY };
        ((q * 100.0).round() as u8).max(1)
    }
}

/// 撮影された画像
///
/// 表示用の保存先ハンドルと、送信用のBase64データを両方持つ。
#[derive(Debug, Clone, PartialEq)]
pub struct RawImage {
    pub uri: PhotoUri,
    pub base64: String,
    pub mime_type: String,
}

impl RawImage {
    pub fn from_bytes(uri: PhotoUri, bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            uri,
            base64: base64::engine::general_purpose::STANDARD.encode(bytes),
            mime_type: mime_type.into(),
        }
    }
}

/// カメラデバイス
pub trait CameraDevice: Send + Sync {
    type Handle: CameraHandle;

    /// カメラを開く。ハンドルが生きている間は他から開けない
    fn open(&self) -> Result<Self::Handle, CaptureError>;
}

/// 開いているカメラ。Dropで解放される
#[async_trait]
pub trait CameraHandle: Send {
    async fn take_picture(&mut self, options: CaptureOptions) -> Result<RawImage, CaptureError>;
}

/// 撮影コントローラ
///
/// カメラハンドルの唯一の保持者。
pub struct CaptureController<D: CameraDevice> {
    device: D,
    active: Option<D::Handle>,
    options: CaptureOptions,
}

impl<D: CameraDevice> CaptureController<D> {
    pub fn new(device: D) -> Self {
        Self {
            device,
            active: None,
            options: CaptureOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CaptureOptions) -> Self {
        self.options = options;
        self
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    /// カメラを開く（既に開いていれば何もしない）
    pub fn open(&mut self) -> Result<(), CaptureError> {
        if self.active.is_none() {
            self.active = Some(self.device.open()?);
            log::debug!("[CAPTURE] カメラを開きました");
        }
        Ok(())
    }

    /// カメラを解放。開いていた場合true
    pub fn release(&mut self) -> bool {
        let released = self.active.take().is_some();
        if released {
            log::debug!("[CAPTURE] カメラを解放しました");
        }
        released
    }

    /// 静止画を1枚撮影
    pub async fn capture(&mut self) -> Result<RawImage, CaptureError> {
        let options = self.options;
        let handle = self.active.as_mut().ok_or(CaptureError::NotReady)?;
        let image = handle.take_picture(options).await?;
        log::info!("[CAPTURE] 撮影完了: {}", image.uri);
        Ok(image)
    }
}
