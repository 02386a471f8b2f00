mod gemini;

pub use gemini::{GeminiClient, GEMINI_API_VERSION};

use crate::capture::RawImage;
use crate::error::AnalysisError;
use async_trait::async_trait;
use nutriscan_common::ScanResult;

/// 画像解析器
///
/// 1回の呼び出しで1枚を解析する。リトライもキャッシュもしない。
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, image: &RawImage) -> Result<ScanResult, AnalysisError>;
}
