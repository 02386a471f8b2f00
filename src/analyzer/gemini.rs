//! Gemini API連携
//!
//! 固定プロンプト + インライン画像1枚を generateContent に送り、
//! 返ってきたテキストを ScanResult にデコードする。

use super::Analyzer;
use crate::capture::RawImage;
use crate::config::Config;
use crate::error::{AnalysisError, Result};
use async_trait::async_trait;
use nutriscan_common::{build_nutrition_prompt, parse_scan_response, ScanResult};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

pub const GEMINI_API_VERSION: &str = "v1beta";

/// Gemini APIリクエスト
#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

/// Gemini APIレスポンス
#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiResponse {
    /// 先頭候補のテキストパートを連結
    fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Gemini クライアント
///
/// 起動時に一度だけ組み立てて、セッションに渡す。
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: Option<f32>,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            model: normalize_model(&model.into()),
            base_url: crate::config::DEFAULT_BASE_URL.to_string(),
            temperature: None,
        }
    }

    /// 設定から作成（APIキーが無ければエラー）
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.get_api_key()?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.max(1)))
            .build()?;

        Ok(Self {
            http,
            api_key,
            model: normalize_model(&config.model),
            base_url: config.base_url.clone(),
            temperature: config.temperature,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            GEMINI_API_VERSION,
            self.model
        )
    }

    fn build_request(&self, image: &RawImage) -> GeminiRequest {
        GeminiRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text { text: build_nutrition_prompt() },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: image.mime_type.clone(),
                            data: image.base64.clone(),
                        },
                    },
                ],
            }],
            generation_config: self.temperature.map(|temperature| GenerationConfig { temperature }),
        }
    }

    /// Gemini API呼び出し
    async fn generate_content(&self, request: &GeminiRequest) -> std::result::Result<String, AnalysisError> {
        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Api { status: status.as_u16(), body });
        }

        let response: GeminiResponse = response.json().await?;
        response.text().ok_or(AnalysisError::EmptyResponse)
    }
}

#[async_trait]
impl Analyzer for GeminiClient {
    async fn analyze(&self, image: &RawImage) -> std::result::Result<ScanResult, AnalysisError> {
        log::info!("[AI] モデル: {}", self.model);
        let start = Instant::now();

        let request = self.build_request(image);
        let text = match self.generate_content(&request).await {
            Ok(text) => text,
            Err(e) => {
                log::error!("[AI] 解析失敗 ({}ms): {}", start.elapsed().as_millis(), e);
                return Err(e);
            }
        };
        log::debug!("[AI] レスポンス長: {} chars", text.len());

        let result = parse_scan_response(&text).map_err(|e| {
            let preview: String = text.chars().take(200).collect();
            log::error!("[AI] パース失敗: {} / {}", e, preview);
            AnalysisError::from(e)
        })?;

        log::info!("[AI] 解析完了 ({}ms): {}", start.elapsed().as_millis(), result.food);
        Ok(result)
    }
}

/// "models/gemini-…" 形式も受け付ける
fn normalize_model(model: &str) -> String {
    model.trim().trim_start_matches("models/").to_string()
}
