//! プロンプト生成モジュール
//!
//! 栄養解析用の固定プロンプト。モデルには厳密なJSONを指示するが、
//! 強制はできないためレスポンス側で柵（```）除去とパースを行う。
//! 文面は既存アプリと同一（綴りの揺れも含めてそのまま）。

/// レスポンスJSONのキー
pub const RESPONSE_KEYS: &[&str] = &["food", "calories", "sugar", "protein"];

/// 画像のMIMEタイプ（撮影画像は常にJPEG）
pub const DEFAULT_IMAGE_MIME_TYPE: &str = "image/jpeg";

/// 栄養解析プロンプト
///
/// 食品以外が写っている場合は物体名だけを返し、数値はnullにするよう指示している。
pub const NUTRITION_PROMPT: &str = r#"Identify food and count nutritional values. if possible be precise with the values and quantity. Return strictly JSON: { "food": "Name", "calories": 564, "sugar": "2.8g", "protein": "33.3g" }. (if image is not food reurn the identified object nae with other valures nulled feeel free to be funny in that case just be very short)"#;

/// 栄養解析プロンプト生成
pub fn build_nutrition_prompt() -> String {
    NUTRITION_PROMPT.to_string()
}
