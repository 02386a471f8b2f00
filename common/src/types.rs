//! 解析結果の型定義
//!
//! CLIと将来のフロントエンドで共有される型:
//! - ScanResult: AI解析の出力（食品名・カロリー・糖質・タンパク質）
//! - PhotoUri: 撮影画像の保存先ハンドル

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;

/// 値が無い場合の表示
pub const MISSING_VALUE: &str = "--";

/// AI栄養解析結果
///
/// `food` は必須。残り3項目はそれぞれ独立にnull許容で、
/// キー自体が欠けている場合もnullとして扱う。
/// 食品以外が写っている場合、モデルは物体名だけを返し数値はnullになる。
///
/// モデルの出力は型が揺れるので、栄養値は型違いでも捨てずに受け取る:
/// calories は "95" や "95 kcal" も数値に、sugar/protein は数値も文字列にする。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub food: String,

    #[serde(default, deserialize_with = "lenient_number")]
    pub calories: Option<f64>,    // kcal

    #[serde(default, deserialize_with = "lenient_text")]
    pub sugar: Option<String>,    // 単位付き（例: "2.8g"）

    #[serde(default, deserialize_with = "lenient_text")]
    pub protein: Option<String>,  // 単位付き（例: "33.3g"）
}

impl ScanResult {
    /// 栄養値が1つでも返ってきたか
    pub fn has_nutrition(&self) -> bool {
        self.calories.is_some() || self.sugar.is_some() || self.protein.is_some()
    }

    /// カロリー表示（"95 kcal" / "-- kcal"）
    pub fn calories_label(&self) -> String {
        format!("{} kcal", stat_value(self.calories.as_ref()))
    }
}

/// 数値、または数値で始まる文字列。読めなければnull
fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => leading_number(&s),
        _ => None,
    }))
}

/// 文字列はそのまま、それ以外はJSON表記の文字列に
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        Value::String(s) => s,
        other => other.to_string(),
    }))
}

fn leading_number(text: &str) -> Option<f64> {
    let text = text.trim();
    let end = text
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(text.len());
    text[..end].parse().ok()
}

/// 統計ボックス用の値表示。nullは "--"
pub fn stat_value<T: fmt::Display>(value: Option<&T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => MISSING_VALUE.to_string(),
    }
}

/// 撮影画像の保存先ハンドル
///
/// 中身のバイト列は見ない。表示と履歴のために持ち回るだけ。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoUri(String);

impl PhotoUri {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// ローカルファイルパスから file:// URIを作成
    ///
    /// 相対パスはカレントディレクトリ基準の絶対パスにしてから変換する。
    pub fn from_path(path: &Path) -> Self {
        let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let display = absolute.display().to_string().replace('\\', "/");
        if display.starts_with('/') {
            Self(format!("file://{}", display))
        } else {
            Self(format!("file:///{}", display))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhotoUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
