//! APIレスポンスパーサー
//!
//! モデルの応答テキストから Markdown のコードフェンス（```json / ```）を取り除き、
//! ScanResult としてデコードする。JSONオブジェクトでない応答と food の欠落はエラー。
//! 栄養値の型の揺れは ScanResult 側で吸収する。

use crate::error::{Error, Result};
use crate::types::ScanResult;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref CODE_FENCE: Regex = Regex::new(r"```(?:json)?").unwrap();
}

/// コードフェンスを除去してトリム
///
/// 位置に関係なく "```json" と "```" をすべて取り除く。
///
/// # Examples
/// ```
/// use nutriscan_common::strip_code_fences;
///
/// let text = "```json\n{\"food\": \"Apple\"}\n```";
/// assert_eq!(strip_code_fences(text), "{\"food\": \"Apple\"}");
/// ```
pub fn strip_code_fences(response: &str) -> String {
    CODE_FENCE.replace_all(response, "").trim().to_string()
}

/// 栄養解析レスポンスをパース
///
/// # Arguments
/// * `response` - モデルが返したテキスト
///
/// # Returns
/// * `Ok(ScanResult)` - パース成功
/// * `Err(Error::Parse)` - JSONでない、オブジェクトでない、または food が無い
pub fn parse_scan_response(response: &str) -> Result<ScanResult> {
    let cleaned = strip_code_fences(response);
    if cleaned.is_empty() {
        return Err(Error::Parse("レスポンスが空です".into()));
    }

    let value: serde_json::Value = serde_json::from_str(&cleaned)
        .map_err(|e| Error::Parse(format!("JSONパースエラー: {}", e)))?;

    // 配列形式の構造体デコードは受け付けない
    if !value.is_object() {
        return Err(Error::Parse("JSONオブジェクトではありません".into()));
    }

    serde_json::from_value(value)
        .map_err(|e| Error::Parse(format!("レスポンス形式エラー: {}", e)))
}
