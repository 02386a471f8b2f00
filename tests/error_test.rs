//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use nutriscan::config::Config;
use nutriscan::scanner;
use nutriscan::{AnalysisError, CaptureError, NutriScanError, SessionError};
use std::path::Path;
use tempfile::tempdir;

/// 存在しない撮影ソース
#[test]
fn test_scan_nonexistent_source() {
    let result = scanner::scan_source(Path::new("/nonexistent/path/12345"));
    assert!(matches!(result, Err(CaptureError::SourceNotFound(_))));
}

/// 空のフォルダはエラーではなく空のVec（FileCamera側で NoFrames にする）
#[test]
fn test_scan_empty_folder() {
    let dir = tempdir().expect("一時フォルダ作成失敗");
    let result = scanner::scan_source(dir.path());

    assert!(result.is_ok());
    assert!(result.unwrap().is_empty());
}

/// 画像のないフォルダ
#[test]
fn test_scan_folder_no_images() {
    let dir = tempdir().expect("一時フォルダ作成失敗");

    std::fs::write(dir.path().join("memo.txt"), "hello").unwrap();
    std::fs::write(dir.path().join("data.json"), "{}").unwrap();

    let result = scanner::scan_source(dir.path());
    assert!(result.is_ok());
    assert!(result.unwrap().is_empty());
}

/// Display実装確認
#[test]
fn test_error_display() {
    let errors: Vec<NutriScanError> = vec![
        NutriScanError::Config("テスト設定エラー".to_string()),
        NutriScanError::MissingApiKey,
        CaptureError::NotReady.into(),
        CaptureError::DeviceBusy.into(),
        CaptureError::SourceNotFound("/path/to/frames".to_string()).into(),
        CaptureError::NoFrames("/path/to/frames".to_string()).into(),
        AnalysisError::EmptyResponse.into(),
        AnalysisError::Api { status: 500, body: "internal".to_string() }.into(),
        SessionError::CameraNotActive.into(),
        SessionError::AnalysisInFlight.into(),
        NutriScanError::ScanFailed("結果なし".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// MissingApiKeyエラーのメッセージ確認
#[test]
fn test_missing_api_key_message() {
    let display = format!("{}", NutriScanError::MissingApiKey);

    assert!(display.contains("APIキー"));
    assert!(display.contains("nutriscan config"));
    assert!(display.contains("GOOGLE_AI_API_KEY"));
}

/// 下位エラーは透過的に表示される
#[test]
fn test_transparent_variants() {
    let err: NutriScanError = CaptureError::Device("シャッター故障".to_string()).into();
    assert!(matches!(err, NutriScanError::Capture(_)));
    assert!(format!("{}", err).contains("シャッター故障"));

    let err: NutriScanError = AnalysisError::Api { status: 403, body: "PERMISSION_DENIED".to_string() }.into();
    assert!(matches!(err, NutriScanError::Analysis(_)));
    let display = format!("{}", err);
    assert!(display.contains("403"));
    assert!(display.contains("PERMISSION_DENIED"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: NutriScanError = io_err.into();
    assert!(matches!(err, NutriScanError::Io(_)));
    assert!(format!("{}", err).contains("IO"));

    let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err: CaptureError = io_err.into();
    assert!(matches!(err, CaptureError::Io(_)));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: NutriScanError = json_err.into();

    assert!(matches!(err, NutriScanError::JsonParse(_)));
}

/// パース失敗は解析エラーとして扱う
#[test]
fn test_parse_error_becomes_analysis_error() {
    let parse_err = nutriscan_common::parse_scan_response("not json").unwrap_err();
    let err: AnalysisError = parse_err.into();
    assert!(matches!(err, AnalysisError::Parse(_)));
}

/// 壊れた設定ファイル
#[test]
fn test_load_broken_config() {
    let dir = tempdir().expect("一時フォルダ作成失敗");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();

    let result = Config::load_from(&path);
    assert!(matches!(result, Err(NutriScanError::JsonParse(_))));
}
