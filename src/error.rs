use thiserror::Error;

/// 撮影エラー
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("カメラが起動していません")]
    NotReady,

    #[error("カメラは他で使用中です")]
    DeviceBusy,

    #[error("撮影ソースが見つかりません: {0}")]
    SourceNotFound(String),

    #[error("撮影できる画像がありません: {0}")]
    NoFrames(String),

    #[error("撮影に失敗しました: {0}")]
    Device(String),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

/// AI解析エラー
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("API呼び出しエラー: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("APIエラー (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    #[error("APIレスポンスが空です")]
    EmptyResponse,

    #[error("APIレスポンスのパースに失敗: {0}")]
    Parse(#[from] nutriscan_common::Error),
}

/// セッションの呼び出し規約違反
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("カメラ画面ではありません")]
    CameraNotActive,

    #[error("解析中のため撮影できません")]
    AnalysisInFlight,
}

#[derive(Error, Debug)]
pub enum NutriScanError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。`nutriscan config --set-api-key YOUR_KEY` で設定するか GOOGLE_AI_API_KEY を指定してください")]
    MissingApiKey,

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("スキャンに失敗しました: {0}")]
    ScanFailed(String),

    #[error("HTTPクライアント初期化エラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NutriScanError>;
