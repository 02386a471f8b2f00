//! NutriScan
//!
//! 食事の写真を撮って Gemini に送り、推定栄養値（食品名・カロリー・タンパク質・糖質）を
//! スキャン履歴と一緒に表示する。
//!
//! - capture: カメラの排他利用と撮影
//! - analyzer: Gemini API 呼び出しとレスポンスのデコード
//! - session: 画面遷移の状態機械
//! - history: メモリ上のスキャン履歴
//! - app: 上記をつなぐ進行役

pub mod analyzer;
pub mod app;
pub mod capture;
pub mod cli;
pub mod config;
pub mod error;
pub mod history;
pub mod render;
pub mod scanner;
pub mod session;

pub use app::{NutriScanApp, Outcome};
pub use error::{AnalysisError, CaptureError, NutriScanError, Result, SessionError};
