//! 描画境界
//!
//! 描画側は SessionView を読むだけで、状態は Intent 経由でしか変えない。

use super::state::ScreenKind;
use crate::history::HistoryEntry;
use nutriscan_common::{PhotoUri, ScanResult};
use serde::{Deserialize, Serialize};

/// ユーザー操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Intent {
    StartScan,
    CancelCamera,
    CapturePhoto,
    GoBack,
    ScanAnother,
    DismissNotice,
}

impl Intent {
    pub fn label(&self) -> &'static str {
        match self {
            Intent::StartScan => "食事をスキャン",
            Intent::CancelCamera => "閉じる",
            Intent::CapturePhoto => "撮影",
            Intent::GoBack => "完了",
            Intent::ScanAnother => "別の食事をスキャン",
            Intent::DismissNotice => "OK",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NoticeKind {
    CaptureFailed,
    AnalysisFailed,
}

/// ユーザーに出す通知（閉じられる、操作はブロックしない）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn capture_failed(reason: impl std::fmt::Display) -> Self {
        Self {
            kind: NoticeKind::CaptureFailed,
            title: "撮影エラー".to_string(),
            message: reason.to_string(),
        }
    }

    pub fn analysis_failed(reason: impl std::fmt::Display) -> Self {
        Self {
            kind: NoticeKind::AnalysisFailed,
            title: "解析エラー".to_string(),
            message: format!("解析に失敗しました。もう一度お試しください。({})", reason),
        }
    }
}

/// 描画用の読み取り専用ビュー
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub screen: ScreenKind,
    pub photo: Option<PhotoUri>,
    pub result: Option<ScanResult>,
    pub is_analyzing: bool,
    pub history: Vec<HistoryEntry>,
    pub notice: Option<Notice>,
}

impl SessionView {
    /// 現在の画面で意味のある操作
    pub fn available_intents(&self) -> Vec<Intent> {
        let mut intents = match self.screen {
            ScreenKind::Dashboard => vec![Intent::StartScan],
            ScreenKind::Camera => vec![Intent::CapturePhoto, Intent::CancelCamera],
            ScreenKind::Results => vec![Intent::GoBack, Intent::ScanAnother],
        };
        if self.notice.is_some() {
            intents.insert(0, Intent::DismissNotice);
        }
        intents
    }
}
