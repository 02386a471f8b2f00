//! 画面状態
//!
//! Dashboard / Camera / Results のいずれか1つだけ。
//! 写真・解析結果・解析中フラグは Results の中にしか存在しない。

use nutriscan_common::{PhotoUri, ScanResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 1回のスキャンの識別子（撮影ごとに採番）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScanId(u64);

impl ScanId {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ScanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisState {
    Pending,
    Ready(ScanResult),
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultsScreen {
    pub scan_id: ScanId,
    pub photo: PhotoUri,
    pub analysis: AnalysisState,
}

impl ResultsScreen {
    pub fn is_analyzing(&self) -> bool {
        matches!(self.analysis, AnalysisState::Pending)
    }

    pub fn result(&self) -> Option<&ScanResult> {
        match &self.analysis {
            AnalysisState::Ready(result) => Some(result),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Dashboard,
    Camera,
    Results(ResultsScreen),
}

impl Screen {
    pub fn kind(&self) -> ScreenKind {
        match self {
            Screen::Dashboard => ScreenKind::Dashboard,
            Screen::Camera => ScreenKind::Camera,
            Screen::Results(_) => ScreenKind::Results,
        }
    }
}

/// 描画側に渡す画面種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScreenKind {
    Dashboard,
    Camera,
    Results,
}

impl fmt::Display for ScreenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScreenKind::Dashboard => "dashboard",
            ScreenKind::Camera => "camera",
            ScreenKind::Results => "results",
        };
        f.write_str(name)
    }
}
