//! スキャン履歴
//!
//! メモリ上のみ、新しい順。追加だけで削除・検索・永続化はしない。

use chrono::{DateTime, Local};
use nutriscan_common::{PhotoUri, ScanResult};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// 履歴エントリ（作成後は変更しない）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub result: ScanResult,
    pub uri: PhotoUri,
    pub scanned_at: DateTime<Local>,
}

impl HistoryEntry {
    pub fn new(result: ScanResult, uri: PhotoUri) -> Self {
        Self {
            result,
            uri,
            scanned_at: Local::now(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    entries: VecDeque<HistoryEntry>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 先頭に追加
    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
    }

    /// 全件（新しい順）
    pub fn all(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
