//! ターミナル描画
//!
//! SessionView をテキストにするだけ。状態には触れない。

use crate::history::HistoryEntry;
use crate::session::{ScreenKind, SessionView};
use nutriscan_common::{stat_value, ScanResult};

const APP_TITLE: &str = "NutriScan";

/// 画面全体のテキスト（行末は改行）
pub fn render_view(view: &SessionView) -> String {
    let mut lines = match view.screen {
        ScreenKind::Dashboard => dashboard_lines(&view.history),
        ScreenKind::Camera => vec![
            "📷 カメラ".to_string(),
            "食事を枠に合わせて撮影してください".to_string(),
        ],
        ScreenKind::Results => results_lines(view),
    };

    if let Some(notice) = &view.notice {
        lines.push(String::new());
        lines.push(format!("⚠ {}: {}", notice.title, notice.message));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn dashboard_lines(history: &[HistoryEntry]) -> Vec<String> {
    let mut lines = vec![APP_TITLE.to_string(), "---".to_string()];

    if history.is_empty() {
        lines.push("まだスキャンがありません。最初の食事をスキャンしましょう！".to_string());
        return lines;
    }

    lines.push(format!("最近のスキャン ({}件)", history.len()));
    lines.extend(history.iter().map(history_line));
    lines
}

fn results_lines(view: &SessionView) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(photo) = &view.photo {
        lines.push(format!("🖼  {}", photo));
    }

    if view.is_analyzing {
        lines.push("解析中...".to_string());
        lines.push("AIが栄養価を計算しています".to_string());
        return lines;
    }

    match &view.result {
        Some(result) => {
            lines.push(result.food.clone());
            lines.push(stats_line(result));
        }
        None => lines.push("不明な食品".to_string()),
    }
    lines
}

/// 統計ボックス（カロリー / タンパク質 / 糖質）
pub fn stats_line(result: &ScanResult) -> String {
    format!(
        "カロリー: {} | タンパク質: {} | 糖質: {}",
        stat_value(result.calories.as_ref()),
        stat_value(result.protein.as_ref()),
        stat_value(result.sugar.as_ref()),
    )
}

pub fn history_line(entry: &HistoryEntry) -> String {
    let line = format!(
        "- {} {} ({})",
        entry.scanned_at.format("%H:%M"),
        entry.result.food,
        entry.result.calories_label()
    );
    match &entry.result.protein {
        Some(protein) => format!("{} タンパク質 {}", line, protein),
        None => line,
    }
}
