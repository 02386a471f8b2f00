//! スキャンセッション（画面遷移の状態機械）
//!
//! ```text
//! Dashboard --start_scan--> Camera --cancel_camera--> Dashboard
//! Camera --begin_analysis--> Results(Pending)
//! Results(Pending) --complete_analysis--> Results(Ready | Failed)
//! Results --go_back--> Dashboard
//! Results --scan_another--> Camera
//! ```
//!
//! 解析の完了は ScanId で照合し、既に別の画面に移っていれば破棄する。

mod state;
mod view;

pub use state::{AnalysisState, ResultsScreen, ScanId, Screen, ScreenKind};
pub use view::{Intent, Notice, NoticeKind, SessionView};

use crate::error::{AnalysisError, SessionError};
use crate::history::{HistoryEntry, HistoryStore};
use nutriscan_common::{PhotoUri, ScanResult};

/// 遷移の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Moved { from: ScreenKind, to: ScreenKind },
    Ignored,
}

impl Transition {
    pub fn is_moved(&self) -> bool {
        matches!(self, Transition::Moved { .. })
    }
}

/// 解析完了の反映結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Discarded,
}

#[derive(Debug, Clone)]
pub struct ScanSession {
    screen: Screen,
    history: HistoryStore,
    notice: Option<Notice>,
    next_scan_id: u64,
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanSession {
    pub fn new() -> Self {
        Self {
            screen: Screen::Dashboard,
            history: HistoryStore::new(),
            notice: None,
            next_scan_id: 1,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn is_analyzing(&self) -> bool {
        matches!(&self.screen, Screen::Results(results) if results.is_analyzing())
    }

    pub fn current_photo(&self) -> Option<&PhotoUri> {
        match &self.screen {
            Screen::Results(results) => Some(&results.photo),
            _ => None,
        }
    }

    pub fn current_result(&self) -> Option<&ScanResult> {
        match &self.screen {
            Screen::Results(results) => results.result(),
            _ => None,
        }
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            screen: self.screen.kind(),
            photo: self.current_photo().cloned(),
            result: self.current_result().cloned(),
            is_analyzing: self.is_analyzing(),
            history: self.history.all(),
            notice: self.notice.clone(),
        }
    }

    /// 現在の画面でこの操作が遷移を起こすか
    pub fn accepts(&self, intent: Intent) -> bool {
        match intent {
            Intent::StartScan => matches!(self.screen, Screen::Dashboard),
            Intent::CancelCamera | Intent::CapturePhoto => matches!(self.screen, Screen::Camera),
            Intent::GoBack | Intent::ScanAnother => matches!(self.screen, Screen::Results(_)),
            Intent::DismissNotice => self.notice.is_some(),
        }
    }

    pub fn start_scan(&mut self) -> Transition {
        match self.screen {
            Screen::Dashboard => self.move_to(Screen::Camera),
            _ => self.ignore(Intent::StartScan),
        }
    }

    pub fn cancel_camera(&mut self) -> Transition {
        match self.screen {
            Screen::Camera => self.move_to(Screen::Dashboard),
            _ => self.ignore(Intent::CancelCamera),
        }
    }

    /// Results → Dashboard（写真と結果は破棄）
    pub fn go_back(&mut self) -> Transition {
        match self.screen {
            Screen::Results(_) => self.move_to(Screen::Dashboard),
            _ => self.ignore(Intent::GoBack),
        }
    }

    /// Results → Camera（写真と結果は破棄）
    pub fn scan_another(&mut self) -> Transition {
        match self.screen {
            Screen::Results(_) => self.move_to(Screen::Camera),
            _ => self.ignore(Intent::ScanAnother),
        }
    }

    /// 撮影してよいか
    pub fn check_capture(&self) -> Result<(), SessionError> {
        match &self.screen {
            Screen::Camera => Ok(()),
            Screen::Results(results) if results.is_analyzing() => Err(SessionError::AnalysisInFlight),
            _ => Err(SessionError::CameraNotActive),
        }
    }

    /// 撮影成功: Camera → Results(Pending)
    pub fn begin_analysis(&mut self, photo: PhotoUri) -> Result<ScanId, SessionError> {
        self.check_capture()?;

        let scan_id = ScanId::new(self.next_scan_id);
        self.next_scan_id += 1;

        log::info!("[SESSION] 解析開始 {}: {}", scan_id, photo);
        self.move_to(Screen::Results(ResultsScreen {
            scan_id,
            photo,
            analysis: AnalysisState::Pending,
        }));
        Ok(scan_id)
    }

    /// 解析結果を反映
    ///
    /// 対象のスキャンが表示中で、まだ解析中の場合だけ反映する。
    /// それ以外（画面を離れた、別のスキャンに移った）は何も変えずに破棄。
    pub fn complete_analysis(
        &mut self,
        scan_id: ScanId,
        outcome: Result<ScanResult, AnalysisError>,
    ) -> Completion {
        let results = match &mut self.screen {
            Screen::Results(results) if results.scan_id == scan_id && results.is_analyzing() => results,
            _ => {
                log::debug!("[SESSION] 古い解析結果を破棄 {}", scan_id);
                return Completion::Discarded;
            }
        };

        match outcome {
            Ok(result) => {
                log::info!("[SESSION] 解析結果 {}: {}", scan_id, result.food);
                self.history.append(HistoryEntry::new(result.clone(), results.photo.clone()));
                results.analysis = AnalysisState::Ready(result);
            }
            Err(e) => {
                log::warn!("[SESSION] 解析失敗 {}: {}", scan_id, e);
                results.analysis = AnalysisState::Failed;
                self.notice = Some(Notice::analysis_failed(&e));
            }
        }
        Completion::Applied
    }

    /// 通知を出す（前の通知は置き換え）
    pub fn raise_notice(&mut self, notice: Notice) {
        log::debug!("[SESSION] 通知: {} - {}", notice.title, notice.message);
        self.notice = Some(notice);
    }

    pub fn dismiss_notice(&mut self) -> Transition {
        if self.notice.take().is_some() {
            let kind = self.screen.kind();
            Transition::Moved { from: kind, to: kind }
        } else {
            Transition::Ignored
        }
    }

    fn move_to(&mut self, next: Screen) -> Transition {
        let from = self.screen.kind();
        let to = next.kind();
        self.screen = next;
        log::debug!("[SESSION] {} -> {}", from, to);
        Transition::Moved { from, to }
    }

    fn ignore(&self, intent: Intent) -> Transition {
        log::debug!("[SESSION] {:?} は {} では無視", intent, self.screen.kind());
        Transition::Ignored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn banana() -> ScanResult {
        ScanResult {
            food: "Banana".to_string(),
            calories: Some(105.0),
            sugar: Some("14g".to_string()),
            protein: Some("1.3g".to_string()),
        }
    }

    fn photo(name: &str) -> PhotoUri {
        PhotoUri::new(format!("file:///captures/{}.jpg", name))
    }

    fn parse_error() -> AnalysisError {
        AnalysisError::Parse(nutriscan_common::Error::Parse("JSONパースエラー".into()))
    }

    /// 画面が1つだけであることを派生フラグ側からも確認
    fn assert_consistent(session: &ScanSession) {
        let view = session.view();
        match view.screen {
            ScreenKind::Dashboard | ScreenKind::Camera => {
                assert!(view.photo.is_none());
                assert!(view.result.is_none());
                assert!(!view.is_analyzing);
            }
            ScreenKind::Results => {
                assert!(view.photo.is_some());
                assert!(!(view.is_analyzing && view.result.is_some()));
            }
        }
    }

    #[test]
    fn test_initial_state() {
        let session = ScanSession::new();
        assert_eq!(session.screen(), &Screen::Dashboard);
        assert!(session.history().is_empty());
        assert!(session.notice().is_none());
        assert!(!session.is_analyzing());
    }

    #[test]
    fn test_start_and_cancel() {
        let mut session = ScanSession::new();
        assert_eq!(
            session.start_scan(),
            Transition::Moved { from: ScreenKind::Dashboard, to: ScreenKind::Camera }
        );
        assert_eq!(session.screen().kind(), ScreenKind::Camera);

        assert!(session.cancel_camera().is_moved());
        assert_eq!(session.screen(), &Screen::Dashboard);
    }

    #[test]
    fn test_begin_analysis_enters_pending_results() {
        let mut session = ScanSession::new();
        session.start_scan();
        let scan_id = session.begin_analysis(photo("x")).unwrap();

        let view = session.view();
        assert_eq!(view.screen, ScreenKind::Results);
        assert!(view.is_analyzing);
        assert_eq!(view.photo, Some(photo("x")));
        assert!(view.result.is_none());
        assert_eq!(scan_id.value(), 1);
    }

    #[test]
    fn test_successful_analysis_appends_history() {
        let mut session = ScanSession::new();
        session.start_scan();
        let scan_id = session.begin_analysis(photo("x")).unwrap();

        assert_eq!(session.complete_analysis(scan_id, Ok(banana())), Completion::Applied);

        assert!(!session.is_analyzing());
        assert_eq!(session.current_result(), Some(&banana()));
        assert_eq!(session.history().len(), 1);
        let latest = session.history().latest().unwrap();
        assert_eq!(latest.result, banana());
        assert_eq!(latest.uri, photo("x"));
    }

    #[test]
    fn test_failed_analysis_raises_notice() {
        let mut session = ScanSession::new();
        session.start_scan();
        let scan_id = session.begin_analysis(photo("x")).unwrap();

        assert_eq!(session.complete_analysis(scan_id, Err(parse_error())), Completion::Applied);

        let view = session.view();
        assert_eq!(view.screen, ScreenKind::Results);
        assert!(!view.is_analyzing);
        assert!(view.result.is_none());
        assert_eq!(view.notice.as_ref().map(|n| n.kind), Some(NoticeKind::AnalysisFailed));
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_capture_rejected_while_analyzing() {
        let mut session = ScanSession::new();
        session.start_scan();
        session.begin_analysis(photo("x")).unwrap();

        assert_eq!(session.check_capture(), Err(SessionError::AnalysisInFlight));
        assert_eq!(session.begin_analysis(photo("y")), Err(SessionError::AnalysisInFlight));
        assert_eq!(session.current_photo(), Some(&photo("x")));
    }

    #[test]
    fn test_capture_rejected_outside_camera() {
        let mut session = ScanSession::new();
        assert_eq!(session.check_capture(), Err(SessionError::CameraNotActive));
        assert_eq!(session.begin_analysis(photo("x")), Err(SessionError::CameraNotActive));
        assert_eq!(session.screen(), &Screen::Dashboard);
    }

    #[test]
    fn test_go_back_clears_results() {
        let mut session = ScanSession::new();
        session.start_scan();
        let scan_id = session.begin_analysis(photo("x")).unwrap();
        session.complete_analysis(scan_id, Ok(banana()));

        assert!(session.go_back().is_moved());
        assert!(session.current_photo().is_none());
        assert!(session.current_result().is_none());
    }

    #[test]
    fn test_go_back_twice_is_noop() {
        let mut session = ScanSession::new();
        session.start_scan();
        let scan_id = session.begin_analysis(photo("x")).unwrap();
        session.complete_analysis(scan_id, Ok(banana()));

        assert!(session.go_back().is_moved());
        assert_eq!(session.go_back(), Transition::Ignored);
        assert_eq!(session.screen(), &Screen::Dashboard);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_scan_another_returns_to_camera() {
        let mut session = ScanSession::new();
        session.start_scan();
        session.begin_analysis(photo("x")).unwrap();

        assert_eq!(
            session.scan_another(),
            Transition::Moved { from: ScreenKind::Results, to: ScreenKind::Camera }
        );
        assert!(session.current_photo().is_none());
        assert!(session.check_capture().is_ok());
    }

    #[test]
    fn test_stale_result_after_go_back_is_discarded() {
        let mut session = ScanSession::new();
        session.start_scan();
        let scan_id = session.begin_analysis(photo("x")).unwrap();
        session.go_back();

        assert_eq!(session.complete_analysis(scan_id, Ok(banana())), Completion::Discarded);
        assert_eq!(session.screen(), &Screen::Dashboard);
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_stale_result_for_previous_scan_is_discarded() {
        let mut session = ScanSession::new();
        session.start_scan();
        let first = session.begin_analysis(photo("first")).unwrap();
        session.scan_another();
        let second = session.begin_analysis(photo("second")).unwrap();
        assert_ne!(first, second);

        // 1枚目の結果が後から届いても2枚目の画面は変わらない
        assert_eq!(session.complete_analysis(first, Err(parse_error())), Completion::Discarded);
        assert!(session.is_analyzing());
        assert!(session.notice().is_none());
        assert_eq!(session.current_photo(), Some(&photo("second")));

        assert_eq!(session.complete_analysis(second, Ok(banana())), Completion::Applied);
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history().latest().unwrap().uri, photo("second"));
    }

    #[test]
    fn test_duplicate_completion_is_discarded() {
        let mut session = ScanSession::new();
        session.start_scan();
        let scan_id = session.begin_analysis(photo("x")).unwrap();

        assert_eq!(session.complete_analysis(scan_id, Ok(banana())), Completion::Applied);
        assert_eq!(session.complete_analysis(scan_id, Ok(banana())), Completion::Discarded);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_invalid_intents_are_ignored() {
        let mut session = ScanSession::new();
        assert_eq!(session.cancel_camera(), Transition::Ignored);
        assert_eq!(session.scan_another(), Transition::Ignored);
        assert_eq!(session.go_back(), Transition::Ignored);
        assert_eq!(session.dismiss_notice(), Transition::Ignored);

        session.start_scan();
        assert_eq!(session.start_scan(), Transition::Ignored);
        assert_eq!(session.go_back(), Transition::Ignored);
        assert_eq!(session.screen().kind(), ScreenKind::Camera);
    }

    #[test]
    fn test_dismiss_notice() {
        let mut session = ScanSession::new();
        session.raise_notice(Notice::capture_failed("カメラが起動していません"));
        assert!(session.accepts(Intent::DismissNotice));

        assert!(session.dismiss_notice().is_moved());
        assert!(session.notice().is_none());
        assert_eq!(session.screen(), &Screen::Dashboard);
    }

    #[test]
    fn test_accepts() {
        let mut session = ScanSession::new();
        assert!(session.accepts(Intent::StartScan));
        assert!(!session.accepts(Intent::CapturePhoto));

        session.start_scan();
        assert!(session.accepts(Intent::CapturePhoto));
        assert!(session.accepts(Intent::CancelCamera));
        assert!(!session.accepts(Intent::GoBack));

        session.begin_analysis(photo("x")).unwrap();
        assert!(session.accepts(Intent::GoBack));
        assert!(session.accepts(Intent::ScanAnother));
        assert!(!session.accepts(Intent::CapturePhoto));
    }

    #[test]
    fn test_every_intent_sequence_keeps_one_screen() {
        let intents = [
            Intent::StartScan,
            Intent::CancelCamera,
            Intent::CapturePhoto,
            Intent::GoBack,
            Intent::ScanAnother,
            Intent::DismissNotice,
        ];

        // 長さ4までの全操作列を総当たり
        let mut sequences: Vec<Vec<Intent>> = vec![vec![]];
        for _ in 0..4 {
            sequences = sequences
                .into_iter()
                .flat_map(|seq| {
                    intents.iter().map(move |&i| {
                        let mut next = seq.clone();
                        next.push(i);
                        next
                    })
                })
                .collect();
        }

        for seq in sequences {
            let mut session = ScanSession::new();
            let mut pending = Vec::new();
            for (n, intent) in seq.iter().enumerate() {
                match intent {
                    Intent::StartScan => { session.start_scan(); }
                    Intent::CancelCamera => { session.cancel_camera(); }
                    Intent::CapturePhoto => {
                        if let Ok(id) = session.begin_analysis(photo(&n.to_string())) {
                            pending.push(id);
                        }
                    }
                    Intent::GoBack => { session.go_back(); }
                    Intent::ScanAnother => { session.scan_another(); }
                    Intent::DismissNotice => { session.dismiss_notice(); }
                }
                assert_consistent(&session);
            }
            for id in pending {
                session.complete_analysis(id, Ok(banana()));
                assert_consistent(&session);
            }
        }
    }
}
