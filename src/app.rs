//! スキャンの進行役
//!
//! 描画側からの Intent を受けてセッションを遷移させ、
//! カメラの開閉・撮影・解析の起動を行う。
//! カメラは Camera 画面の間だけ開いている。

use crate::analyzer::Analyzer;
use crate::capture::{CameraDevice, CaptureController, CaptureOptions};
use crate::error::SessionError;
use crate::session::{Intent, Notice, ScanSession, SessionView, Transition};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// 操作の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// 遷移した
    Applied,
    /// 現在の画面では意味がない
    Ignored,
    /// 呼び出し規約違反
    Rejected(SessionError),
    /// 失敗して通知を出した
    Failed,
}

pub struct NutriScanApp<D: CameraDevice, A: Analyzer + 'static> {
    session: Arc<Mutex<ScanSession>>,
    camera: CaptureController<D>,
    analyzer: Arc<A>,
    inflight: Vec<JoinHandle<()>>,
}

impl<D: CameraDevice, A: Analyzer + 'static> NutriScanApp<D, A> {
    pub fn new(device: D, analyzer: A) -> Self {
        Self {
            session: Arc::new(Mutex::new(ScanSession::new())),
            camera: CaptureController::new(device),
            analyzer: Arc::new(analyzer),
            inflight: Vec::new(),
        }
    }

    pub fn with_capture_options(mut self, options: CaptureOptions) -> Self {
        self.camera = self.camera.with_options(options);
        self
    }

    pub async fn view(&self) -> SessionView {
        self.session.lock().await.view()
    }

    /// セッションを読み取り専用で参照
    pub async fn with_session<R>(&self, f: impl FnOnce(&ScanSession) -> R) -> R {
        f(&*self.session.lock().await)
    }

    pub fn is_camera_open(&self) -> bool {
        self.camera.is_open()
    }

    /// 実行中の解析の数（破棄予定のものも含む）
    pub fn pending_analyses(&mut self) -> usize {
        self.inflight.retain(|handle| !handle.is_finished());
        self.inflight.len()
    }

    pub async fn dispatch(&mut self, intent: Intent) -> Outcome {
        log::debug!("[APP] {:?}", intent);
        match intent {
            Intent::StartScan | Intent::ScanAnother => self.enter_camera(intent).await,
            Intent::CancelCamera => {
                let transition = self.session.lock().await.cancel_camera();
                if transition.is_moved() {
                    self.camera.release();
                }
                outcome_of(transition)
            }
            Intent::CapturePhoto => self.capture_photo().await,
            Intent::GoBack => outcome_of(self.session.lock().await.go_back()),
            Intent::DismissNotice => outcome_of(self.session.lock().await.dismiss_notice()),
        }
    }

    /// 実行中の解析をすべて待つ
    pub async fn settle(&mut self) {
        for handle in self.inflight.drain(..) {
            if let Err(e) = handle.await {
                log::error!("[APP] 解析タスクが異常終了: {}", e);
            }
        }
    }

    async fn enter_camera(&mut self, intent: Intent) -> Outcome {
        if !self.session.lock().await.accepts(intent) {
            return outcome_of(Transition::Ignored);
        }

        // デバイスを開く間はセッションをロックしない。
        // 並行して書き換えるのは解析タスクの complete_analysis だけで、画面種別は変わらない
        if let Err(e) = self.camera.open() {
            log::warn!("[APP] カメラを開けません: {}", e);
            self.session.lock().await.raise_notice(Notice::capture_failed(&e));
            return Outcome::Failed;
        }

        let transition = {
            let mut session = self.session.lock().await;
            match intent {
                Intent::StartScan => session.start_scan(),
                _ => session.scan_another(),
            }
        };
        if !transition.is_moved() {
            self.camera.release();
        }
        outcome_of(transition)
    }

    async fn capture_photo(&mut self) -> Outcome {
        if let Err(e) = self.session.lock().await.check_capture() {
            log::warn!("[APP] 撮影を拒否: {}", e);
            return Outcome::Rejected(e);
        }

        // 撮影中はロックを持たない
        let image = match self.camera.capture().await {
            Ok(image) => image,
            Err(e) => {
                log::warn!("[APP] 撮影失敗: {}", e);
                self.session.lock().await.raise_notice(Notice::capture_failed(&e));
                return Outcome::Failed;
            }
        };

        let scan_id = match self.session.lock().await.begin_analysis(image.uri.clone()) {
            Ok(scan_id) => scan_id,
            Err(e) => return Outcome::Rejected(e),
        };
        self.camera.release();

        let session = Arc::clone(&self.session);
        let analyzer = Arc::clone(&self.analyzer);
        let handle = tokio::spawn(async move {
            let outcome = analyzer.analyze(&image).await;
            session.lock().await.complete_analysis(scan_id, outcome);
        });

        self.inflight.retain(|handle| !handle.is_finished());
        self.inflight.push(handle);
        Outcome::Applied
    }
}

fn outcome_of(transition: Transition) -> Outcome {
    match transition {
        Transition::Moved { .. } => Outcome::Applied,
        Transition::Ignored => Outcome::Ignored,
    }
}
