//! TUIのイベントループ、入力処理、状態管理。

mod handlers;
mod render;

use anyhow::Result;
use crossterm::event::{self, Event};
use std::{path::PathBuf, sync::Arc, time::Duration};
use tokio::sync::mpsc;

use crate::{
    config::Config,
    download::{DirectorySaver, DownloadTrigger},
    events::{FormField, UiState},
    input::InputBoxState,
    service::HttpFilterService,
    shortcuts::Shortcuts,
    submit::{SubmissionController, SubmitOutcome},
    ui::Tui,
    worker::{self, WorkerCmd, WorkerEvent},
};

use handlers::{handle_key, is_ctrl_c};
use render::draw;

/// 入力処理と描画で共有するアプリ状態。
pub struct App {
    /// 解決済みのバックエンドURL（表示用）。
    pub backend_url: String,
    /// フォーム状態と送信ライフサイクル。
    pub controller: SubmissionController,
    /// フォーカスやステータスなどUI固有の状態。
    pub ui: UiState,
    /// Workerへのコマンド送信チャネル。
    pub worker_tx: mpsc::Sender<WorkerCmd>,
    /// Workerからのイベント受信チャネル。
    pub worker_rx: mpsc::Receiver<WorkerEvent>,
    /// 入力ボックスの状態（入力中はSome）。
    pub input_box: Option<InputBoxState>,
    /// ショートカットキー設定。
    pub shortcuts: Shortcuts,
}

impl App {
    /// 設定からコントローラとWorkerを組み立てる。
    pub fn new(cfg: &Config, shortcuts: Shortcuts) -> Self {
        let backend_url = cfg.backend_base_url();
        tracing::info!("downloads go to {}", cfg.download.dir.display());

        // Worker通信用のコマンド/イベントチャネルを作る。
        let (tx_cmd, rx_cmd) = mpsc::channel::<WorkerCmd>(8);
        let (tx_ev, rx_ev) = mpsc::channel::<WorkerEvent>(8);
        let service = Arc::new(HttpFilterService::new(&backend_url));
        tracing::info!("filter endpoint: {}", service.endpoint());
        tokio::spawn(worker::run(rx_cmd, tx_ev, service));

        let saver = DirectorySaver::new(cfg.download.dir.clone());
        Self {
            backend_url,
            controller: SubmissionController::new(DownloadTrigger::new(saver)),
            ui: UiState::default(),
            worker_tx: tx_cmd,
            worker_rx: rx_ev,
            input_box: None,
            shortcuts,
        }
    }

    /// 現在表示されている項目一覧。
    pub fn visible_fields(&self) -> Vec<FormField> {
        FormField::visible(self.controller.form())
    }

    /// 非表示になった項目にフォーカスが残らないよう補正する。
    pub fn ensure_focus_visible(&mut self) {
        if !self.visible_fields().contains(&self.ui.focus) {
            self.ui.focus = FormField::SourceFile;
        }
    }
}

/// ユーザーが終了するまでメインTUIループを回す。
pub async fn run_app(terminal: &mut Tui) -> Result<()> {
    // 設定ファイルを読み込む（初回はデフォルトを生成）。
    let cfg = Config::load_or_default(&PathBuf::from("config.toml"))?;
    // ショートカット設定を読み込む（無ければデフォルト）。
    let shortcuts = Shortcuts::load_or_default("shortcut.toml")?;

    let mut app = App::new(&cfg, shortcuts);

    loop {
        // 現在の状態を描画する。
        terminal.draw(|f| draw(f, &app))?;

        // 入力処理の前にWorkerイベントを消化する。
        while let Ok(ev) = app.worker_rx.try_recv() {
            handle_worker_event(&mut app, ev);
        }

        // UIの応答性確保のため短いタイムアウトで入力をポーリングする。
        if event::poll(Duration::from_millis(50))?
            && let Event::Key(k) = event::read()?
        {
            if is_ctrl_c(&k) {
                break;
            }
            if handle_key(&mut app, k).await? {
                break;
            }
        }
    }
    Ok(())
}

/// WorkerイベントをUI状態へ反映する。
fn handle_worker_event(app: &mut App, ev: WorkerEvent) {
    match ev {
        WorkerEvent::Finished { id, result } => match app.controller.finish(id, result) {
            Some(SubmitOutcome::Downloaded { filename }) => {
                // フォームは初期化済みなので先頭へ戻る。
                app.ui.status = format!("Saved {filename}");
                app.ui.last_download = Some(filename);
                app.ui.focus = FormField::SourceFile;
            }
            Some(SubmitOutcome::Failed(_)) => {
                // メッセージはバナーに出ている。
                app.ui.status = "Filtering failed".into();
            }
            None => {}
        },
    }
}
