//! キー入力ハンドラー関数。

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::{
    events::{FieldKind, FormField},
    form::{FieldUpdate, SourceFile, TimeValue},
    input::InputBoxState,
    shortcuts,
    submit::SubmitError,
    worker::WorkerCmd,
};

use super::App;

/// キー入力を1件処理し、終了すべきならtrueを返す。
pub async fn handle_key(app: &mut App, k: KeyEvent) -> Result<bool> {
    // 入力ボックスが開いていれば最優先で処理する。
    if app.input_box.is_some() {
        handle_input_box_key(app, k);
        return Ok(false);
    }
    handle_form_key(app, k).await
}

/// Ctrl+Cかどうかを判定する。
pub fn is_ctrl_c(k: &KeyEvent) -> bool {
    k.modifiers.contains(KeyModifiers::CONTROL) && k.code == KeyCode::Char('c')
}

/// フォーム画面のキー処理。
async fn handle_form_key(app: &mut App, k: KeyEvent) -> Result<bool> {
    let sc = &app.shortcuts.form;

    if shortcuts::matches_shortcut(&k, &sc.quit) {
        return Ok(true);
    } else if shortcuts::matches_shortcut(&k, &sc.submit) {
        request_submit(app).await;
    } else if shortcuts::matches_shortcut(&k, &sc.next) {
        move_focus(app, 1);
    } else if shortcuts::matches_shortcut(&k, &sc.prev) {
        move_focus(app, -1);
    } else if shortcuts::matches_shortcut(&k, &sc.toggle) {
        // チェックボックス上でのみ切り替える。
        let focus = app.ui.focus;
        if focus.kind() == FieldKind::Checkbox {
            toggle(app, focus);
        }
    } else if shortcuts::matches_shortcut(&k, &sc.activate) {
        let focus = app.ui.focus;
        match focus.kind() {
            FieldKind::Text => {
                app.input_box = Some(InputBoxState::open(focus, current_value(app, focus)));
            }
            FieldKind::Checkbox => toggle(app, focus),
            FieldKind::Button => request_submit(app).await,
        }
    }

    Ok(false)
}

/// 表示中の項目の中でフォーカスを循環移動する。
fn move_focus(app: &mut App, step: isize) {
    let fields = app.visible_fields();
    let pos = fields.iter().position(|f| *f == app.ui.focus).unwrap_or(0);
    let len = fields.len() as isize;
    let next = (pos as isize + step).rem_euclid(len) as usize;
    app.ui.focus = fields[next];
}

/// チェックボックスを反転する。
fn toggle(app: &mut App, field: FormField) {
    let form = app.controller.form();
    let update = match field {
        FormField::AddBreak => FieldUpdate::AddBreak(!form.add_break),
        FormField::GiveOff => FieldUpdate::GiveOff(!form.give_off),
        _ => return,
    };
    app.controller.update(update);
    app.ensure_focus_visible();
}

/// 入力ボックスに初期表示する値。
fn current_value(app: &App, field: FormField) -> String {
    let form = app.controller.form();
    match field {
        FormField::SourceFile => form
            .source_file
            .as_ref()
            .map(|f| f.path().display().to_string())
            .unwrap_or_default(),
        FormField::DriverName => form.driver_name.clone(),
        FormField::BreakDate => form.break_window.date.clone(),
        FormField::BreakTime(bound, c) => TimeValue::parse(form.break_time(bound))
            .component(c)
            .to_string(),
        FormField::OffDate => form.off_date.clone(),
        FormField::AddBreak | FormField::GiveOff | FormField::Submit => String::new(),
    }
}

/// 検証を通ったフォームをWorkerへ送る。
async fn request_submit(app: &mut App) {
    let submission = match app.controller.begin() {
        Ok(s) => s,
        Err(SubmitError::InFlight) => {
            app.ui.status = "Already filtering...".into();
            return;
        }
        Err(_) => {
            // 検証エラーはバナーに表示されている。
            app.ui.status = "Please fix the form".into();
            return;
        }
    };

    let id = submission.id;
    app.ui.status = "Filtering...".into();
    if let Err(e) = app.worker_tx.send(WorkerCmd::Submit(submission)).await {
        // Workerが停止していれば送信失敗として扱う。
        tracing::error!("worker unavailable: {e}");
        app.controller
            .finish(id, Err(SubmitError::Transport("worker stopped".into())));
        app.ui.status = "Filtering failed".into();
    }
}

/// 入力ボックスのキー処理。
fn handle_input_box_key(app: &mut App, k: KeyEvent) {
    let Some(input_state) = &mut app.input_box else {
        return;
    };
    let sc = &app.shortcuts.input_box;

    if shortcuts::matches_shortcut(&k, &sc.confirm) {
        // 入力ボックスを閉じてから値を反映する。
        let target = input_state.target;
        let value = std::mem::take(&mut input_state.value);
        app.input_box = None;
        apply_input(app, target, value);
    } else if shortcuts::matches_shortcut(&k, &sc.cancel) {
        app.input_box = None;
    } else if shortcuts::matches_shortcut(&k, &sc.backspace) {
        input_state.backspace();
    } else if shortcuts::matches_shortcut(&k, &sc.delete) {
        input_state.delete();
    } else if shortcuts::matches_shortcut(&k, &sc.left) {
        input_state.move_left();
    } else if shortcuts::matches_shortcut(&k, &sc.right) {
        input_state.move_right();
    } else if shortcuts::matches_shortcut(&k, &sc.home) {
        input_state.move_home();
    } else if shortcuts::matches_shortcut(&k, &sc.end) {
        input_state.move_end();
    } else if shortcuts::matches_shortcut(&k, &sc.clear_line) {
        input_state.clear_line();
    } else if let KeyCode::Char(c) = k.code
        && !k.modifiers.contains(KeyModifiers::CONTROL)
    {
        // コントロールキーでない場合のみ挿入する。
        input_state.insert_char(c);
    }
}

/// 確定した入力値をフォームへ反映する。
fn apply_input(app: &mut App, target: FormField, value: String) {
    let update = match target {
        FormField::SourceFile => {
            let path = value.trim();
            if path.is_empty() {
                FieldUpdate::SourceFile(None)
            } else {
                match SourceFile::pick(path) {
                    Ok(f) => {
                        app.ui.status = format!("Selected {}", f.name());
                        FieldUpdate::SourceFile(Some(f))
                    }
                    Err(e) => {
                        tracing::warn!("file pick failed: {e}");
                        app.ui.status = format!("File not selected: {e}");
                        return;
                    }
                }
            }
        }
        FormField::DriverName => FieldUpdate::DriverName(value),
        FormField::BreakDate => FieldUpdate::BreakDate(value),
        FormField::BreakTime(bound, component) => FieldUpdate::BreakTimeComponent {
            bound,
            component,
            raw: value,
        },
        FormField::OffDate => FieldUpdate::OffDate(value),
        FormField::AddBreak | FormField::GiveOff | FormField::Submit => return,
    };
    app.controller.update(update);
}
