//! レイアウト計算のヘルパー関数

use ratatui::prelude::*;

/// フォーム画面の4つの領域
pub struct FormLayout {
    /// タイトルの領域
    pub header: Rect,
    /// エラーバナーの領域（エラーが無い時は高さ0）
    pub banner: Rect,
    /// フォーム本体の領域
    pub body: Rect,
    /// HELPバーの領域
    pub help_bar: Rect,
    /// STATUSバーの領域
    pub status_bar: Rect,
}

/// フォーム画面を縦に分割する。
pub fn create_form_layout(area: Rect, has_banner: bool) -> FormLayout {
    let banner_height = if has_banner { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),             // タイトル
            Constraint::Length(banner_height), // エラーバナー
            Constraint::Min(1),                // フォーム本体
            Constraint::Length(3),             // HELPバー
            Constraint::Length(3),             // STATUSバー
        ])
        .split(area);

    FormLayout {
        header: chunks[0],
        banner: chunks[1],
        body: chunks[2],
        help_bar: chunks[3],
        status_bar: chunks[4],
    }
}
