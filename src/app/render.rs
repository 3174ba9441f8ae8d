//! TUI描画関連の関数。

use ratatui::{
    Frame,
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::{
    events::FormField,
    form::{BreakBound, FormState, TimeComponent, TimeValue},
    input, layout,
    shortcuts::format_keys,
    submit::Phase,
};

use super::App;

/// 画面全体のレイアウトを描画する。
pub fn draw(f: &mut Frame, app: &App) {
    let banner = app.controller.banner();
    let main_layout = layout::create_form_layout(f.area(), banner.is_some());

    let header = Paragraph::new(vec![
        Line::from("Driver Data Filter").bold(),
        Line::from("Filter and download driver schedules").fg(Color::Gray),
    ])
    .alignment(Alignment::Center);
    f.render_widget(header, main_layout.header);

    // エラーは1つだけ赤いバナーで表示する。
    if let Some(msg) = banner {
        let banner_widget = Paragraph::new(msg.to_string())
            .block(Block::default().borders(Borders::ALL).title("Error"))
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true });
        f.render_widget(banner_widget, main_layout.banner);
    }

    let body = Paragraph::new(form_lines(app))
        .block(Block::default().borders(Borders::ALL).title("FORM"));
    f.render_widget(body, main_layout.body);

    let help_bar = Paragraph::new(help_text(app))
        .block(Block::default().borders(Borders::ALL).title("HELP"))
        .wrap(Wrap { trim: true });
    f.render_widget(help_bar, main_layout.help_bar);

    f.render_widget(build_status_bar(app), main_layout.status_bar);

    // 入力ボックスが開いていれば重ねて描画する。
    if let Some(input_state) = &app.input_box {
        input::render_input_box(f, input_state);
    }
}

/// フォーカス中なら強調スタイルを返す。
fn focus_style(app: &App, field: FormField) -> Style {
    if app.ui.focus == field {
        Style::default()
            .bg(Color::Rgb(255, 140, 0))
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

fn checkbox(checked: bool) -> &'static str {
    if checked { "[x]" } else { "[ ]" }
}

/// 表示中の項目をフォームの行へ変換する。時刻セルは1行にまとめる。
fn form_lines(app: &App) -> Vec<Line<'static>> {
    let form = app.controller.form();
    let mut lines = Vec::new();
    for field in app.visible_fields() {
        let line = match field {
            FormField::SourceFile => labeled(
                app,
                field,
                "Excel file",
                form.source_file
                    .as_ref()
                    .map(|s| s.path().display().to_string())
                    .unwrap_or_else(|| "(none)".into()),
            ),
            FormField::DriverName => labeled(app, field, "Driver name", form.driver_name.clone()),
            FormField::AddBreak => Line::from(Span::styled(
                format!("{} Add Break Period", checkbox(form.add_break)),
                focus_style(app, field),
            )),
            FormField::BreakDate => {
                labeled(app, field, "  Break date", form.break_window.date.clone())
            }
            FormField::BreakTime(bound, TimeComponent::Hour) => time_line(app, form, bound),
            FormField::BreakTime(..) => continue,
            FormField::GiveOff => Line::from(Span::styled(
                format!("{} Give Off Day", checkbox(form.give_off)),
                focus_style(app, field),
            )),
            FormField::OffDate => labeled(app, field, "  Off date", form.off_date.clone()),
            FormField::Submit => {
                let label = if app.controller.is_in_flight() {
                    "[ Filtering... ]"
                } else {
                    "[ Filter Data ]"
                };
                lines.push(Line::default());
                Line::from(Span::styled(label, focus_style(app, field)))
            }
        };
        lines.push(line);
    }
    lines
}

fn labeled(app: &App, field: FormField, label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!("{label:<14}")),
        Span::styled(
            if value.is_empty() { "_".to_string() } else { value },
            focus_style(app, field),
        ),
    ])
}

/// `HH:MM:SS` の3セルを1行で描画する。
fn time_line(app: &App, form: &FormState, bound: BreakBound) -> Line<'static> {
    let label = match bound {
        BreakBound::Start => "  Break start",
        BreakBound::End => "  Break end",
    };
    let stored = TimeValue::parse(form.break_time(bound));
    let mut spans = vec![Span::raw(format!("{label:<14}"))];
    for (i, c) in [TimeComponent::Hour, TimeComponent::Minute, TimeComponent::Second]
        .into_iter()
        .enumerate()
    {
        if i > 0 {
            spans.push(Span::raw(":"));
        }
        let value = match stored.component(c) {
            "" => c.label().to_string(),
            v => v.to_string(),
        };
        spans.push(Span::styled(value, focus_style(app, FormField::BreakTime(bound, c))));
    }
    Line::from(spans)
}

/// ショートカット一覧。
fn help_text(app: &App) -> String {
    let sc = &app.shortcuts.form;
    format!(
        "{}: edit/toggle | {}: toggle | {}/{}: move | {}: submit | {}: quit",
        format_keys(&sc.activate),
        format_keys(&sc.toggle),
        format_keys(&sc.prev),
        format_keys(&sc.next),
        format_keys(&sc.submit),
        format_keys(&sc.quit),
    )
}

/// ステータスバーを構築する。
fn build_status_bar(app: &App) -> Paragraph<'static> {
    let phase = match app.controller.phase() {
        Phase::Submitting => "Filtering...",
        _ => app.ui.status.as_str(),
    };
    let last = app.ui.last_download.as_deref().unwrap_or("-");
    Paragraph::new(format!(
        "{phase} | backend: {} | last file: {last}",
        app.backend_url
    ))
    .block(Block::default().borders(Borders::ALL).title("STATUS"))
    .wrap(Wrap { trim: true })
}
