//! フォーム上のフォーカス対象とUI状態。

use crate::form::{BreakBound, FormState, TimeComponent};

/// フォーム上でフォーカスできる項目。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    /// アップロードするExcelファイルのパス。
    SourceFile,
    /// ドライバー名。
    DriverName,
    /// 休憩追加のチェックボックス。
    AddBreak,
    /// 休憩日（YYYY-MM-DD）。
    BreakDate,
    /// 休憩開始/終了時刻の時・分・秒セル。
    BreakTime(BreakBound, TimeComponent),
    /// 休日付与のチェックボックス。
    GiveOff,
    /// 休日（YYYY-MM-DD）。
    OffDate,
    /// 送信ボタン。
    Submit,
}

/// 項目の操作種別。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Checkbox,
    Button,
}

const TIME_CELLS: [TimeComponent; 3] = [
    TimeComponent::Hour,
    TimeComponent::Minute,
    TimeComponent::Second,
];

impl FormField {
    /// 現在のフラグで表示される項目を上から順に返す。
    pub fn visible(form: &FormState) -> Vec<FormField> {
        let mut fields = vec![FormField::SourceFile, FormField::DriverName, FormField::AddBreak];
        if form.add_break {
            fields.push(FormField::BreakDate);
            for bound in [BreakBound::Start, BreakBound::End] {
                fields.extend(TIME_CELLS.iter().map(|c| FormField::BreakTime(bound, *c)));
            }
        }
        fields.push(FormField::GiveOff);
        if form.give_off {
            fields.push(FormField::OffDate);
        }
        fields.push(FormField::Submit);
        fields
    }

    pub fn kind(self) -> FieldKind {
        match self {
            FormField::AddBreak | FormField::GiveOff => FieldKind::Checkbox,
            FormField::Submit => FieldKind::Button,
            _ => FieldKind::Text,
        }
    }

    /// 入力ボックスに表示するプロンプト。
    pub fn prompt(self) -> String {
        match self {
            FormField::SourceFile => "Excel file path (.xlsx):".into(),
            FormField::DriverName => "Driver name:".into(),
            FormField::BreakDate => "Break date (YYYY-MM-DD):".into(),
            FormField::OffDate => "Off date (YYYY-MM-DD):".into(),
            FormField::BreakTime(bound, c) => {
                let which = match bound {
                    BreakBound::Start => "start",
                    BreakBound::End => "end",
                };
                format!("Break {which} {} (0-{}):", c.label(), c.max())
            }
            FormField::AddBreak => "Add break period".into(),
            FormField::GiveOff => "Give off day".into(),
            FormField::Submit => "Filter Data".into(),
        }
    }
}

/// 描画側と共有するUI状態。
#[derive(Clone, Debug)]
pub struct UiState {
    /// フォーカス中の項目。
    pub focus: FormField,
    /// 画面下部のステータス文言。
    pub status: String,
    /// 最後に保存したファイル名。
    pub last_download: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            focus: FormField::SourceFile,
            status: "Ready".into(),
            last_download: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FieldUpdate;

    #[test]
    fn test_break_and_off_fields_follow_flags() {
        let form = FormState::default();
        let fields = FormField::visible(&form);
        assert_eq!(fields.len(), 5);
        assert!(!fields.contains(&FormField::BreakDate));
        assert!(!fields.contains(&FormField::OffDate));

        let form = form
            .with(FieldUpdate::AddBreak(true))
            .with(FieldUpdate::GiveOff(true));
        let fields = FormField::visible(&form);
        assert_eq!(fields.len(), 13);
        assert_eq!(fields[3], FormField::BreakDate);
        assert_eq!(
            fields[4],
            FormField::BreakTime(BreakBound::Start, TimeComponent::Hour)
        );
        assert_eq!(fields[fields.len() - 1], FormField::Submit);
    }
}
