//! Wire payload for `POST /filter-driver`.

use anyhow::Result;
use reqwest::multipart::{Form, Part};

use super::{
    state::{FormState, SourceFile},
    validate::{ValidationError, validate},
};

/// Millisecond suffix the backend expects on break timestamps.
const BREAK_MILLIS_SUFFIX: &str = ".000";

/// Validated, trimmed payload ready to be sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterRequest {
    pub file: SourceFile,
    pub driver_name: String,
    pub add_break: bool,
    pub give_off: bool,
    /// `(break_start, break_end)`, present only when a break is added.
    pub break_range: Option<(String, String)>,
    pub off_date: Option<String>,
}

impl FilterRequest {
    /// Validate the form and map it into a payload.
    pub fn build(form: &FormState) -> Result<Self, ValidationError> {
        validate(form)?;
        let Some(file) = form.source_file.clone() else {
            return Err(ValidationError::MissingFileOrDriver);
        };

        let break_range = form.add_break.then(|| {
            let w = &form.break_window;
            let date = w.date.trim();
            (
                format!("{date} {}{BREAK_MILLIS_SUFFIX}", w.start_time.trim()),
                format!("{date} {}{BREAK_MILLIS_SUFFIX}", w.end_time.trim()),
            )
        });
        let off_date = form.give_off.then(|| form.off_date.trim().to_string());

        Ok(Self {
            file,
            driver_name: form.driver_name.trim().to_string(),
            add_break: form.add_break,
            give_off: form.give_off,
            break_range,
            off_date,
        })
    }

    /// Scalar multipart fields in send order; disabled sections are omitted.
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("driver_name", self.driver_name.clone()),
            ("add_break", self.add_break.to_string()),
            ("give_off", self.give_off.to_string()),
        ];
        if let Some((start, end)) = &self.break_range {
            fields.push(("break_start", start.clone()));
            fields.push(("break_end", end.clone()));
        }
        if let Some(off) = &self.off_date {
            fields.push(("off_date", off.clone()));
        }
        fields
    }

    /// Read the source file and assemble the multipart body.
    pub async fn into_multipart(self) -> Result<Form> {
        let bytes = tokio::fs::read(self.file.path()).await?;
        let file_part = Part::bytes(bytes).file_name(self.file.name().to_string());
        let form = self
            .text_fields()
            .into_iter()
            .fold(Form::new().part("file", file_part), |form, (name, value)| {
                form.text(name, value)
            });
        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::state::FieldUpdate;

    fn jane_with_break() -> FormState {
        FormState::default()
            .with(FieldUpdate::SourceFile(Some(SourceFile::new("schedule.xlsx"))))
            .with(FieldUpdate::DriverName("  Jane Doe ".into()))
            .with(FieldUpdate::AddBreak(true))
            .with(FieldUpdate::BreakDate("2024-03-01".into()))
            .with(FieldUpdate::BreakStart("13:00:00".into()))
            .with(FieldUpdate::BreakEnd("14:00:00".into()))
    }

    fn keys(req: &FilterRequest) -> Vec<&'static str> {
        req.text_fields().into_iter().map(|(k, _)| k).collect()
    }

    #[test]
    fn test_break_timestamps_carry_fixed_millis() {
        let req = FilterRequest::build(&jane_with_break()).unwrap();
        assert_eq!(
            req.text_fields(),
            vec![
                ("driver_name", "Jane Doe".to_string()),
                ("add_break", "true".to_string()),
                ("give_off", "false".to_string()),
                ("break_start", "2024-03-01 13:00:00.000".to_string()),
                ("break_end", "2024-03-01 14:00:00.000".to_string()),
            ]
        );
        assert_eq!(req.file.name(), "schedule.xlsx");
    }

    #[test]
    fn test_stale_break_values_are_not_sent() {
        let form = jane_with_break().with(FieldUpdate::AddBreak(false));
        let req = FilterRequest::build(&form).unwrap();
        let k = keys(&req);
        assert!(!k.contains(&"break_start"));
        assert!(!k.contains(&"break_end"));
        assert_eq!(req.break_range, None);
    }

    #[test]
    fn test_off_date_is_trimmed_and_only_sent_when_enabled() {
        let form = jane_with_break()
            .with(FieldUpdate::AddBreak(false))
            .with(FieldUpdate::OffDate(" 2024-03-02 ".into()));
        assert!(!keys(&FilterRequest::build(&form).unwrap()).contains(&"off_date"));

        let form = form.with(FieldUpdate::GiveOff(true));
        let req = FilterRequest::build(&form).unwrap();
        assert_eq!(req.off_date.as_deref(), Some("2024-03-02"));
        assert!(req.text_fields().contains(&("give_off", "true".to_string())));
    }

    #[test]
    fn test_invalid_form_does_not_build() {
        let form = jane_with_break().with(FieldUpdate::BreakEnd("24:00:00".into()));
        assert_eq!(
            FilterRequest::build(&form),
            Err(ValidationError::InvalidBreakTime)
        );
    }

    #[tokio::test]
    async fn test_multipart_requires_a_readable_file() {
        let dir = tempfile::tempdir().unwrap();
        let form = jane_with_break().with(FieldUpdate::SourceFile(Some(SourceFile::new(
            dir.path().join("gone.xlsx"),
        ))));
        let req = FilterRequest::build(&form).unwrap();
        assert!(req.into_multipart().await.is_err());
    }
}
