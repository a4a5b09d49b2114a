//! Schedule form state
//!
//! Holds the text the user is editing and turns it into validated
//! store input. Rendering lives in `ui.rs`.

use chrono::NaiveDate;
use shared::schedule::DEFAULT_CATEGORY;
use shared::{minutes_to_time_string, time_string_to_minutes, validate, ListType, NewSchedule, Schedule};

/// Whether the form creates a schedule or edits an existing one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { schedule_id: String },
}

#[derive(Debug, Clone)]
pub struct ScheduleForm {
    pub is_open: bool,
    pub mode: FormMode,
    pub list: ListType,
    pub date: NaiveDate,
    pub title: String,
    pub start_text: String,
    pub end_text: String,
    pub category: String,
    pub memo: String,
    pub error: Option<String>,
    pub should_focus_title: bool,
}

impl ScheduleForm {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            is_open: false,
            mode: FormMode::Create,
            list: ListType::Plan,
            date,
            title: String::new(),
            start_text: String::new(),
            end_text: String::new(),
            category: DEFAULT_CATEGORY.to_string(),
            memo: String::new(),
            error: None,
            should_focus_title: false,
        }
    }

    /// Open an empty form over `start..end`
    pub fn open_create(&mut self, list: ListType, date: NaiveDate, start: u32, end: u32) {
        *self = Self {
            is_open: true,
            list,
            start_text: minutes_to_time_string(start),
            end_text: minutes_to_time_string(end),
            should_focus_title: true,
            ..Self::new(date)
        };
    }

    /// Open the form filled from an existing schedule
    pub fn open_edit(&mut self, list: ListType, schedule: &Schedule) {
        *self = Self {
            is_open: true,
            mode: FormMode::Edit {
                schedule_id: schedule.id.clone(),
            },
            list,
            title: schedule.title.clone(),
            start_text: minutes_to_time_string(schedule.start_time),
            end_text: minutes_to_time_string(schedule.end_time),
            category: schedule.category.clone(),
            memo: schedule.memo.clone().unwrap_or_default(),
            should_focus_title: true,
            ..Self::new(schedule.date)
        };
    }

    pub fn close(&mut self) {
        self.is_open = false;
        self.error = None;
    }

    pub fn editing_id(&self) -> Option<&str> {
        match &self.mode {
            FormMode::Edit { schedule_id } => Some(schedule_id),
            FormMode::Create => None,
        }
    }

    pub fn heading(&self) -> String {
        let action = match self.mode {
            FormMode::Create => "New",
            FormMode::Edit { .. } => "Edit",
        };
        format!("{} {}", action, self.list.label().to_lowercase())
    }

    /// Parse and validate the fields
    ///
    /// The error text is what the form shows under the fields.
    pub fn input(&self) -> Result<NewSchedule, String> {
        let start_time =
            time_string_to_minutes(&self.start_text).map_err(|e| format!("Start time: {}", e))?;
        let end_time = time_string_to_minutes(&self.end_text).map_err(|e| format!("End time: {}", e))?;

        let memo = self.memo.trim();
        let input = NewSchedule {
            title: self.title.trim().to_string(),
            start_time,
            end_time,
            category: Some(self.category.clone()),
            memo: (!memo.is_empty()).then(|| memo.to_string()),
        };
        validate(&input).map_err(|e| e.to_string())?;
        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    #[test]
    fn test_create_prefills_times() {
        let mut form = ScheduleForm::new(day());
        form.open_create(ListType::Record, day(), 540, 600);

        assert!(form.is_open);
        assert_eq!(form.start_text, "09:00");
        assert_eq!(form.end_text, "10:00");
        assert_eq!(form.category, "other");
        assert_eq!(form.heading(), "New record");
        assert!(form.editing_id().is_none());
    }

    #[test]
    fn test_edit_prefills_fields() {
        let schedule = Schedule {
            id: "abc".to_string(),
            title: "Lunch".to_string(),
            start_time: 720,
            end_time: 780,
            category: "meal".to_string(),
            memo: Some("with team".to_string()),
            date: day(),
        };
        let mut form = ScheduleForm::new(day());
        form.open_edit(ListType::Plan, &schedule);

        assert_eq!(form.editing_id(), Some("abc"));
        assert_eq!(form.title, "Lunch");
        assert_eq!(form.memo, "with team");
        assert_eq!(form.heading(), "Edit plan");

        let input = form.input().unwrap();
        assert_eq!((input.start_time, input.end_time), (720, 780));
        assert_eq!(input.memo.as_deref(), Some("with team"));
    }

    #[test]
    fn test_validation_messages() {
        let mut form = ScheduleForm::new(day());
        form.open_create(ListType::Plan, day(), 540, 600);
        assert_eq!(form.input().unwrap_err(), "Title is required");

        form.title = "Focus".to_string();
        form.end_text = "09:00".to_string();
        assert_eq!(form.input().unwrap_err(), "Start and end time cannot be equal");

        form.end_text = "9h".to_string();
        assert!(form.input().unwrap_err().starts_with("End time:"));
    }
}
