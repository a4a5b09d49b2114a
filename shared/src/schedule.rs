//! Schedule model and the store that owns it
//!
//! Schedules are bucketed by `(date, list)`. The store validates input at
//! the edge, so everything downstream (the chart in particular) can assume
//! well-formed intervals.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::events::{EventBus, ListenerId, StoreEvent};
use crate::time_math::{duration_minutes, MINUTES_PER_DAY};

/// Category assigned when none is given
pub const DEFAULT_CATEGORY: &str = "other";

/// Which bucket a schedule lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListType {
    /// Intended activity
    Plan,
    /// Actual activity
    Record,
}

impl ListType {
    pub fn label(&self) -> &'static str {
        match self {
            ListType::Plan => "Plan",
            ListType::Record => "Record",
        }
    }

    pub fn all() -> &'static [ListType] {
        &[ListType::Plan, ListType::Record]
    }
}

/// A plan or record entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: String,
    pub title: String,
    /// Minutes since midnight, `[0, 1440)`
    pub start_time: u32,
    /// Minutes since midnight, `[0, 1440)`; below `start_time` means it crosses midnight
    pub end_time: u32,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    pub date: NaiveDate,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl Schedule {
    pub fn duration(&self) -> u32 {
        duration_minutes(self.start_time, self.end_time)
    }

    /// End of the part of the schedule drawn on its own day
    ///
    /// A schedule that crosses midnight is clipped at 1440.
    pub fn end_within_day(&self) -> u32 {
        if self.end_time < self.start_time {
            MINUTES_PER_DAY
        } else {
            self.end_time
        }
    }
}

/// Form input for a new schedule
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewSchedule {
    pub title: String,
    pub start_time: u32,
    pub end_time: u32,
    pub category: Option<String>,
    pub memo: Option<String>,
}

/// Replacement fields for an existing schedule
pub type ScheduleUpdate = NewSchedule;

/// Validation and lookup failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("Title is required")]
    EmptyTitle,
    #[error("Start and end time cannot be equal")]
    SameStartEnd,
    #[error("Time {0} is outside the day")]
    OutOfRange(u32),
    #[error("No schedule with id {0}")]
    UnknownSchedule(String),
}

/// Check form input before it reaches a store
pub fn validate(input: &NewSchedule) -> Result<(), ScheduleError> {
    if input.title.trim().is_empty() {
        return Err(ScheduleError::EmptyTitle);
    }
    for time in [input.start_time, input.end_time] {
        if time >= MINUTES_PER_DAY {
            return Err(ScheduleError::OutOfRange(time));
        }
    }
    if input.start_time == input.end_time {
        return Err(ScheduleError::SameStartEnd);
    }
    Ok(())
}

fn normalized_category(category: &Option<String>) -> String {
    match category {
        Some(id) if !id.trim().is_empty() => id.trim().to_string(),
        _ => default_category(),
    }
}

fn normalized_memo(memo: &Option<String>) -> Option<String> {
    memo.as_ref()
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
}

/// External collaborator the chart reads from
pub trait ScheduleStore {
    /// Snapshot of one bucket, ordered by start time
    fn schedules(&self, date: NaiveDate, list: ListType) -> Vec<Schedule>;

    /// Validate and insert; returns the new id
    fn add(&mut self, date: NaiveDate, list: ListType, input: NewSchedule) -> Result<String, ScheduleError>;

    /// Validate and replace the fields of an existing schedule
    fn update(
        &mut self,
        date: NaiveDate,
        list: ListType,
        id: &str,
        update: ScheduleUpdate,
    ) -> Result<(), ScheduleError>;

    /// Remove a schedule; returns false if there was nothing to remove
    fn delete(&mut self, date: NaiveDate, list: ListType, id: &str) -> bool;

    /// Listen for [`StoreEvent::SchedulesChanged`]
    fn subscribe(&mut self, listener: Box<dyn FnMut(&StoreEvent)>) -> ListenerId;

    fn unsubscribe(&mut self, id: ListenerId) -> bool;
}

/// Both lists of one day
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayLists {
    #[serde(default)]
    pub plan: Vec<Schedule>,
    #[serde(default)]
    pub record: Vec<Schedule>,
}

impl DayLists {
    fn list(&self, list: ListType) -> &Vec<Schedule> {
        match list {
            ListType::Plan => &self.plan,
            ListType::Record => &self.record,
        }
    }

    fn list_mut(&mut self, list: ListType) -> &mut Vec<Schedule> {
        match list {
            ListType::Plan => &mut self.plan,
            ListType::Record => &mut self.record,
        }
    }
}

/// Serializable contents of a store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleBook {
    #[serde(default)]
    pub days: BTreeMap<NaiveDate, DayLists>,
}

/// In-process schedule store with change notifications
#[derive(Debug, Default)]
pub struct MemoryScheduleStore {
    book: ScheduleBook,
    bus: EventBus<StoreEvent>,
}

impl MemoryScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_book(book: ScheduleBook) -> Self {
        Self {
            book,
            bus: EventBus::new(),
        }
    }

    pub fn book(&self) -> &ScheduleBook {
        &self.book
    }

    fn publish(&mut self, date: NaiveDate, list: ListType) {
        let schedules = self.schedules(date, list);
        log::debug!(
            "{} list for {} changed ({} schedules)",
            list.label(),
            date,
            schedules.len()
        );
        self.bus.emit(&StoreEvent::SchedulesChanged {
            date,
            list,
            schedules,
        });
    }
}

impl ScheduleStore for MemoryScheduleStore {
    fn schedules(&self, date: NaiveDate, list: ListType) -> Vec<Schedule> {
        let mut schedules = self
            .book
            .days
            .get(&date)
            .map(|day| day.list(list).clone())
            .unwrap_or_default();
        schedules.sort_by_key(|s| s.start_time);
        schedules
    }

    fn add(&mut self, date: NaiveDate, list: ListType, input: NewSchedule) -> Result<String, ScheduleError> {
        validate(&input)?;

        let id = Uuid::new_v4().to_string();
        let schedule = Schedule {
            id: id.clone(),
            title: input.title.trim().to_string(),
            start_time: input.start_time,
            end_time: input.end_time,
            category: normalized_category(&input.category),
            memo: normalized_memo(&input.memo),
            date,
        };

        self.book
            .days
            .entry(date)
            .or_default()
            .list_mut(list)
            .push(schedule);
        self.publish(date, list);
        Ok(id)
    }

    fn update(
        &mut self,
        date: NaiveDate,
        list: ListType,
        id: &str,
        update: ScheduleUpdate,
    ) -> Result<(), ScheduleError> {
        validate(&update)?;

        let existing = self
            .book
            .days
            .get_mut(&date)
            .and_then(|day| day.list_mut(list).iter_mut().find(|s| s.id == id))
            .ok_or_else(|| ScheduleError::UnknownSchedule(id.to_string()))?;

        existing.title = update.title.trim().to_string();
        existing.start_time = update.start_time;
        existing.end_time = update.end_time;
        existing.category = normalized_category(&update.category);
        existing.memo = normalized_memo(&update.memo);

        self.publish(date, list);
        Ok(())
    }

    fn delete(&mut self, date: NaiveDate, list: ListType, id: &str) -> bool {
        let removed = match self.book.days.get_mut(&date) {
            Some(day) => {
                let bucket = day.list_mut(list);
                let before = bucket.len();
                bucket.retain(|s| s.id != id);
                bucket.len() != before
            }
            None => false,
        };

        if removed {
            self.publish(date, list);
        }
        removed
    }

    fn subscribe(&mut self, listener: Box<dyn FnMut(&StoreEvent)>) -> ListenerId {
        self.bus.subscribe(listener)
    }

    fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.bus.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn lunch() -> NewSchedule {
        NewSchedule {
            title: "Lunch".to_string(),
            start_time: 720,
            end_time: 780,
            category: Some("meal".to_string()),
            memo: None,
        }
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        let mut input = lunch();
        input.title = "  ".to_string();
        assert_eq!(validate(&input), Err(ScheduleError::EmptyTitle));

        let mut input = lunch();
        input.end_time = input.start_time;
        assert_eq!(validate(&input), Err(ScheduleError::SameStartEnd));

        let mut input = lunch();
        input.end_time = 1440;
        assert_eq!(validate(&input), Err(ScheduleError::OutOfRange(1440)));
    }

    #[test]
    fn test_add_buckets_by_date_and_list() {
        let mut store = MemoryScheduleStore::new();
        let id = store.add(day(), ListType::Plan, lunch()).unwrap();

        let plans = store.schedules(day(), ListType::Plan);
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].id, id);
        assert_eq!(plans[0].date, day());
        assert!(store.schedules(day(), ListType::Record).is_empty());
    }

    #[test]
    fn test_missing_category_defaults_to_other() {
        let mut store = MemoryScheduleStore::new();
        let mut input = lunch();
        input.category = None;
        store.add(day(), ListType::Record, input).unwrap();

        assert_eq!(store.schedules(day(), ListType::Record)[0].category, "other");
    }

    #[test]
    fn test_update_and_delete() {
        let mut store = MemoryScheduleStore::new();
        let id = store.add(day(), ListType::Plan, lunch()).unwrap();

        let mut change = lunch();
        change.title = "Long lunch".to_string();
        change.end_time = 810;
        store.update(day(), ListType::Plan, &id, change).unwrap();
        let plans = store.schedules(day(), ListType::Plan);
        assert_eq!(plans[0].title, "Long lunch");
        assert_eq!(plans[0].end_time, 810);

        assert_eq!(
            store.update(day(), ListType::Plan, "missing", lunch()),
            Err(ScheduleError::UnknownSchedule("missing".to_string()))
        );

        assert!(store.delete(day(), ListType::Plan, &id));
        assert!(!store.delete(day(), ListType::Plan, &id));
        assert!(store.schedules(day(), ListType::Plan).is_empty());
    }

    #[test]
    fn test_mutations_publish_full_list() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut store = MemoryScheduleStore::new();
        let sink = Rc::clone(&events);
        store.subscribe(Box::new(move |event: &StoreEvent| sink.borrow_mut().push(event.clone())));

        let id = store.add(day(), ListType::Plan, lunch()).unwrap();
        store.delete(day(), ListType::Plan, &id);

        let events = events.borrow();
        assert_eq!(events.len(), 2);
        let StoreEvent::SchedulesChanged { date, list, schedules } = &events[0];
        assert_eq!((*date, *list, schedules.len()), (day(), ListType::Plan, 1));
        let StoreEvent::SchedulesChanged { schedules, .. } = &events[1];
        assert!(schedules.is_empty());
    }

    #[test]
    fn test_crossing_midnight_is_clipped_to_day() {
        let schedule = Schedule {
            id: "night".to_string(),
            title: "Sleep".to_string(),
            start_time: 1380,
            end_time: 420,
            category: "sleep".to_string(),
            memo: None,
            date: day(),
        };
        assert_eq!(schedule.duration(), 480);
        assert_eq!(schedule.end_within_day(), 1440);
    }

    #[test]
    fn test_book_survives_toml() {
        let mut store = MemoryScheduleStore::new();
        store.add(day(), ListType::Plan, lunch()).unwrap();

        let text = toml::to_string_pretty(store.book()).unwrap();
        let book: ScheduleBook = toml::from_str(&text).unwrap();
        assert_eq!(&book, store.book());
    }
}
