//! Tabular day and week views and the plan/record summary
//!
//! Schedules are laid out on hour rows. Each schedule becomes one block
//! per hour it touches, positioned by fractions of the row height.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::schedule::{ListType, Schedule, ScheduleStore};
use crate::time_engine::{week_dates, weekday_label};
use crate::time_math::duration_minutes;

/// Part of a schedule drawn inside one hour row
#[derive(Debug, Clone, PartialEq)]
pub struct HourBlock {
    pub schedule_id: String,
    pub title: String,
    pub category: String,
    pub hour: u32,
    /// Offset from the top of the row, 0.0-1.0
    pub top: f32,
    /// Height as a fraction of the row, 0.0-1.0
    pub height: f32,
    /// Only the first block of a schedule carries its title
    pub show_title: bool,
}

/// One hour of a timetable
#[derive(Debug, Clone, PartialEq)]
pub struct HourRow {
    pub hour: u32,
    pub label: String,
    pub blocks: Vec<HourBlock>,
}

/// Split a schedule into per-hour blocks, clipped to its own day
pub fn hour_blocks(schedule: &Schedule) -> Vec<HourBlock> {
    let start = schedule.start_time;
    let end = schedule.end_within_day();
    if end <= start {
        return Vec::new();
    }

    let first_hour = start / 60;
    let last_hour = (end - 1) / 60;

    (first_hour..=last_hour)
        .map(|hour| {
            let row_start = (hour * 60).max(start);
            let row_end = ((hour + 1) * 60).min(end);
            HourBlock {
                schedule_id: schedule.id.clone(),
                title: schedule.title.clone(),
                category: schedule.category.clone(),
                hour,
                top: (row_start - hour * 60) as f32 / 60.0,
                height: (row_end - row_start) as f32 / 60.0,
                show_title: hour == first_hour,
            }
        })
        .collect()
}

/// 24 hour rows holding the blocks of `schedules`
pub fn day_timetable(schedules: &[Schedule]) -> Vec<HourRow> {
    let mut rows: Vec<HourRow> = (0..24)
        .map(|hour| HourRow {
            hour,
            label: format!("{}:00", hour),
            blocks: Vec::new(),
        })
        .collect();

    for schedule in schedules {
        for block in hour_blocks(schedule) {
            if let Some(row) = rows.get_mut(block.hour as usize) {
                row.blocks.push(block);
            }
        }
    }
    rows
}

/// Sunday-start week of timetables for one list
#[derive(Debug, Clone, PartialEq)]
pub struct WeekGrid {
    pub dates: [NaiveDate; 7],
    /// Column headers such as "Sun (10/11)"
    pub headers: Vec<String>,
    /// One timetable per day, in `dates` order
    pub days: Vec<Vec<HourRow>>,
}

impl WeekGrid {
    /// Blocks in the cell for `day` (0 = Sunday) and `hour`
    pub fn cell(&self, day: usize, hour: u32) -> &[HourBlock] {
        self.days
            .get(day)
            .and_then(|rows| rows.get(hour as usize))
            .map(|row| row.blocks.as_slice())
            .unwrap_or(&[])
    }
}

/// Week grid for the week containing `date`
pub fn build_week_grid(date: NaiveDate, store: &dyn ScheduleStore, list: ListType) -> WeekGrid {
    let dates = week_dates(date);
    let headers = dates
        .iter()
        .map(|d| format!("{} ({}/{})", weekday_label(d.weekday()), d.month(), d.day()))
        .collect();
    let days = dates
        .iter()
        .map(|d| day_timetable(&store.schedules(*d, list)))
        .collect();

    WeekGrid { dates, headers, days }
}

/// Planned and recorded minutes of one category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryTotals {
    pub plan: u32,
    pub record: u32,
}

/// Plan vs record totals for one day
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DaySummary {
    pub plan_minutes: u32,
    pub record_minutes: u32,
    /// Keyed by category id
    pub by_category: BTreeMap<String, CategoryTotals>,
}

impl DaySummary {
    /// Recorded time as a share of planned time
    pub fn record_ratio(&self) -> Option<f32> {
        (self.plan_minutes > 0).then(|| self.record_minutes as f32 / self.plan_minutes as f32)
    }
}

pub fn summarize(plan: &[Schedule], record: &[Schedule]) -> DaySummary {
    let mut summary = DaySummary::default();

    for schedule in plan {
        let minutes = duration_minutes(schedule.start_time, schedule.end_time);
        summary.plan_minutes += minutes;
        summary.by_category.entry(schedule.category.clone()).or_default().plan += minutes;
    }
    for schedule in record {
        let minutes = duration_minutes(schedule.start_time, schedule.end_time);
        summary.record_minutes += minutes;
        summary.by_category.entry(schedule.category.clone()).or_default().record += minutes;
    }

    summary
}
