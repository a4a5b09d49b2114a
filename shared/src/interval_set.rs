//! Empty-interval inference
//!
//! The day is split into buckets of `granularity` minutes. Every bucket a
//! schedule touches is occupied; each maximal run of free buckets becomes
//! one [`EmptyInterval`].

use crate::schedule::Schedule;
use crate::time_math::MINUTES_PER_DAY;

/// A maximal free time range, `start_time < end_time <= 1440`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyInterval {
    pub start_time: u32,
    pub end_time: u32,
}

impl EmptyInterval {
    pub fn duration(&self) -> u32 {
        self.end_time - self.start_time
    }
}

/// Free intervals of one day's schedules, ascending and disjoint
///
/// `granularity` of 0 is treated as 1.
pub fn build_empty_intervals(schedules: &[Schedule], granularity: u32) -> Vec<EmptyInterval> {
    let granularity = granularity.max(1);
    let bucket_count = MINUTES_PER_DAY.div_ceil(granularity) as usize;
    let mut occupied = vec![false; bucket_count];

    for schedule in schedules {
        let start = schedule.start_time.min(MINUTES_PER_DAY);
        let end = schedule.end_within_day().min(MINUTES_PER_DAY);
        if end <= start {
            continue;
        }
        let first = (start / granularity) as usize;
        let last = ((end - 1) / granularity) as usize;
        for bucket in occupied.iter_mut().take(last + 1).skip(first) {
            *bucket = true;
        }
    }

    let mut intervals = Vec::new();
    let mut bucket = 0;
    while bucket < bucket_count {
        if occupied[bucket] {
            bucket += 1;
            continue;
        }
        let run_start = bucket;
        while bucket < bucket_count && !occupied[bucket] {
            bucket += 1;
        }
        intervals.push(EmptyInterval {
            start_time: run_start as u32 * granularity,
            end_time: (bucket as u32 * granularity).min(MINUTES_PER_DAY),
        });
    }

    intervals
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn schedule(start: u32, end: u32) -> Schedule {
        Schedule {
            id: format!("{}-{}", start, end),
            title: "Block".to_string(),
            start_time: start,
            end_time: end,
            category: "other".to_string(),
            memo: None,
            date: NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
        }
    }

    fn spans(intervals: &[EmptyInterval]) -> Vec<(u32, u32)> {
        intervals.iter().map(|i| (i.start_time, i.end_time)).collect()
    }

    #[test]
    fn test_empty_day_is_one_interval() {
        assert_eq!(spans(&build_empty_intervals(&[], 15)), vec![(0, 1440)]);
    }

    #[test]
    fn test_single_schedule_splits_day() {
        let intervals = build_empty_intervals(&[schedule(540, 600)], 15);
        assert_eq!(spans(&intervals), vec![(0, 540), (600, 1440)]);
    }

    #[test]
    fn test_overlapping_schedules_merge() {
        let intervals = build_empty_intervals(&[schedule(480, 600), schedule(540, 660)], 15);
        assert_eq!(spans(&intervals), vec![(0, 480), (660, 1440)]);
    }

    #[test]
    fn test_partial_tail_bucket_is_occupied() {
        // 09:05-09:20 touches the 09:00 and 09:15 buckets
        let intervals = build_empty_intervals(&[schedule(545, 560)], 15);
        assert_eq!(spans(&intervals), vec![(0, 540), (570, 1440)]);
    }

    #[test]
    fn test_adjacent_schedules_leave_no_gap() {
        let intervals = build_empty_intervals(&[schedule(0, 720), schedule(720, 1440)], 30);
        assert!(intervals.is_empty());
    }

    #[test]
    fn test_crossing_midnight_is_clipped() {
        let intervals = build_empty_intervals(&[schedule(1380, 60)], 60);
        assert_eq!(spans(&intervals), vec![(0, 1380)]);
    }

    #[test]
    fn test_uneven_granularity_clamps_last_gap() {
        let intervals = build_empty_intervals(&[], 700);
        assert_eq!(spans(&intervals), vec![(0, 1440)]);
    }

    #[test]
    fn test_input_is_untouched() {
        let input = vec![schedule(540, 600)];
        let before = input.clone();
        build_empty_intervals(&input, 15);
        assert_eq!(input, before);
    }
}
