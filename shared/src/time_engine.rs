//! Time Engine - wall-clock readings for the planner
//!
//! Provides the current date and minute of the day in a chosen time zone,
//! plus calendar-date parsing and stepping used by date navigation.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, Offset, Timelike, Utc, Weekday};
use chrono_tz::Tz;

/// Date format used for schedule buckets
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Wall-clock reading for a single tick of the current-time indicator
#[derive(Debug, Clone, PartialEq)]
pub struct ClockReading {
    /// Calendar date in the reading's zone
    pub date: NaiveDate,
    /// Minutes since local midnight (0-1439)
    pub minute_of_day: u32,
    /// Hour in 24-hour format (0-23)
    pub hour24: u32,
    /// Minute (0-59)
    pub minute: u32,
    /// Second (0-59)
    pub second: u32,
    /// UTC offset in minutes (e.g., -480 for UTC-8)
    pub utc_offset_minutes: i32,
    /// Time zone abbreviation (e.g., "PST", "KST")
    pub tz_abbrev: String,
}

impl ClockReading {
    /// Format the time as "HH:MM"
    pub fn format_time(&self) -> String {
        format!("{:02}:{:02}", self.hour24, self.minute)
    }

    /// Format the UTC offset as "UTC±hh:mm"
    pub fn format_utc_offset(&self) -> String {
        let sign = if self.utc_offset_minutes >= 0 { "+" } else { "-" };
        let abs_minutes = self.utc_offset_minutes.abs();
        format!("UTC{}{:02}:{:02}", sign, abs_minutes / 60, abs_minutes % 60)
    }
}

/// Read the clock now in `tz`
pub fn compute_clock_reading(tz: Tz) -> ClockReading {
    compute_clock_reading_at(tz, Utc::now())
}

/// Read the clock in `tz` at a specific instant
pub fn compute_clock_reading_at(tz: Tz, now_utc: DateTime<Utc>) -> ClockReading {
    let local = now_utc.with_timezone(&tz);
    let offset = local.offset().fix();

    ClockReading {
        date: local.date_naive(),
        minute_of_day: local.hour() * 60 + local.minute(),
        hour24: local.hour(),
        minute: local.minute(),
        second: local.second(),
        utc_offset_minutes: offset.local_minus_utc() / 60,
        tz_abbrev: local.format("%Z").to_string(),
    }
}

/// Minutes since midnight on the machine's local clock
pub fn local_minutes_now() -> u32 {
    let now = Local::now();
    now.hour() * 60 + now.minute()
}

/// Format a date as `YYYY-MM-DD`
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Format a date for headers, e.g. "Sat, Oct 17 2026"
pub fn format_date_long(date: NaiveDate) -> String {
    date.format("%a, %b %-d %Y").to_string()
}

/// Move a date by a number of days (negative steps go back)
pub fn step_date(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days)).unwrap_or(date)
}

/// Sunday-start week containing `date`
pub fn week_dates(date: NaiveDate) -> [NaiveDate; 7] {
    let offset = date.weekday().num_days_from_sunday() as i64;
    let sunday = step_date(date, -offset);
    let mut days = [sunday; 7];
    for (i, day) in days.iter_mut().enumerate() {
        *day = step_date(sunday, i as i64);
    }
    days
}

/// Short weekday label used by the week grid
pub fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "Sun",
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
    }
}

/// Get the system's local timezone as a chrono-tz Tz
pub fn system_timezone() -> Option<Tz> {
    let tz_name = Local::now().format("%Z").to_string();
    tz_name.parse::<Tz>().ok()
}

/// Parse a timezone string into a Tz
pub fn parse_timezone(tz_str: &str) -> Result<Tz, String> {
    tz_str
        .parse::<Tz>()
        .map_err(|_| format!("Invalid timezone: {}", tz_str))
}

/// Search timezones by name (case-insensitive partial match)
pub fn search_timezones(query: &str) -> Vec<Tz> {
    let query_lower = query.to_lowercase();
    chrono_tz::TZ_VARIANTS
        .iter()
        .filter(|tz| tz.name().to_lowercase().contains(&query_lower))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_clock_reading_at_instant() {
        let tz: Tz = "Asia/Seoul".parse().unwrap();
        let instant = Utc.with_ymd_and_hms(2026, 10, 17, 3, 30, 5).unwrap();
        let reading = compute_clock_reading_at(tz, instant);

        assert_eq!(reading.date, NaiveDate::from_ymd_opt(2026, 10, 17).unwrap());
        assert_eq!(reading.minute_of_day, 12 * 60 + 30);
        assert_eq!(reading.format_time(), "12:30");
        assert_eq!(reading.format_utc_offset(), "UTC+09:00");
    }

    #[test]
    fn test_reading_crosses_date_line() {
        let tz: Tz = "America/Los_Angeles".parse().unwrap();
        let instant = Utc.with_ymd_and_hms(2026, 1, 1, 2, 0, 0).unwrap();
        let reading = compute_clock_reading_at(tz, instant);

        assert_eq!(reading.date, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
        assert_eq!(reading.minute_of_day, 18 * 60);
    }

    #[test]
    fn test_reading_date_follows_display_zone() {
        // 20:00 on Oct 17 in Los Angeles is already noon on Oct 18 in Seoul
        let instant = Utc.with_ymd_and_hms(2026, 10, 18, 3, 0, 0).unwrap();
        let la = compute_clock_reading_at(chrono_tz::America::Los_Angeles, instant);
        let seoul = compute_clock_reading_at(chrono_tz::Asia::Seoul, instant);

        assert_eq!(la.date, NaiveDate::from_ymd_opt(2026, 10, 17).unwrap());
        assert_eq!(la.minute_of_day, 20 * 60);
        assert_eq!(seoul.date, NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
        assert_eq!(seoul.minute_of_day, 12 * 60);
    }

    #[test]
    fn test_step_date() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        assert_eq!(format_date(step_date(date, 1)), "2026-10-18");
        assert_eq!(format_date(step_date(date, -17)), "2026-09-30");
    }

    #[test]
    fn test_week_dates_start_on_sunday() {
        // 2026-10-17 is a Saturday
        let week = week_dates(NaiveDate::from_ymd_opt(2026, 10, 17).unwrap());
        assert_eq!(format_date(week[0]), "2026-10-11");
        assert_eq!(format_date(week[6]), "2026-10-17");
        assert_eq!(week[0].weekday(), Weekday::Sun);
    }

    #[test]
    fn test_search_timezones() {
        let results = search_timezones("Seoul");
        assert!(results.iter().any(|tz| tz.name() == "Asia/Seoul"));
    }
}
