//! Shared library for the time circle planner
//!
//! Holds the radial chart engine and the collaborators it reads from:
//! the schedule store, chart settings and categories, plus time helpers
//! and config persistence.

pub mod category;
pub mod chart;
pub mod config;
pub mod day_view;
pub mod events;
pub mod gesture;
pub mod interval_set;
pub mod schedule;
pub mod settings;
pub mod time_engine;
pub mod time_math;

pub use category::{Category, CategoryResolver, CategoryTable, Rgb};
pub use chart::{Bounds, ChartScene, Point, RadialChart, SurfaceHost, TimerAction};
pub use config::{config_dir, load_config, save_config, ConfigError};
pub use events::{ChartEvent, EventBus, ListenerId, SettingsEvent, StoreEvent};
pub use schedule::{
    validate, ListType, MemoryScheduleStore, NewSchedule, Schedule, ScheduleBook, ScheduleError, ScheduleStore,
    ScheduleUpdate,
};
pub use settings::{ChartSettings, SettingsProvider, SettingsStore};
pub use time_engine::{
    compute_clock_reading, format_date, format_date_long, parse_timezone, search_timezones, step_date,
    system_timezone, ClockReading,
};
pub use time_math::{format_time_range, minutes_to_time_string, time_string_to_minutes};
