//! Scene primitives produced by the chart for a host to draw
//!
//! The static layer (backdrops, ticks, hour labels) is rebuilt only on
//! mount. The dynamic layer (arcs and their labels) is replaced on every
//! render.

use crate::category::{CategoryResolver, Rgb};
use crate::interval_set::EmptyInterval;
use crate::schedule::Schedule;
use crate::time_math::{day_minutes_to_angle, format_time_range, MINUTES_PER_DAY};

use super::layout::{Bounds, ChartLayout, Point};

/// Fixed chart palette
pub mod palette {
    use crate::category::Rgb;

    pub const NIGHT_BACKDROP: Rgb = Rgb::new(0xe4, 0xe6, 0xf2);
    pub const DAY_BACKDROP: Rgb = Rgb::new(0xfd, 0xf6, 0xe3);
    pub const TICK: Rgb = Rgb::new(0x99, 0x99, 0x99);
    pub const HALF_HOUR_TICK: Rgb = Rgb::new(0xc4, 0xc4, 0xc4);
    pub const HOUR_LABEL: Rgb = Rgb::new(0x66, 0x66, 0x66);
    /// 00:00 and 12:00
    pub const MIDNIGHT_NOON: Rgb = Rgb::new(0x33, 0x33, 0x33);
    pub const SUNRISE: Rgb = Rgb::new(0xfc, 0x89, 0x16);
    pub const SUNSET: Rgb = Rgb::new(0x00, 0x19, 0x89);
    pub const INDICATOR: Rgb = Rgb::new(0xff, 0x6b, 0x6b);
    pub const EMPTY_STROKE: Rgb = Rgb::new(0xd0, 0xd0, 0xd0);
    pub const ARC_LABEL: Rgb = Rgb::new(0x2d, 0x2d, 0x2d);
    pub const DRAG_SECTOR: Rgb = Rgb::new(0x54, 0xa0, 0xff);
}

/// Tick length as a fraction of the ring width
pub const MAIN_HOUR_TICK_RATIO: f32 = 0.15;
pub const HOUR_TICK_RATIO: f32 = 0.08;
pub const HALF_HOUR_TICK_RATIO: f32 = 0.05;

/// Shortest event, in minutes, that gets a title drawn on its arc
pub const ARC_LABEL_MIN_MINUTES: u32 = 45;

/// Half-annulus behind the arcs
#[derive(Debug, Clone, PartialEq)]
pub struct Backdrop {
    /// Chart angle where the half starts, degrees
    pub start_angle: f64,
    /// Chart angle where it ends; may exceed 360 to pass through midnight
    pub end_angle: f64,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickMark {
    pub from: Point,
    pub to: Point,
    pub color: Rgb,
    pub weight: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub position: Point,
    pub color: Rgb,
    pub bold: bool,
}

/// What clicking an arc refers to
#[derive(Debug, Clone, PartialEq)]
pub enum ArcTarget {
    Schedule(Schedule),
    Empty(EmptyInterval),
}

/// A ring segment between two minutes of the day
#[derive(Debug, Clone, PartialEq)]
pub struct ArcShape {
    pub start_time: u32,
    pub end_time: u32,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub fill: Option<Rgb>,
    pub stroke: Option<Rgb>,
    pub target: ArcTarget,
}

/// Current-time indicator
#[derive(Debug, Clone, PartialEq)]
pub struct Ray {
    pub from: Point,
    pub to: Point,
    pub color: Rgb,
    pub minutes: u32,
}

/// Floating tooltip content
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub title: Option<String>,
    pub time_range: String,
    /// Category name and swatch color
    pub category: Option<(String, Rgb)>,
    pub anchor: Point,
}

/// Feedback shown while a drag is in progress
#[derive(Debug, Clone, PartialEq)]
pub struct DragPreview {
    /// The whole surface is dimmed while dragging
    pub overlay: Bounds,
    pub start_time: u32,
    pub end_time: u32,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub tooltip: Tooltip,
}

impl DragPreview {
    /// Sector spans within the day; a preview crossing midnight splits in two
    pub fn spans(&self) -> Vec<(u32, u32)> {
        let spans = if self.end_time > self.start_time {
            vec![(self.start_time, self.end_time)]
        } else {
            vec![(self.start_time, MINUTES_PER_DAY), (0, self.end_time)]
        };
        spans.into_iter().filter(|(start, end)| end > start).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticLayer {
    pub backdrops: Vec<Backdrop>,
    pub ticks: Vec<TickMark>,
    pub hour_labels: Vec<Label>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DynamicLayer {
    pub event_arcs: Vec<ArcShape>,
    pub empty_arcs: Vec<ArcShape>,
    pub arc_labels: Vec<Label>,
}

impl DynamicLayer {
    pub fn is_empty(&self) -> bool {
        self.event_arcs.is_empty() && self.empty_arcs.is_empty() && self.arc_labels.is_empty()
    }
}

/// Everything a host needs to paint one chart
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartScene {
    pub static_layer: StaticLayer,
    pub dynamic_layer: DynamicLayer,
    pub indicator: Option<Ray>,
    pub drag: Option<DragPreview>,
    pub tooltip: Option<Tooltip>,
}

fn main_hour_color(hour: u32) -> Rgb {
    match hour {
        6 => palette::SUNRISE,
        18 => palette::SUNSET,
        _ => palette::MIDNIGHT_NOON,
    }
}

/// Backdrops, ticks and hour labels for a layout
pub fn build_static_layer(layout: &ChartLayout) -> StaticLayer {
    let backdrops = vec![
        // 18:00 through midnight to 06:00
        Backdrop {
            start_angle: 270.0,
            end_angle: 450.0,
            inner_radius: layout.inner_radius,
            outer_radius: layout.radius,
            color: palette::NIGHT_BACKDROP,
        },
        Backdrop {
            start_angle: 90.0,
            end_angle: 270.0,
            inner_radius: layout.inner_radius,
            outer_radius: layout.radius,
            color: palette::DAY_BACKDROP,
        },
    ];

    let ring = layout.ring_width();
    let mut ticks = Vec::with_capacity(48);
    let mut hour_labels = Vec::with_capacity(24);

    for hour in 0..24u32 {
        let angle = day_minutes_to_angle(hour * 60);
        let is_main = hour % 6 == 0;
        let ratio = if is_main { MAIN_HOUR_TICK_RATIO } else { HOUR_TICK_RATIO };

        ticks.push(TickMark {
            from: layout.point_at(angle, layout.radius - ring * ratio),
            to: layout.point_at(angle, layout.radius),
            color: if is_main { main_hour_color(hour) } else { palette::TICK },
            weight: if is_main { 2.0 } else { 1.0 },
        });

        hour_labels.push(Label {
            text: hour.to_string(),
            position: layout.point_at(angle, layout.label_radius),
            color: if is_main { main_hour_color(hour) } else { palette::HOUR_LABEL },
            bold: is_main,
        });
    }

    for hour in 0..24u32 {
        let angle = day_minutes_to_angle(hour * 60 + 30);
        ticks.push(TickMark {
            from: layout.point_at(angle, layout.radius - ring * HALF_HOUR_TICK_RATIO),
            to: layout.point_at(angle, layout.radius),
            color: palette::HALF_HOUR_TICK,
            weight: 0.5,
        });
    }

    StaticLayer {
        backdrops,
        ticks,
        hour_labels,
    }
}

/// Event arcs, their labels and (optionally) empty arcs
pub fn build_dynamic_layer(
    layout: &ChartLayout,
    schedules: &[Schedule],
    empty: Option<&[EmptyInterval]>,
    categories: &dyn CategoryResolver,
) -> DynamicLayer {
    let mut layer = DynamicLayer::default();

    for schedule in schedules {
        let start = schedule.start_time.min(MINUTES_PER_DAY);
        let end = schedule.end_within_day().min(MINUTES_PER_DAY);
        if end <= start {
            log::debug!("Skipping zero-length schedule {}", schedule.id);
            continue;
        }

        layer.event_arcs.push(ArcShape {
            start_time: start,
            end_time: end,
            inner_radius: layout.inner_radius,
            outer_radius: layout.radius,
            fill: Some(categories.color_of(&schedule.category)),
            stroke: None,
            target: ArcTarget::Schedule(schedule.clone()),
        });

        if end - start >= ARC_LABEL_MIN_MINUTES {
            let mid = day_minutes_to_angle(start) / 2.0 + day_minutes_to_angle(end) / 2.0;
            layer.arc_labels.push(Label {
                text: schedule.title.clone(),
                position: layout.point_at(mid, (layout.inner_radius + layout.radius) / 2.0),
                color: palette::ARC_LABEL,
                bold: false,
            });
        }
    }

    for interval in empty.unwrap_or_default() {
        if interval.end_time <= interval.start_time {
            continue;
        }
        layer.empty_arcs.push(ArcShape {
            start_time: interval.start_time,
            end_time: interval.end_time,
            inner_radius: layout.inner_radius,
            outer_radius: layout.radius,
            fill: None,
            stroke: Some(palette::EMPTY_STROKE),
            target: ArcTarget::Empty(*interval),
        });
    }

    layer
}

/// Tooltip for hovering a schedule
pub fn schedule_tooltip(schedule: &Schedule, anchor: Point, categories: &dyn CategoryResolver) -> Tooltip {
    Tooltip {
        title: Some(schedule.title.clone()),
        time_range: format_time_range(schedule.start_time, schedule.end_time),
        category: Some((
            categories.name_of(&schedule.category),
            categories.color_of(&schedule.category),
        )),
        anchor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::CategoryTable;
    use chrono::NaiveDate;

    fn layout() -> ChartLayout {
        ChartLayout::calculate(Bounds::new(0.0, 0.0, 480.0, 480.0), 1.0)
    }

    fn schedule(title: &str, start: u32, end: u32) -> Schedule {
        Schedule {
            id: title.to_lowercase(),
            title: title.to_string(),
            start_time: start,
            end_time: end,
            category: "meal".to_string(),
            memo: None,
            date: NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
        }
    }

    #[test]
    fn test_static_layer_counts() {
        let layer = build_static_layer(&layout());
        assert_eq!(layer.backdrops.len(), 2);
        assert_eq!(layer.ticks.len(), 48);
        assert_eq!(layer.hour_labels.len(), 24);
        assert_eq!(layer.hour_labels.iter().filter(|l| l.bold).count(), 4);
    }

    #[test]
    fn test_main_hour_ticks_are_longer_and_colored() {
        let layout = layout();
        let layer = build_static_layer(&layout);
        let length = |t: &TickMark| t.from.distance_to(t.to);

        assert!((length(&layer.ticks[0]) - layout.ring_width() * 0.15).abs() < 1e-3);
        assert!((length(&layer.ticks[1]) - layout.ring_width() * 0.08).abs() < 1e-3);
        assert!((length(&layer.ticks[24]) - layout.ring_width() * 0.05).abs() < 1e-3);
        assert_eq!(layer.ticks[6].color, palette::SUNRISE);
        assert_eq!(layer.ticks[18].color, palette::SUNSET);
        assert_eq!(layer.ticks[12].color, palette::MIDNIGHT_NOON);
    }

    #[test]
    fn test_dynamic_layer_skips_zero_length() {
        let categories = CategoryTable::default();
        let schedules = vec![schedule("Lunch", 720, 780), schedule("Broken", 600, 600)];
        let layer = build_dynamic_layer(&layout(), &schedules, None, &categories);

        assert_eq!(layer.event_arcs.len(), 1);
        assert_eq!(layer.event_arcs[0].fill, Some(categories.color_of("meal")));
        assert_eq!(layer.arc_labels.len(), 1);
        assert!(layer.empty_arcs.is_empty());
    }

    #[test]
    fn test_short_events_have_no_label() {
        let categories = CategoryTable::default();
        let layer = build_dynamic_layer(&layout(), &[schedule("Coffee", 600, 615)], None, &categories);
        assert_eq!(layer.event_arcs.len(), 1);
        assert!(layer.arc_labels.is_empty());
    }

    #[test]
    fn test_drag_preview_spans() {
        let preview = |start_time, end_time| DragPreview {
            overlay: Bounds::default(),
            start_time,
            end_time,
            inner_radius: 60.0,
            outer_radius: 200.0,
            tooltip: Tooltip {
                title: None,
                time_range: String::new(),
                category: None,
                anchor: Point::default(),
            },
        };
        assert_eq!(preview(540, 600).spans(), vec![(540, 600)]);
        assert_eq!(preview(1380, 60).spans(), vec![(1380, 1440), (0, 60)]);
        assert_eq!(preview(1425, 0).spans(), vec![(1425, 1440)]);
    }

    #[test]
    fn test_schedule_tooltip() {
        let categories = CategoryTable::default();
        let tooltip = schedule_tooltip(&schedule("Lunch", 720, 780), Point::default(), &categories);
        assert_eq!(tooltip.title.as_deref(), Some("Lunch"));
        assert_eq!(tooltip.time_range, "12:00 - 13:00 (1h)");
        assert_eq!(tooltip.category, Some(("Meal".to_string(), categories.color_of("meal"))));
    }
}
