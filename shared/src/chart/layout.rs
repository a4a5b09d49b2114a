//! Chart layout - radii, angle/point conversion and hit geometry
//!
//! Coordinates are y-up with the origin wherever the host puts it. Chart
//! angles are degrees from 12 o'clock, clockwise.

use crate::time_math::{day_minutes_to_angle, pointer_angle, MINUTES_PER_DAY, POINTER_ANGLE_OFFSET_DEG};

/// Room left around the ring for hour labels
pub const LABEL_PADDING: f32 = 40.0;
/// Inner radius as a fraction of the outer radius
pub const INNER_RADIUS_RATIO: f32 = 0.3;
/// Hour label radius as a fraction of the outer radius
pub const LABEL_RADIUS_RATIO: f32 = 1.08;

/// A point in surface coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Axis-aligned surface rectangle given by its center and size
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Bounds {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn contains(&self, p: Point) -> bool {
        (p.x - self.x).abs() <= self.w / 2.0 && (p.y - self.y).abs() <= self.h / 2.0
    }
}

/// Computed geometry of one mounted chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLayout {
    pub bounds: Bounds,
    pub center: Point,
    pub radius: f32,
    pub inner_radius: f32,
    pub label_radius: f32,
}

impl ChartLayout {
    /// Lay out a chart inside `bounds`, scaled about its center by `zoom`
    pub fn calculate(bounds: Bounds, zoom: f32) -> Self {
        let chart_w = bounds.w - LABEL_PADDING * 2.0;
        let chart_h = bounds.h - LABEL_PADDING * 2.0;
        let radius = (chart_w.min(chart_h) / 2.0).max(0.0) * zoom;

        Self {
            bounds,
            center: bounds.center(),
            radius,
            inner_radius: radius * INNER_RADIUS_RATIO,
            label_radius: radius * LABEL_RADIUS_RATIO,
        }
    }

    pub fn ring_width(&self) -> f32 {
        self.radius - self.inner_radius
    }

    /// Point at `chart_angle_deg` and distance `r` from the center
    pub fn point_at(&self, chart_angle_deg: f64, r: f32) -> Point {
        let theta = chart_angle_deg.to_radians() as f32;
        Point::new(self.center.x + theta.sin() * r, self.center.y + theta.cos() * r)
    }

    /// Point at a minute of the day and distance `r`
    pub fn point_at_minutes(&self, minutes: u32, r: f32) -> Point {
        self.point_at(day_minutes_to_angle(minutes), r)
    }

    /// Raw pointer angle of `p` relative to the center
    pub fn pointer_angle_of(&self, p: Point) -> f64 {
        pointer_angle(p.x - self.center.x, p.y - self.center.y)
    }

    /// Unrounded minute position of `p`, in `[0, 1440)`
    pub fn exact_minutes_at(&self, p: Point) -> f64 {
        let chart_angle = (self.pointer_angle_of(p) + POINTER_ANGLE_OFFSET_DEG).rem_euclid(360.0);
        chart_angle / 360.0 * MINUTES_PER_DAY as f64
    }

    /// Whether `p` lies on the ring between the inner and outer radius
    pub fn in_ring(&self, p: Point) -> bool {
        let d = p.distance_to(self.center);
        d >= self.inner_radius && d <= self.radius
    }

    /// Whether `p` lies on the ring within `[start, end)` minutes
    pub fn hits_segment(&self, p: Point, start: u32, end: u32) -> bool {
        if !self.in_ring(p) || end <= start {
            return false;
        }
        let m = self.exact_minutes_at(p);
        m >= start as f64 && m < end as f64
    }
}

/// Outline of a ring segment between two chart angles (degrees)
///
/// Walks the outer edge clockwise then the inner edge back. Returns an
/// empty list when `end_angle <= start_angle`.
pub fn ring_segment(layout: &ChartLayout, start_angle: f64, end_angle: f64, inner: f32, outer: f32) -> Vec<Point> {
    if end_angle <= start_angle {
        return Vec::new();
    }
    let sweep = end_angle - start_angle;
    // Roughly one vertex per two degrees
    let steps = ((sweep / 2.0).ceil() as usize).max(1);

    let mut points = Vec::with_capacity((steps + 1) * 2);
    for i in 0..=steps {
        let angle = start_angle + sweep * i as f64 / steps as f64;
        points.push(layout.point_at(angle, outer));
    }
    for i in (0..=steps).rev() {
        let angle = start_angle + sweep * i as f64 / steps as f64;
        points.push(layout.point_at(angle, inner));
    }
    points
}

/// Outline of the ring segment covering `[start, end)` minutes
pub fn minutes_segment(layout: &ChartLayout, start: u32, end: u32, inner: f32, outer: f32) -> Vec<Point> {
    ring_segment(layout, day_minutes_to_angle(start), day_minutes_to_angle(end), inner, outer)
}
