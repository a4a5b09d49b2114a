//! Chart surface layout for the dashboard
//!
//! The area left of the side panel holds two chart surfaces, plan and
//! record, side by side on wide windows and stacked on tall ones.

use nannou::prelude::*;
use shared::{Bounds, Point as ChartPoint, RadialChart, SurfaceHost};

/// Width reserved for the egui side panel
pub const SIDE_PANEL_WIDTH: f32 = 340.0;
/// Height reserved for the date header above the charts
pub const HEADER_HEIGHT: f32 = 60.0;

pub const PLAN_SURFACE: &str = "plan-circle";
pub const RECORD_SURFACE: &str = "record-circle";

/// Bounds of both chart surfaces for one window size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartSurfaces {
    pub plan: Bounds,
    pub record: Bounds,
}

impl ChartSurfaces {
    pub fn calculate(window_rect: Rect) -> Self {
        let area_w = (window_rect.w() - SIDE_PANEL_WIDTH).max(0.0);
        let area_h = (window_rect.h() - HEADER_HEIGHT).max(0.0);
        let left = window_rect.left();
        let cy = window_rect.y() - HEADER_HEIGHT / 2.0;

        if area_w >= area_h {
            let cell_w = area_w / 2.0;
            Self {
                plan: Bounds::new(left + cell_w / 2.0, cy, cell_w, area_h),
                record: Bounds::new(left + cell_w * 1.5, cy, cell_w, area_h),
            }
        } else {
            let cell_h = area_h / 2.0;
            let cx = left + area_w / 2.0;
            Self {
                plan: Bounds::new(cx, cy + cell_h / 2.0, area_w, cell_h),
                record: Bounds::new(cx, cy - cell_h / 2.0, area_w, cell_h),
            }
        }
    }
}

impl SurfaceHost for ChartSurfaces {
    fn surface_bounds(&self, container_id: &str) -> Option<Bounds> {
        match container_id {
            PLAN_SURFACE => Some(self.plan),
            RECORD_SURFACE => Some(self.record),
            _ => None,
        }
    }
}

/// Start a drag on the first chart under `point`
///
/// Only one drag runs at a time across all charts, so a press while any
/// chart is dragging is ignored.
pub fn begin_drag(charts: &mut [&mut RadialChart], point: ChartPoint) -> bool {
    if charts.iter().any(|chart| chart.is_dragging()) {
        return false;
    }
    charts.iter_mut().any(|chart| chart.pointer_down(point))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::{ChartEvent, ChartSettings, ListType};

    fn mounted_charts(surfaces: &ChartSurfaces) -> (RadialChart, RadialChart) {
        let day = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let mut plan = RadialChart::new("plan", day, ListType::Plan);
        let mut record = RadialChart::new("record", day, ListType::Record);
        assert!(plan.mount(surfaces, PLAN_SURFACE, Vec::new(), ChartSettings::default()));
        assert!(record.mount(surfaces, RECORD_SURFACE, Vec::new(), ChartSettings::default()));
        (plan, record)
    }

    #[test]
    fn test_wide_window_is_side_by_side() {
        let surfaces = ChartSurfaces::calculate(Rect::from_w_h(1340.0, 860.0));

        assert_eq!(surfaces.plan, Bounds::new(-420.0, -30.0, 500.0, 800.0));
        assert_eq!(surfaces.record, Bounds::new(80.0, -30.0, 500.0, 800.0));
    }

    #[test]
    fn test_tall_window_is_stacked() {
        let surfaces = ChartSurfaces::calculate(Rect::from_w_h(740.0, 1060.0));

        assert_eq!(surfaces.plan, Bounds::new(-170.0, 220.0, 400.0, 500.0));
        assert_eq!(surfaces.record, Bounds::new(-170.0, -280.0, 400.0, 500.0));
    }

    #[test]
    fn test_unknown_surface() {
        let surfaces = ChartSurfaces::calculate(Rect::from_w_h(1340.0, 860.0));
        assert!(surfaces.surface_bounds(PLAN_SURFACE).is_some());
        assert!(surfaces.surface_bounds("home-plan-circle").is_none());
    }

    #[test]
    fn test_one_drag_across_charts() {
        let surfaces = ChartSurfaces::calculate(Rect::from_w_h(1340.0, 860.0));
        let (mut plan, mut record) = mounted_charts(&surfaces);
        let on_plan = ChartPoint::new(-420.0, 120.0);
        let on_record = ChartPoint::new(80.0, 120.0);

        assert!(begin_drag(&mut [&mut plan, &mut record], on_plan));
        assert!(!begin_drag(&mut [&mut plan, &mut record], on_record));
        assert!(plan.is_dragging());
        assert!(!record.is_dragging());

        let events: Vec<ChartEvent> = [&mut plan, &mut record]
            .into_iter()
            .filter_map(|chart| chart.pointer_up(on_record))
            .collect();
        assert_eq!(events.len(), 1);

        assert!(begin_drag(&mut [&mut plan, &mut record], on_record));
        assert!(record.is_dragging());
        assert!(!plan.is_dragging());
    }

    #[test]
    fn test_press_outside_charts_starts_nothing() {
        let surfaces = ChartSurfaces::calculate(Rect::from_w_h(1340.0, 860.0));
        let (mut plan, mut record) = mounted_charts(&surfaces);

        assert!(!begin_drag(&mut [&mut plan, &mut record], ChartPoint::new(500.0, 0.0)));
        assert!(!plan.is_dragging() && !record.is_dragging());
    }
}
