//! Drawing module for the Time Circle
//!
//! Paints chart scenes with nannou's 2D API, plus the date header and
//! toasts.

use nannou::prelude::*;
use shared::chart::{minutes_segment, ring_segment, ArcShape, ChartLayout, DragPreview, Point as ChartPoint, Tooltip};
use shared::{RadialChart, Rgb};

use crate::surfaces::HEADER_HEIGHT;
use crate::Toast;

/// Color palette for the planner
#[allow(dead_code)]
pub mod colors {
    use nannou::prelude::*;

    /// Page background
    pub const BACKGROUND: Srgb<u8> = Srgb {
        red: 248,
        green: 249,
        blue: 251,
        standard: std::marker::PhantomData,
    };

    /// Primary text
    pub const TEXT_PRIMARY: Srgb<u8> = Srgb {
        red: 45,
        green: 52,
        blue: 64,
        standard: std::marker::PhantomData,
    };

    /// Secondary text
    pub const TEXT_SECONDARY: Srgb<u8> = Srgb {
        red: 120,
        green: 128,
        blue: 140,
        standard: std::marker::PhantomData,
    };

    /// Tooltip background (use tooltip_bg() function)
    pub fn tooltip_bg() -> Srgba<u8> {
        srgba(40, 44, 52, 235)
    }

    /// Drag overlay tint (use drag_overlay() function)
    pub fn drag_overlay() -> Srgba<u8> {
        srgba(30, 40, 60, 30)
    }

    /// Tooltip text
    pub const TOOLTIP_TEXT: Srgb<u8> = Srgb {
        red: 240,
        green: 242,
        blue: 245,
        standard: std::marker::PhantomData,
    };
}

fn to_pt2(p: ChartPoint) -> Point2 {
    pt2(p.x, p.y)
}

fn to_srgb(c: Rgb) -> Srgb<u8> {
    srgb(c.r, c.g, c.b)
}

/// Draw one chart with its title above the ring
pub fn draw_chart(draw: &Draw, chart: &RadialChart, title: &str) {
    let Some(layout) = chart.layout() else {
        return;
    };
    let scene = chart.scene();
    let bounds = layout.bounds;

    draw.text(title)
        .x_y(bounds.x, bounds.y + bounds.h / 2.0 - 16.0)
        .color(colors::TEXT_PRIMARY)
        .font_size(16)
        .w(bounds.w);

    for backdrop in &scene.static_layer.backdrops {
        let points = ring_segment(
            layout,
            backdrop.start_angle,
            backdrop.end_angle,
            backdrop.inner_radius,
            backdrop.outer_radius,
        );
        draw.polygon()
            .points(points.into_iter().map(to_pt2))
            .color(to_srgb(backdrop.color));
    }

    for arc in &scene.dynamic_layer.event_arcs {
        draw_arc(draw, layout, arc);
    }
    for arc in &scene.dynamic_layer.empty_arcs {
        draw_arc(draw, layout, arc);
    }

    for tick in &scene.static_layer.ticks {
        draw.line()
            .start(to_pt2(tick.from))
            .end(to_pt2(tick.to))
            .weight(tick.weight)
            .color(to_srgb(tick.color));
    }

    for label in &scene.static_layer.hour_labels {
        draw.text(&label.text)
            .xy(to_pt2(label.position))
            .color(to_srgb(label.color))
            .font_size(if label.bold { 14 } else { 11 })
            .w(30.0);
    }

    for label in &scene.dynamic_layer.arc_labels {
        draw.text(&label.text)
            .xy(to_pt2(label.position))
            .color(to_srgb(label.color))
            .font_size(10)
            .w(layout.ring_width() * 0.9);
    }

    if let Some(ray) = &scene.indicator {
        draw.line()
            .start(to_pt2(ray.from))
            .end(to_pt2(ray.to))
            .weight(2.0)
            .color(to_srgb(ray.color));
        draw.ellipse()
            .xy(to_pt2(ray.from))
            .radius(3.0)
            .color(to_srgb(ray.color));
    }

    if let Some(drag) = &scene.drag {
        draw_drag_preview(draw, layout, drag);
    }

    if let Some(tooltip) = &scene.tooltip {
        draw_tooltip(draw, tooltip);
    }
}

fn draw_arc(draw: &Draw, layout: &ChartLayout, arc: &ArcShape) {
    let points = minutes_segment(layout, arc.start_time, arc.end_time, arc.inner_radius, arc.outer_radius);
    if points.is_empty() {
        return;
    }

    if let Some(fill) = arc.fill {
        draw.polygon()
            .points(points.iter().copied().map(to_pt2))
            .color(to_srgb(fill));
    }
    if let Some(stroke) = arc.stroke {
        let mut outline: Vec<Point2> = points.iter().copied().map(to_pt2).collect();
        outline.push(outline[0]);
        draw.polyline()
            .weight(0.5)
            .points(outline)
            .color(to_srgb(stroke));
    }
}

fn draw_drag_preview(draw: &Draw, layout: &ChartLayout, drag: &DragPreview) {
    draw.rect()
        .x_y(drag.overlay.x, drag.overlay.y)
        .w_h(drag.overlay.w, drag.overlay.h)
        .color(colors::drag_overlay());

    let sector = shared::chart::palette::DRAG_SECTOR;
    for (start, end) in drag.spans() {
        let points = minutes_segment(layout, start, end, drag.inner_radius, drag.outer_radius);
        draw.polygon()
            .points(points.into_iter().map(to_pt2))
            .color(srgba(sector.r, sector.g, sector.b, 140));
    }

    draw_tooltip(draw, &drag.tooltip);
}

/// Draw a floating tooltip with its top-left corner at the anchor
fn draw_tooltip(draw: &Draw, tooltip: &Tooltip) {
    let width = 190.0;
    let line_height = 18.0;
    let lines = 1 + tooltip.title.is_some() as usize + tooltip.category.is_some() as usize;
    let height = lines as f32 * line_height + 12.0;

    let left = tooltip.anchor.x;
    let top = tooltip.anchor.y;
    draw.rect()
        .x_y(left + width / 2.0, top - height / 2.0)
        .w_h(width, height)
        .color(colors::tooltip_bg());

    let mut y = top - 6.0 - line_height / 2.0;
    if let Some(title) = &tooltip.title {
        draw.text(title)
            .x_y(left + width / 2.0, y)
            .color(colors::TOOLTIP_TEXT)
            .font_size(13)
            .w(width - 16.0)
            .left_justify();
        y -= line_height;
    }

    draw.text(&tooltip.time_range)
        .x_y(left + width / 2.0, y)
        .color(colors::TOOLTIP_TEXT)
        .font_size(11)
        .w(width - 16.0)
        .left_justify();
    y -= line_height;

    if let Some((name, color)) = &tooltip.category {
        draw.rect()
            .x_y(left + 14.0, y)
            .w_h(10.0, 10.0)
            .color(to_srgb(*color));
        draw.text(name)
            .x_y(left + width / 2.0 + 12.0, y)
            .color(colors::TOOLTIP_TEXT)
            .font_size(11)
            .w(width - 40.0)
            .left_justify();
    }
}

/// Draw the date header above the charts
pub fn draw_header(draw: &Draw, window_rect: Rect, chart_area_w: f32, date_text: &str, clock_text: &str) {
    let x = window_rect.left() + chart_area_w / 2.0;
    let y = window_rect.top() - HEADER_HEIGHT / 2.0;

    draw.text(date_text)
        .x_y(x, y + 8.0)
        .color(colors::TEXT_PRIMARY)
        .font_size(20)
        .w(chart_area_w);
    draw.text(clock_text)
        .x_y(x, y - 16.0)
        .color(colors::TEXT_SECONDARY)
        .font_size(12)
        .w(chart_area_w);
}

/// Draw toast notifications
pub fn draw_toasts(draw: &Draw, window_rect: Rect, chart_area_w: f32, toasts: &[Toast]) {
    let toast_width = 300.0;
    let toast_height = 40.0;
    let padding = 10.0;
    let x = window_rect.left() + chart_area_w / 2.0;
    let start_y = window_rect.bottom() + 40.0;

    for (i, toast) in toasts.iter().enumerate() {
        let y = start_y + (i as f32) * (toast_height + padding);
        let alpha = (toast.alpha() * 220.0) as u8;

        draw.rect()
            .x_y(x, y)
            .w_h(toast_width, toast_height)
            .color(srgba(40u8, 45u8, 55u8, alpha));

        let text_alpha = (toast.alpha() * 255.0) as u8;
        draw.text(&toast.message)
            .x_y(x, y)
            .color(srgba(240u8, 242u8, 245u8, text_alpha))
            .font_size(12)
            .w(toast_width - 20.0);
    }
}
