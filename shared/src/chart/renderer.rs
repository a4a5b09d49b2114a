//! The chart instance: mount, render, tick, pointer input and teardown

use std::time::Duration;

use chrono::NaiveDate;

use crate::category::{CategoryResolver, CategoryTable};
use crate::events::{ChartEvent, EventBus, ListenerId, SettingsEvent, StoreEvent};
use crate::gesture::{GestureController, ProposedInterval};
use crate::interval_set::build_empty_intervals;
use crate::schedule::{ListType, Schedule};
use crate::settings::ChartSettings;
use crate::time_engine::local_minutes_now;
use crate::time_math::{format_time_range, MINUTES_PER_DAY};

use super::layout::{Bounds, ChartLayout, Point};
use super::scene::{
    build_dynamic_layer, build_static_layer, palette, schedule_tooltip, ArcShape, ArcTarget, ChartScene,
    DragPreview, Ray, Tooltip,
};

/// Quiet period after the last resize before the chart re-mounts
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(250);
/// Period of the current-time indicator refresh
pub const TICK_PERIOD: Duration = Duration::from_secs(60);

pub const ZOOM_STEP: f32 = 0.1;
pub const MIN_ZOOM: f32 = 0.5;
pub const MAX_ZOOM: f32 = 1.5;

/// Pointer travel below which a press and release count as a click
pub const CLICK_SLOP: f32 = 4.0;

const TOOLTIP_OFFSET: Point = Point::new(10.0, -10.0);
const DRAG_TOOLTIP_OFFSET: Point = Point::new(15.0, -15.0);

/// Looks up the surface a chart is mounted into
pub trait SurfaceHost {
    /// Current bounds of `container_id`, or `None` if it is not available
    fn surface_bounds(&self, container_id: &str) -> Option<Bounds>;
}

/// Work done by one [`RadialChart::poll`], in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    Remount,
    Tick,
}

/// One radial chart bound to a date and a list
pub struct RadialChart {
    id: String,
    date: NaiveDate,
    list: ListType,
    categories: Box<dyn CategoryResolver>,

    container_id: Option<String>,
    layout: Option<ChartLayout>,
    schedules: Vec<Schedule>,
    settings: ChartSettings,
    scene: ChartScene,

    gesture: GestureController,
    drag_origin: Option<Point>,
    drag_moved: bool,

    zoom: f32,
    clock_minutes: u32,
    pending_resize: Option<(Bounds, Duration)>,
    last_tick: Option<Duration>,

    bus: EventBus<ChartEvent>,
    disposed: bool,
}

impl std::fmt::Debug for RadialChart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RadialChart")
            .field("id", &self.id)
            .field("date", &self.date)
            .field("list", &self.list)
            .field("container_id", &self.container_id)
            .field("schedules", &self.schedules.len())
            .field("zoom", &self.zoom)
            .field("disposed", &self.disposed)
            .finish()
    }
}

fn offset(p: Point, by: Point) -> Point {
    Point::new(p.x + by.x, p.y + by.y)
}

impl RadialChart {
    pub fn new(id: impl Into<String>, date: NaiveDate, list: ListType) -> Self {
        Self {
            id: id.into(),
            date,
            list,
            categories: Box::new(CategoryTable::default()),
            container_id: None,
            layout: None,
            schedules: Vec::new(),
            settings: ChartSettings::default(),
            scene: ChartScene::default(),
            gesture: GestureController::new(),
            drag_origin: None,
            drag_moved: false,
            zoom: 1.0,
            clock_minutes: local_minutes_now(),
            pending_resize: None,
            last_tick: None,
            bus: EventBus::new(),
            disposed: false,
        }
    }

    /// Use a different category lookup for fills and tooltips
    pub fn with_categories(mut self, categories: Box<dyn CategoryResolver>) -> Self {
        self.categories = categories;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn list(&self) -> ListType {
        self.list
    }

    pub fn schedules(&self) -> &[Schedule] {
        &self.schedules
    }

    pub fn settings(&self) -> ChartSettings {
        self.settings
    }

    pub fn layout(&self) -> Option<&ChartLayout> {
        self.layout.as_ref()
    }

    pub fn scene(&self) -> &ChartScene {
        &self.scene
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn is_mounted(&self) -> bool {
        self.layout.is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_dragging()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Listen for chart events
    pub fn subscribe(&mut self, listener: impl FnMut(&ChartEvent) + 'static) -> ListenerId {
        self.bus.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Bind to a host surface, build the static layer and render
    ///
    /// A missing surface is logged and leaves the chart untouched.
    pub fn mount(
        &mut self,
        host: &dyn SurfaceHost,
        container_id: &str,
        schedules: Vec<Schedule>,
        settings: ChartSettings,
    ) -> bool {
        if self.disposed {
            return false;
        }
        let Some(bounds) = host.surface_bounds(container_id) else {
            log::warn!("Chart {}: surface {:?} not found, skipping mount", self.id, container_id);
            return false;
        };

        log::debug!(
            "Chart {} mounted on {:?} ({}x{})",
            self.id,
            container_id,
            bounds.w,
            bounds.h
        );
        self.container_id = Some(container_id.to_string());
        self.schedules = schedules;
        self.settings = settings.clamped();
        self.remount(bounds);
        true
    }

    /// Replace the dynamic layer with arcs for `schedules`
    pub fn render(&mut self, schedules: Vec<Schedule>, settings: ChartSettings) {
        if self.disposed {
            return;
        }
        self.schedules = schedules;
        self.settings = settings.clamped();
        self.refresh();
    }

    /// Move the current-time indicator to `now_minutes`
    pub fn tick(&mut self, now_minutes: u32) {
        if self.disposed {
            return;
        }
        self.clock_minutes = now_minutes % MINUTES_PER_DAY;
        self.scene.indicator = self.layout.map(|layout| Ray {
            from: layout.center,
            to: layout.point_at_minutes(self.clock_minutes, layout.radius),
            color: palette::INDICATOR,
            minutes: self.clock_minutes,
        });
    }

    /// Start a drag if `point` is on this chart's surface
    pub fn pointer_down(&mut self, point: Point) -> bool {
        if self.disposed {
            return false;
        }
        let Some(layout) = self.layout else {
            return false;
        };
        if !layout.bounds.contains(point) {
            return false;
        }
        if !self.gesture.pointer_down(layout.pointer_angle_of(point)) {
            return false;
        }

        self.drag_origin = Some(point);
        self.drag_moved = false;
        self.scene.tooltip = None;
        self.update_drag_preview(point);
        true
    }

    /// Follow the pointer during a drag; returns the live interval
    pub fn pointer_move(&mut self, point: Point) -> Option<ProposedInterval> {
        if self.disposed {
            return None;
        }
        let layout = self.layout?;
        let interval = self
            .gesture
            .pointer_move(layout.pointer_angle_of(point), self.settings.time_interval)?;

        if let Some(origin) = self.drag_origin {
            if origin.distance_to(point) > CLICK_SLOP {
                self.drag_moved = true;
            }
        }
        self.update_drag_preview(point);
        Some(interval)
    }

    /// Finish a drag and emit the resulting request
    ///
    /// A press and release in place on an arc acts as a click on that arc.
    pub fn pointer_up(&mut self, point: Point) -> Option<ChartEvent> {
        if self.disposed {
            return None;
        }
        let layout = self.layout?;
        let interval = self
            .gesture
            .pointer_up(layout.pointer_angle_of(point), self.settings.time_interval)?;

        self.scene.drag = None;
        let origin = self.drag_origin.take();
        let stayed = !self.drag_moved && origin.is_some_and(|o| o.distance_to(point) <= CLICK_SLOP);

        let event = match self.click_event(point).filter(|_| stayed) {
            Some(event) => event,
            None => ChartEvent::CreateScheduleRequested {
                start_time: interval.start_time,
                end_time: interval.end_time,
                date: self.date,
            },
        };
        log::debug!("Chart {}: {:?}", self.id, event);
        self.bus.emit(&event);
        Some(event)
    }

    /// Click on an arc: edit a schedule or create one over an empty interval
    pub fn click(&mut self, point: Point) -> Option<ChartEvent> {
        if self.disposed {
            return None;
        }
        let event = self.click_event(point)?;
        self.bus.emit(&event);
        Some(event)
    }

    /// Update the hover tooltip for `point`
    pub fn hover(&mut self, point: Point) -> Option<&Tooltip> {
        if self.disposed || self.gesture.is_dragging() {
            return None;
        }
        self.scene.tooltip = match self.hit_test(point).map(|arc| &arc.target) {
            Some(ArcTarget::Schedule(schedule)) => Some(schedule_tooltip(
                schedule,
                offset(point, TOOLTIP_OFFSET),
                self.categories.as_ref(),
            )),
            _ => None,
        };
        self.scene.tooltip.as_ref()
    }

    pub fn clear_hover(&mut self) {
        self.scene.tooltip = None;
    }

    /// Topmost arc under `point`
    pub fn hit_test(&self, point: Point) -> Option<&ArcShape> {
        let layout = self.layout.as_ref()?;
        let hits = |arc: &&ArcShape| layout.hits_segment(point, arc.start_time, arc.end_time);

        let layer = &self.scene.dynamic_layer;
        layer
            .event_arcs
            .iter()
            .rev()
            .find(hits)
            .or_else(|| layer.empty_arcs.iter().rev().find(hits))
    }

    /// Note a surface size change; the re-mount runs from [`poll`](Self::poll)
    pub fn notify_resize(&mut self, bounds: Bounds, now: Duration) {
        if self.disposed || !self.is_mounted() {
            return;
        }
        self.pending_resize = Some((bounds, now + RESIZE_DEBOUNCE));
    }

    /// Run due timers: a debounced re-mount first, then the periodic tick
    pub fn poll(&mut self, now: Duration, clock_minutes: u32) -> Vec<TimerAction> {
        let mut actions = Vec::new();
        if self.disposed {
            return actions;
        }

        if let Some((bounds, due)) = self.pending_resize {
            if now >= due {
                self.pending_resize = None;
                self.remount(bounds);
                actions.push(TimerAction::Remount);
            }
        }

        if self.is_mounted() {
            let due = match self.last_tick {
                Some(last) => now.saturating_sub(last) >= TICK_PERIOD,
                None => true,
            };
            if due {
                self.tick(clock_minutes);
                self.last_tick = Some(now);
                actions.push(TimerAction::Tick);
            }
        }

        actions
    }

    /// Drop layers, timers and listeners; the chart ignores all later calls
    pub fn unmount(&mut self) {
        if self.disposed {
            return;
        }
        log::debug!("Chart {} unmounted", self.id);
        self.scene = ChartScene::default();
        self.layout = None;
        self.container_id = None;
        self.schedules.clear();
        self.gesture.reset();
        self.drag_origin = None;
        self.pending_resize = None;
        self.last_tick = None;
        self.bus.clear();
        self.disposed = true;
    }

    /// Accept a store notification for this chart's date and list
    pub fn on_store_event(&mut self, event: &StoreEvent) -> bool {
        if self.disposed {
            return false;
        }
        let StoreEvent::SchedulesChanged { date, list, schedules } = event;
        if *date != self.date || *list != self.list {
            return false;
        }
        self.schedules = schedules.clone();
        self.refresh();
        true
    }

    pub fn on_settings_event(&mut self, event: &SettingsEvent) {
        if self.disposed {
            return;
        }
        let SettingsEvent::Changed { settings } = event;
        self.settings = settings.clamped();
        self.refresh();
    }

    /// Rebind to another day
    pub fn set_date(&mut self, date: NaiveDate, schedules: Vec<Schedule>) {
        if self.disposed {
            return;
        }
        self.date = date;
        self.schedules = schedules;
        self.gesture.reset();
        self.drag_origin = None;
        self.scene.drag = None;
        self.scene.tooltip = None;
        self.refresh();
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - ZOOM_STEP);
    }

    pub fn reset_zoom(&mut self) {
        self.set_zoom(1.0);
    }

    fn set_zoom(&mut self, zoom: f32) {
        if self.disposed {
            return;
        }
        let zoom = ((zoom * 10.0).round() / 10.0).clamp(MIN_ZOOM, MAX_ZOOM);
        if (zoom - self.zoom).abs() < f32::EPSILON {
            return;
        }
        self.zoom = zoom;
        if let Some(layout) = self.layout {
            self.remount(layout.bounds);
        }
    }

    fn remount(&mut self, bounds: Bounds) {
        let layout = ChartLayout::calculate(bounds, self.zoom);
        self.layout = Some(layout);
        self.scene.static_layer = build_static_layer(&layout);
        self.gesture.reset();
        self.drag_origin = None;
        self.scene.drag = None;
        self.scene.tooltip = None;
        self.refresh();
        self.tick(self.clock_minutes);
    }

    fn refresh(&mut self) {
        let Some(layout) = self.layout else {
            return;
        };
        let empty = self
            .settings
            .show_empty_time
            .then(|| build_empty_intervals(&self.schedules, self.settings.time_interval));

        self.scene.dynamic_layer =
            build_dynamic_layer(&layout, &self.schedules, empty.as_deref(), self.categories.as_ref());
        self.scene.tooltip = None;
        log::trace!(
            "Chart {} rendered {} event arcs, {} empty arcs",
            self.id,
            self.scene.dynamic_layer.event_arcs.len(),
            self.scene.dynamic_layer.empty_arcs.len()
        );
    }

    fn click_event(&self, point: Point) -> Option<ChartEvent> {
        match &self.hit_test(point)?.target {
            ArcTarget::Schedule(schedule) => Some(ChartEvent::EditScheduleRequested {
                schedule: schedule.clone(),
                date: self.date,
            }),
            ArcTarget::Empty(interval) => Some(ChartEvent::CreateScheduleRequested {
                start_time: interval.start_time,
                end_time: interval.end_time % MINUTES_PER_DAY,
                date: self.date,
            }),
        }
    }

    fn update_drag_preview(&mut self, point: Point) {
        let (Some(layout), Some(interval)) = (self.layout, self.gesture.preview(self.settings.time_interval)) else {
            self.scene.drag = None;
            return;
        };
        self.scene.drag = Some(DragPreview {
            overlay: layout.bounds,
            start_time: interval.start_time,
            end_time: interval.end_time,
            inner_radius: layout.inner_radius,
            outer_radius: layout.radius,
            tooltip: Tooltip {
                title: None,
                time_range: format_time_range(interval.start_time, interval.end_time),
                category: None,
                anchor: offset(point, DRAG_TOOLTIP_OFFSET),
            },
        });
    }
}
