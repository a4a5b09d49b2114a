//! Time Circle
//!
//! A day planner built around two radial 24-hour charts: what you planned
//! and what you actually did. Drag across a ring to propose a new
//! schedule, click an arc to edit it, and compare both lists in the side
//! panel.

mod drawing;
mod form;
mod surfaces;
mod ui;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use chrono::NaiveDate;
use chrono_tz::Tz;
use nannou::prelude::*;
use nannou_egui::{self, Egui};
use serde::{Deserialize, Serialize};
use shared::day_view::build_week_grid;
use shared::{
    compute_clock_reading, format_date_long, parse_timezone, step_date, system_timezone,
    CategoryTable, ChartEvent, ChartSettings, ClockReading, ListType, MemoryScheduleStore, RadialChart,
    ScheduleBook, ScheduleStore, SettingsEvent, SettingsProvider, SettingsStore, StoreEvent, SurfaceHost,
};

use crate::form::ScheduleForm;
use crate::surfaces::{begin_drag, ChartSurfaces, PLAN_SURFACE, RECORD_SURFACE, SIDE_PANEL_WIDTH};
use crate::ui::{PanelView, PickerState, ZoomAction};

const CONFIG_NAME: &str = "time_circle";
const SCHEDULES_NAME: &str = "schedules";
const DEFAULT_TZ: &str = "UTC";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    nannou::app(model).update(update).exit(exit).run();
}

/// Toast notification for status and error messages
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub created: Instant,
    pub duration_secs: f32,
}

impl Toast {
    pub fn new(message: String, duration_secs: f32) -> Self {
        Self {
            message,
            created: Instant::now(),
            duration_secs,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created.elapsed().as_secs_f32() > self.duration_secs
    }

    pub fn alpha(&self) -> f32 {
        let elapsed = self.created.elapsed().as_secs_f32();
        if elapsed > self.duration_secs - 0.5 {
            ((self.duration_secs - elapsed) / 0.5).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}

/// Persisted configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Config {
    display_zone: String,
    #[serde(default)]
    settings: ChartSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            display_zone: system_timezone()
                .map(|tz| tz.name().to_string())
                .unwrap_or_else(|| DEFAULT_TZ.to_string()),
            settings: ChartSettings::default(),
        }
    }
}

type Queue<E> = Rc<RefCell<Vec<E>>>;

/// Application state
pub struct Model {
    pub date: NaiveDate,
    pub store: MemoryScheduleStore,
    pub settings: SettingsStore,
    pub categories: CategoryTable,

    pub plan_chart: RadialChart,
    pub record_chart: RadialChart,

    /// Notifications collected by listeners, applied after each mutation
    chart_events: Queue<(ListType, ChartEvent)>,
    store_events: Queue<StoreEvent>,
    settings_events: Queue<SettingsEvent>,

    pub form: ScheduleForm,
    pub week_open: bool,
    pub week_list: ListType,

    pub display_zone: Tz,
    pub clock: ClockReading,
    pub picker_state: PickerState,

    pub surfaces: ChartSurfaces,
    pub window_size: Vec2,

    pub toasts: Vec<Toast>,

    /// egui owns the pointer or keyboard this frame
    pub pointer_over_ui: bool,
    pub keyboard_busy: bool,

    egui: Egui,
}

impl Model {
    fn charts_mut(&mut self) -> [&mut RadialChart; 2] {
        [&mut self.plan_chart, &mut self.record_chart]
    }

    /// Apply queued store and settings notifications to the charts
    fn pump_events(&mut self) {
        let store_events: Vec<StoreEvent> = self.store_events.borrow_mut().drain(..).collect();
        let settings_events: Vec<SettingsEvent> = self.settings_events.borrow_mut().drain(..).collect();

        for chart in self.charts_mut() {
            for event in &store_events {
                chart.on_store_event(event);
            }
            for event in &settings_events {
                chart.on_settings_event(event);
            }
        }
    }

    /// Open the form for requests the charts emitted
    fn handle_chart_events(&mut self) {
        let events: Vec<(ListType, ChartEvent)> = self.chart_events.borrow_mut().drain(..).collect();
        for (list, event) in events {
            match event {
                ChartEvent::CreateScheduleRequested {
                    start_time,
                    end_time,
                    date,
                } => self.form.open_create(list, date, start_time, end_time),
                ChartEvent::EditScheduleRequested { schedule, .. } => self.form.open_edit(list, &schedule),
            }
        }
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        if date == self.date {
            return;
        }
        self.date = date;
        let plan = self.store.schedules(date, ListType::Plan);
        let record = self.store.schedules(date, ListType::Record);
        self.plan_chart.set_date(date, plan);
        self.record_chart.set_date(date, record);
        if self.form.is_open {
            self.form.close();
        }
        log::info!("Showing {}", date);
    }

    pub fn set_timezone(&mut self, tz: Tz) {
        self.display_zone = tz;
        self.clock = compute_clock_reading(tz);
        for chart in [&mut self.plan_chart, &mut self.record_chart] {
            chart.tick(self.clock.minute_of_day);
        }
        save_config(self);
    }

    pub fn update_settings(&mut self, settings: ChartSettings) {
        self.settings.update(settings);
        self.pump_events();
        save_config(self);
    }

    pub fn apply_zoom(&mut self, action: ZoomAction) {
        for chart in self.charts_mut() {
            match action {
                ZoomAction::In => chart.zoom_in(),
                ZoomAction::Out => chart.zoom_out(),
                ZoomAction::Reset => chart.reset_zoom(),
            }
        }
    }

    /// Store the form's contents as a new or updated schedule
    pub fn save_form(&mut self) {
        let input = match self.form.input() {
            Ok(input) => input,
            Err(message) => {
                self.form.error = Some(message);
                return;
            }
        };

        let (date, list) = (self.form.date, self.form.list);
        let result = match self.form.editing_id().map(str::to_string) {
            Some(id) => self.store.update(date, list, &id, input).map(|_| "updated"),
            None => self.store.add(date, list, input).map(|_| "added"),
        };

        match result {
            Ok(verb) => {
                self.form.close();
                self.pump_events();
                save_schedules(self);
                self.show_toast(format!("{} {}", list.label(), verb));
            }
            Err(e) => self.form.error = Some(e.to_string()),
        }
    }

    pub fn delete_form_schedule(&mut self) {
        let Some(id) = self.form.editing_id().map(str::to_string) else {
            return;
        };
        let (date, list) = (self.form.date, self.form.list);
        if self.store.delete(date, list, &id) {
            self.pump_events();
            save_schedules(self);
            self.show_toast(format!("{} deleted", list.label()));
        }
        self.form.close();
    }

    pub fn show_toast(&mut self, message: String) {
        self.toasts.push(Toast::new(message, 3.0));
    }

    pub fn prune_toasts(&mut self) {
        self.toasts.retain(|t| !t.is_expired());
    }

    fn pointer_down(&mut self, point: shared::Point) {
        begin_drag(&mut self.charts_mut(), point);
    }

    fn pointer_move(&mut self, point: shared::Point) {
        for chart in self.charts_mut() {
            if chart.is_dragging() {
                chart.pointer_move(point);
            } else {
                chart.hover(point);
            }
        }
    }

    fn pointer_up(&mut self, point: shared::Point) {
        for chart in self.charts_mut() {
            chart.pointer_up(point);
        }
        self.handle_chart_events();
    }
}

fn save_config(model: &Model) {
    let config = Config {
        display_zone: model.display_zone.name().to_string(),
        settings: model.settings.settings(),
    };
    if let Err(e) = shared::save_config(CONFIG_NAME, &config) {
        log::error!("Failed to save config: {}", e);
    }
}

fn save_schedules(model: &Model) {
    if let Err(e) = shared::save_config(SCHEDULES_NAME, model.store.book()) {
        log::error!("Failed to save schedules: {}", e);
    }
}

fn load_or_default<T: Default + serde::de::DeserializeOwned>(name: &str) -> T {
    match shared::load_config(name) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(e) => {
            log::warn!("Could not load {}: {}; using defaults", name, e);
            T::default()
        }
    }
}

fn model(app: &App) -> Model {
    app.set_exit_on_escape(false);

    let window_id = app
        .new_window()
        .title("Time Circle")
        .size(1340, 860)
        .min_size(760, 560)
        .view(view)
        .key_pressed(key_pressed)
        .mouse_pressed(mouse_pressed)
        .mouse_released(mouse_released)
        .mouse_moved(mouse_moved)
        .raw_event(raw_window_event)
        .build()
        .unwrap();

    let window = app.window(window_id).unwrap();
    let egui = Egui::from_window(&window);

    let config: Config = load_or_default(CONFIG_NAME);
    let book: ScheduleBook = load_or_default(SCHEDULES_NAME);

    let display_zone = parse_timezone(&config.display_zone).unwrap_or_else(|e| {
        log::warn!("{}; falling back to {}", e, DEFAULT_TZ);
        chrono_tz::UTC
    });
    let clock = compute_clock_reading(display_zone);
    let date = clock.date;

    let store_events: Queue<StoreEvent> = Rc::default();
    let settings_events: Queue<SettingsEvent> = Rc::default();
    let chart_events: Queue<(ListType, ChartEvent)> = Rc::default();

    let mut store = MemoryScheduleStore::from_book(book);
    let queue = store_events.clone();
    store.subscribe(Box::new(move |event: &StoreEvent| queue.borrow_mut().push(event.clone())));

    let mut settings = SettingsStore::new(config.settings);
    let queue = settings_events.clone();
    settings.subscribe(Box::new(move |event: &SettingsEvent| queue.borrow_mut().push(event.clone())));

    let categories = CategoryTable::default();
    let surfaces = ChartSurfaces::calculate(window.rect());

    let mut plan_chart = RadialChart::new("plan", date, ListType::Plan).with_categories(Box::new(categories.clone()));
    let mut record_chart =
        RadialChart::new("record", date, ListType::Record).with_categories(Box::new(categories.clone()));

    for (chart, surface) in [(&mut plan_chart, PLAN_SURFACE), (&mut record_chart, RECORD_SURFACE)] {
        let list = chart.list();
        let queue = chart_events.clone();
        chart.subscribe(move |event| queue.borrow_mut().push((list, event.clone())));
        chart.mount(&surfaces, surface, store.schedules(date, list), settings.settings());
        chart.tick(clock.minute_of_day);
    }

    log::info!(
        "Time Circle started for {} ({} display zone)",
        date,
        display_zone.name()
    );

    Model {
        date,
        store,
        settings,
        categories,
        plan_chart,
        record_chart,
        chart_events,
        store_events,
        settings_events,
        form: ScheduleForm::new(date),
        week_open: false,
        week_list: ListType::Plan,
        display_zone,
        clock,
        picker_state: PickerState::default(),
        surfaces,
        window_size: window.rect().wh(),
        toasts: Vec::new(),
        pointer_over_ui: false,
        keyboard_busy: false,
        egui,
    }
}

fn update(app: &App, model: &mut Model, update: Update) {
    model.clock = compute_clock_reading(model.display_zone);
    model.prune_toasts();

    // Debounced re-mount on window resize
    let window_rect = app.window_rect();
    if window_rect.wh() != model.window_size {
        model.window_size = window_rect.wh();
        model.surfaces = ChartSurfaces::calculate(window_rect);
        let plan_bounds = model.surfaces.surface_bounds(PLAN_SURFACE);
        let record_bounds = model.surfaces.surface_bounds(RECORD_SURFACE);
        if let Some(bounds) = plan_bounds {
            model.plan_chart.notify_resize(bounds, update.since_start);
        }
        if let Some(bounds) = record_bounds {
            model.record_chart.notify_resize(bounds, update.since_start);
        }
    }

    let clock_minutes = model.clock.minute_of_day;
    for chart in model.charts_mut() {
        chart.poll(update.since_start, clock_minutes);
    }

    let week_grid = model
        .week_open
        .then(|| build_week_grid(model.date, &model.store, model.week_list));

    model.egui.set_elapsed_time(update.since_start);
    let ctx = model.egui.begin_frame();

    let panel_result = ui::draw_side_panel(
        &ctx,
        SIDE_PANEL_WIDTH,
        &mut model.picker_state,
        &PanelView {
            date: model.date,
            clock: &model.clock,
            display_zone: model.display_zone,
            settings: model.settings.settings(),
            zoom: model.plan_chart.zoom(),
            plan: model.plan_chart.schedules(),
            record: model.record_chart.schedules(),
            categories: &model.categories,
            week_open: model.week_open,
        },
    );

    let form_result = if model.form.is_open {
        Some(ui::draw_schedule_form(&ctx, &mut model.form, &model.categories))
    } else {
        None
    };

    let week_result = week_grid
        .as_ref()
        .map(|grid| ui::draw_week_overview(&ctx, grid, model.week_list, &model.categories));

    model.pointer_over_ui = ctx.is_pointer_over_area() || ctx.wants_pointer_input();
    model.keyboard_busy = ctx.wants_keyboard_input();

    drop(ctx);

    // Apply UI results
    if let Some(days) = panel_result.step_days {
        model.set_date(step_date(model.date, days));
    }
    if panel_result.go_today {
        model.set_date(model.clock.date);
    }
    if let Some(tz) = panel_result.set_timezone {
        model.set_timezone(tz);
    }
    if let Some(settings) = panel_result.settings {
        model.update_settings(settings);
    }
    if let Some(action) = panel_result.zoom {
        model.apply_zoom(action);
    }
    if let Some(list) = panel_result.new_schedule {
        let start = model.clock.minute_of_day / 60 * 60;
        model.form.open_create(list, model.date, start, start + 60);
    }
    if let Some((list, schedule)) = panel_result.edit {
        model.form.open_edit(list, &schedule);
    }
    if panel_result.toggle_week {
        model.week_open = !model.week_open;
    }

    if let Some(result) = form_result {
        if result.save {
            model.save_form();
        } else if result.delete {
            model.delete_form_schedule();
        } else if result.cancel {
            model.form.close();
        }
    }

    if let Some(result) = week_result {
        if let Some(list) = result.set_list {
            model.week_list = list;
        }
        if let Some(date) = result.go_to {
            model.set_date(date);
        }
        if result.close {
            model.week_open = false;
        }
    }
}

fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    let window_rect = app.window_rect();
    let chart_area_w = (window_rect.w() - SIDE_PANEL_WIDTH).max(0.0);

    draw.background().color(drawing::colors::BACKGROUND);

    drawing::draw_header(
        &draw,
        window_rect,
        chart_area_w,
        &format_date_long(model.date),
        &format!(
            "Now {} {} ({})",
            model.clock.format_time(),
            model.clock.tz_abbrev,
            model.clock.format_utc_offset()
        ),
    );

    drawing::draw_chart(&draw, &model.plan_chart, ListType::Plan.label());
    drawing::draw_chart(&draw, &model.record_chart, ListType::Record.label());

    drawing::draw_toasts(&draw, window_rect, chart_area_w, &model.toasts);

    draw.to_frame(app, &frame).unwrap();
    model.egui.draw_to_frame(&frame).unwrap();
}

fn exit(_app: &App, mut model: Model) {
    for chart in model.charts_mut() {
        chart.unmount();
    }
    save_schedules(&model);
    save_config(&model);
}

fn key_pressed(_app: &App, model: &mut Model, key: Key) {
    if key == Key::Escape {
        if model.form.is_open {
            model.form.close();
        } else if model.picker_state.is_open {
            model.picker_state.close();
        } else if model.week_open {
            model.week_open = false;
        }
        return;
    }
    if model.keyboard_busy || model.form.is_open {
        return;
    }

    match key {
        Key::Left => model.set_date(step_date(model.date, -1)),
        Key::Right => model.set_date(step_date(model.date, 1)),
        Key::T => model.set_date(model.clock.date),
        Key::W => model.week_open = !model.week_open,
        Key::Equals | Key::Plus | Key::NumpadAdd => model.apply_zoom(ZoomAction::In),
        Key::Minus | Key::NumpadSubtract => model.apply_zoom(ZoomAction::Out),
        Key::Key0 | Key::Numpad0 => model.apply_zoom(ZoomAction::Reset),
        _ => {}
    }
}

fn to_chart_point(pos: Point2) -> shared::Point {
    shared::Point::new(pos.x, pos.y)
}

fn mouse_pressed(app: &App, model: &mut Model, button: MouseButton) {
    if button != MouseButton::Left || model.pointer_over_ui || model.form.is_open {
        return;
    }
    model.pointer_down(to_chart_point(app.mouse.position()));
}

fn mouse_released(app: &App, model: &mut Model, button: MouseButton) {
    if button == MouseButton::Left {
        model.pointer_up(to_chart_point(app.mouse.position()));
    }
}

fn mouse_moved(_app: &App, model: &mut Model, pos: Point2) {
    if model.pointer_over_ui && !model.plan_chart.is_dragging() && !model.record_chart.is_dragging() {
        for chart in model.charts_mut() {
            chart.clear_hover();
        }
        return;
    }
    model.pointer_move(to_chart_point(pos));
}

fn raw_window_event(app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    model.egui.handle_raw_event(event);

    // Touch maps onto the same pointer path as the mouse
    if let nannou::winit::event::WindowEvent::Touch(touch) = event {
        let window_rect = app.window_rect();
        let point = shared::Point::new(
            touch.location.x as f32 - window_rect.w() / 2.0,
            window_rect.h() / 2.0 - touch.location.y as f32,
        );

        match touch.phase {
            nannou::winit::event::TouchPhase::Started => {
                if !model.pointer_over_ui && !model.form.is_open {
                    model.pointer_down(point);
                }
            }
            nannou::winit::event::TouchPhase::Moved => model.pointer_move(point),
            nannou::winit::event::TouchPhase::Ended | nannou::winit::event::TouchPhase::Cancelled => {
                model.pointer_up(point);
            }
        }
    }
}
