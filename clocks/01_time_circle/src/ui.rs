//! UI module for the Time Circle
//!
//! The side panel (date, clock, settings, summary, timetables), the
//! schedule form and the week overview, all drawn with egui.

use chrono::NaiveDate;
use chrono_tz::Tz;
use nannou_egui::egui;
use shared::category::CategoryResolver;
use shared::day_view::{summarize, DaySummary, HourRow, WeekGrid};
use shared::settings::TIME_INTERVAL_CHOICES;
use shared::time_math::format_duration;
use shared::{
    format_date, search_timezones, system_timezone, CategoryTable, ChartSettings, ClockReading,
    ListType, Rgb, Schedule,
};

use crate::form::{FormMode, ScheduleForm};

const TIMETABLE_ROW_HEIGHT: f32 = 16.0;
const TIMETABLE_LABEL_WIDTH: f32 = 40.0;
const WEEK_CELL_WIDTH: f32 = 84.0;
const WEEK_CELL_HEIGHT: f32 = 12.0;

fn color32(c: Rgb) -> egui::Color32 {
    egui::Color32::from_rgb(c.r, c.g, c.b)
}

/// State for the display zone picker
#[derive(Default)]
pub struct PickerState {
    pub is_open: bool,
    pub search_query: String,
    pub search_results: Vec<Tz>,
    pub should_focus_search: bool,
}

impl PickerState {
    pub fn open(&mut self) {
        self.is_open = true;
        self.search_query.clear();
        self.search_results = search_timezones("");
        self.should_focus_search = true;
    }

    pub fn close(&mut self) {
        self.is_open = false;
        self.search_query.clear();
        self.search_results.clear();
    }

    pub fn update_search(&mut self) {
        self.search_results = search_timezones(&self.search_query);
    }
}

/// Zoom request applied to both charts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomAction {
    In,
    Out,
    Reset,
}

/// Result of side panel interactions
#[derive(Default)]
pub struct SidePanelResult {
    /// Move the date by this many days
    pub step_days: Option<i64>,
    pub go_today: bool,
    pub set_timezone: Option<Tz>,
    /// New settings after an edit in the panel
    pub settings: Option<ChartSettings>,
    pub zoom: Option<ZoomAction>,
    /// Open an empty form for this list
    pub new_schedule: Option<ListType>,
    /// Open the form for a schedule shown in a timetable
    pub edit: Option<(ListType, Schedule)>,
    pub toggle_week: bool,
}

/// Everything the side panel shows for the current date
pub struct PanelView<'a> {
    pub date: NaiveDate,
    pub clock: &'a ClockReading,
    pub display_zone: Tz,
    pub settings: ChartSettings,
    pub zoom: f32,
    pub plan: &'a [Schedule],
    pub record: &'a [Schedule],
    pub categories: &'a CategoryTable,
    pub week_open: bool,
}

/// Draw the side panel (right)
pub fn draw_side_panel(
    ctx: &egui::Context,
    width: f32,
    picker_state: &mut PickerState,
    view: &PanelView,
) -> SidePanelResult {
    let mut result = SidePanelResult::default();

    egui::SidePanel::right("side_panel")
        .resizable(false)
        .exact_width(width)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(8.0);

                // Date navigation
                ui.heading(format_date(view.date));
                ui.horizontal(|ui| {
                    if ui.button("◀ Prev").on_hover_text("Previous day. Keyboard: ←").clicked() {
                        result.step_days = Some(-1);
                    }
                    if ui.button("Today").on_hover_text("Keyboard: T").clicked() {
                        result.go_today = true;
                    }
                    if ui.button("Next ▶").on_hover_text("Next day. Keyboard: →").clicked() {
                        result.step_days = Some(1);
                    }
                });

                ui.separator();

                // Clock and display zone
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(view.clock.format_time()).size(18.0));
                    ui.label(
                        egui::RichText::new(format!(
                            "{} ({})",
                            view.clock.tz_abbrev,
                            view.clock.format_utc_offset()
                        ))
                        .color(egui::Color32::from_rgb(140, 150, 170)),
                    );
                });
                ui.horizontal(|ui| {
                    ui.label(format_zone_name(view.display_zone));
                    if ui.button("Change zone").clicked() {
                        picker_state.open();
                    }
                    if ui.button("System").on_hover_text("Use the computer's local zone").clicked() {
                        result.set_timezone = system_timezone();
                    }
                });

                ui.separator();

                // Chart settings
                ui.label(egui::RichText::new("Chart").strong());
                let mut settings = view.settings;
                egui::ComboBox::from_label("Time interval")
                    .selected_text(format!("{} min", settings.time_interval))
                    .show_ui(ui, |ui| {
                        for &choice in TIME_INTERVAL_CHOICES {
                            ui.selectable_value(&mut settings.time_interval, choice, format!("{} min", choice));
                        }
                    });
                ui.checkbox(&mut settings.show_empty_time, "Show empty time");
                if settings != view.settings {
                    result.settings = Some(settings);
                }

                ui.horizontal(|ui| {
                    ui.label(format!("Zoom {:.0}%", view.zoom * 100.0));
                    if ui.small_button("−").on_hover_text("Keyboard: -").clicked() {
                        result.zoom = Some(ZoomAction::Out);
                    }
                    if ui.small_button("+").on_hover_text("Keyboard: +").clicked() {
                        result.zoom = Some(ZoomAction::In);
                    }
                    if ui.small_button("Reset").on_hover_text("Keyboard: 0").clicked() {
                        result.zoom = Some(ZoomAction::Reset);
                    }
                });

                ui.horizontal(|ui| {
                    for &list in ListType::all() {
                        if ui.button(format!("New {}", list.label().to_lowercase())).clicked() {
                            result.new_schedule = Some(list);
                        }
                    }
                });
                let week_label = if view.week_open { "Hide week (W)" } else { "Week overview (W)" };
                if ui.button(week_label).clicked() {
                    result.toggle_week = true;
                }

                ui.separator();

                draw_summary(ui, &summarize(view.plan, view.record), view.categories);

                ui.separator();

                for &list in ListType::all() {
                    let schedules = match list {
                        ListType::Plan => view.plan,
                        ListType::Record => view.record,
                    };
                    ui.collapsing(format!("{} timetable ({})", list.label(), schedules.len()), |ui| {
                        let rows = shared::day_view::day_timetable(schedules);
                        if let Some(id) = draw_timetable(ui, &rows, view.categories) {
                            if let Some(schedule) = schedules.iter().find(|s| s.id == id) {
                                result.edit = Some((list, schedule.clone()));
                            }
                        }
                    });
                }
            });
        });

    if picker_state.is_open {
        let picker_result = draw_timezone_picker(ctx, picker_state);
        if let Some(tz) = picker_result.select_zone {
            result.set_timezone = Some(tz);
            picker_state.close();
        }
        if picker_result.close {
            picker_state.close();
        }
    }

    result
}

fn draw_summary(ui: &mut egui::Ui, summary: &DaySummary, categories: &CategoryTable) {
    ui.label(egui::RichText::new("Summary").strong());
    ui.label(format!(
        "Planned {}  ·  Recorded {}",
        format_duration(summary.plan_minutes),
        format_duration(summary.record_minutes)
    ));
    if let Some(ratio) = summary.record_ratio() {
        ui.add(egui::ProgressBar::new(ratio.min(1.0)).text(format!("{:.0}% of plan recorded", ratio * 100.0)));
    }

    if summary.by_category.is_empty() {
        return;
    }
    egui::Grid::new("summary_grid").striped(true).show(ui, |ui| {
        ui.label("");
        ui.label("Plan");
        ui.label("Record");
        ui.end_row();
        for (id, totals) in &summary.by_category {
            ui.horizontal(|ui| {
                let (rect, _) = ui.allocate_exact_size(egui::vec2(10.0, 10.0), egui::Sense::hover());
                ui.painter().rect_filled(rect, 2.0, color32(categories.color_of(id)));
                ui.label(categories.name_of(id));
            });
            ui.label(format_duration(totals.plan));
            ui.label(format_duration(totals.record));
            ui.end_row();
        }
    });
}

/// Paint hour rows with their blocks; returns the id of a clicked block
fn draw_timetable(ui: &mut egui::Ui, rows: &[HourRow], categories: &CategoryTable) -> Option<String> {
    let mut clicked = None;
    let width = ui.available_width();

    for row in rows {
        let (rect, response) =
            ui.allocate_exact_size(egui::vec2(width, TIMETABLE_ROW_HEIGHT), egui::Sense::click());
        let painter = ui.painter();
        painter.text(
            rect.left_center(),
            egui::Align2::LEFT_CENTER,
            &row.label,
            egui::FontId::proportional(10.0),
            egui::Color32::GRAY,
        );
        painter.hline(rect.x_range(), rect.bottom(), egui::Stroke::new(0.5, egui::Color32::from_gray(220)));

        let blocks_left = rect.left() + TIMETABLE_LABEL_WIDTH;
        for block in &row.blocks {
            let block_rect = egui::Rect::from_min_size(
                egui::pos2(blocks_left, rect.top() + block.top * rect.height()),
                egui::vec2(rect.right() - blocks_left, block.height * rect.height()),
            );
            painter.rect_filled(block_rect, 2.0, color32(categories.color_of(&block.category)));
            if block.show_title {
                painter.text(
                    block_rect.left_top() + egui::vec2(4.0, 1.0),
                    egui::Align2::LEFT_TOP,
                    &block.title,
                    egui::FontId::proportional(10.0),
                    egui::Color32::BLACK,
                );
            }
            let hit = response
                .interact_pointer_pos()
                .is_some_and(|pos| block_rect.contains(pos));
            if response.clicked() && hit {
                clicked = Some(block.schedule_id.clone());
            }
        }
    }

    clicked
}

/// Result of schedule form interactions
#[derive(Default)]
pub struct FormResult {
    pub save: bool,
    pub delete: bool,
    pub cancel: bool,
}

/// Draw the schedule form window
pub fn draw_schedule_form(ctx: &egui::Context, form: &mut ScheduleForm, categories: &CategoryTable) -> FormResult {
    let mut result = FormResult::default();
    let mut open = form.is_open;

    egui::Window::new(form.heading())
        .id(egui::Id::new("schedule_form"))
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .default_width(320.0)
        .show(ctx, |ui| {
            ui.label(
                egui::RichText::new(format_date(form.date)).color(egui::Color32::from_rgb(140, 150, 170)),
            );

            egui::Grid::new("form_grid").num_columns(2).show(ui, |ui| {
                ui.label("Title");
                let title_response = ui.text_edit_singleline(&mut form.title);
                if form.should_focus_title {
                    title_response.request_focus();
                    form.should_focus_title = false;
                }
                if title_response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    result.save = true;
                }
                ui.end_row();

                ui.label("Start");
                ui.add(egui::TextEdit::singleline(&mut form.start_text).hint_text("HH:MM"));
                ui.end_row();

                ui.label("End");
                ui.add(egui::TextEdit::singleline(&mut form.end_text).hint_text("HH:MM"));
                ui.end_row();

                ui.label("Category");
                egui::ComboBox::from_id_source("form_category")
                    .selected_text(categories.name_of(&form.category))
                    .show_ui(ui, |ui| {
                        for category in categories.categories() {
                            ui.selectable_value(&mut form.category, category.id.clone(), category.name.as_str());
                        }
                    });
                ui.end_row();

                ui.label("Memo");
                ui.add(egui::TextEdit::multiline(&mut form.memo).desired_rows(3));
                ui.end_row();
            });

            if let Some(error) = &form.error {
                ui.label(egui::RichText::new(error).color(egui::Color32::from_rgb(220, 80, 80)));
            }

            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Save").clicked() {
                    result.save = true;
                }
                if matches!(form.mode, FormMode::Edit { .. }) && ui.button("Delete").clicked() {
                    result.delete = true;
                }
                if ui.button("Cancel (Esc)").clicked() {
                    result.cancel = true;
                }
            });
        });

    if !open {
        result.cancel = true;
    }
    result
}

/// Result of week overview interactions
#[derive(Default)]
pub struct WeekResult {
    pub close: bool,
    /// Switch the overview to another list
    pub set_list: Option<ListType>,
    /// Jump to a date by clicking its column
    pub go_to: Option<NaiveDate>,
}

/// Draw the week overview window
pub fn draw_week_overview(
    ctx: &egui::Context,
    grid: &WeekGrid,
    list: ListType,
    categories: &CategoryTable,
) -> WeekResult {
    let mut result = WeekResult::default();
    let mut open = true;

    egui::Window::new("Week overview")
        .open(&mut open)
        .collapsible(true)
        .resizable(true)
        .default_width(WEEK_CELL_WIDTH * 7.0 + 60.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                for &choice in ListType::all() {
                    if ui.selectable_label(choice == list, choice.label()).clicked() && choice != list {
                        result.set_list = Some(choice);
                    }
                }
            });
            ui.separator();

            egui::ScrollArea::both().max_height(480.0).show(ui, |ui| {
                egui::Grid::new("week_grid").spacing(egui::vec2(2.0, 0.0)).show(ui, |ui| {
                    ui.label("");
                    for (day, header) in grid.headers.iter().enumerate() {
                        if ui.small_button(header).clicked() {
                            result.go_to = grid.dates.get(day).copied();
                        }
                    }
                    ui.end_row();

                    for hour in 0..24u32 {
                        ui.label(egui::RichText::new(format!("{}:00", hour)).size(9.0));
                        for day in 0..grid.dates.len() {
                            draw_week_cell(ui, grid.cell(day, hour), categories);
                        }
                        ui.end_row();
                    }
                });
            });
        });

    if !open {
        result.close = true;
    }
    result
}

fn draw_week_cell(ui: &mut egui::Ui, blocks: &[shared::day_view::HourBlock], categories: &CategoryTable) {
    let (rect, response) =
        ui.allocate_exact_size(egui::vec2(WEEK_CELL_WIDTH, WEEK_CELL_HEIGHT), egui::Sense::hover());
    let painter = ui.painter();
    painter.rect_stroke(rect, 0.0, egui::Stroke::new(0.5, egui::Color32::from_gray(225)));

    for block in blocks {
        let block_rect = egui::Rect::from_min_size(
            egui::pos2(rect.left(), rect.top() + block.top * rect.height()),
            egui::vec2(rect.width(), block.height * rect.height()),
        );
        painter.rect_filled(block_rect, 0.0, color32(categories.color_of(&block.category)));
    }

    if !blocks.is_empty() {
        let titles: Vec<&str> = blocks.iter().map(|b| b.title.as_str()).collect();
        response.on_hover_text(titles.join("\n"));
    }
}

/// Result of timezone picker interactions
#[derive(Default)]
struct PickerResult {
    select_zone: Option<Tz>,
    close: bool,
}

/// Draw the display zone picker
fn draw_timezone_picker(ctx: &egui::Context, picker_state: &mut PickerState) -> PickerResult {
    let mut result = PickerResult::default();

    egui::Window::new("Display zone")
        .collapsible(false)
        .resizable(true)
        .default_width(360.0)
        .default_height(420.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Search:");
                let search_response = ui.text_edit_singleline(&mut picker_state.search_query);
                if picker_state.should_focus_search {
                    search_response.request_focus();
                    picker_state.should_focus_search = false;
                }
                if search_response.changed() {
                    picker_state.update_search();
                }
            });

            ui.separator();
            ui.label(format!("{} results", picker_state.search_results.len()));

            egui::ScrollArea::vertical().max_height(300.0).show(ui, |ui| {
                for &tz in picker_state.search_results.iter().take(100) {
                    if ui.button(tz.name()).clicked() {
                        result.select_zone = Some(tz);
                    }
                }
            });

            ui.separator();
            if ui.button("Close (Esc)").clicked() {
                result.close = true;
            }
        });

    result
}

/// City part of an IANA zone name
fn format_zone_name(tz: Tz) -> String {
    let name = tz.name();
    match name.rfind('/') {
        Some(idx) => name[idx + 1..].replace('_', " "),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_zone_name() {
        assert_eq!(format_zone_name(chrono_tz::America::Los_Angeles), "Los Angeles");
        assert_eq!(format_zone_name(chrono_tz::UTC), "UTC");
    }
}
