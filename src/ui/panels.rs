use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};
use egui_extras::DatePickerButton;

use crate::data::export::EXPORT_FILE_NAME;
use crate::data::model::NumericRange;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let magnitude_bounds = state.dataset.magnitude_bounds();
    let depth_bounds = state.dataset.depth_bounds();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Date range ----
            if let Some(input) = &mut state.date_input {
                ui.strong("Date Range");
                egui::Grid::new("date_range")
                    .num_columns(2)
                    .show(ui, |ui: &mut Ui| {
                        ui.label("From");
                        ui.add(DatePickerButton::new(&mut input.start).id_salt("date_from"));
                        ui.end_row();
                        ui.label("To");
                        ui.add(DatePickerButton::new(&mut input.end).id_salt("date_to"));
                        ui.end_row();
                    });
                if !input.is_complete() {
                    ui.label(
                        RichText::new("Pick an end date on or after the start date.")
                            .small()
                            .color(Color32::YELLOW),
                    );
                }
                ui.separator();
            }
            state.sync_date_input();

            // ---- Magnitude / depth ----
            if let Some(bounds) = magnitude_bounds {
                range_sliders(ui, "Magnitude", &mut state.spec.magnitude_range, bounds);
                ui.separator();
            }
            if let Some(bounds) = depth_bounds {
                range_sliders(ui, "Depth (km)", &mut state.spec.depth_range, bounds);
                ui.separator();
            }

            // ---- Region search ----
            ui.strong("Search Location");
            ui.add(
                egui::TextEdit::singleline(&mut state.spec.search_text)
                    .hint_text("e.g. Davao"),
            );
            ui.separator();

            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }
        });

    state.refresh();
}

/// A low/high slider pair over `bounds`. Dragging one thumb past the other
/// pushes the other along so `low <= high` always holds.
fn range_sliders(ui: &mut Ui, title: &str, range: &mut NumericRange, bounds: NumericRange) {
    ui.strong(title);
    let span = bounds.low..=bounds.high;
    let low_changed = ui
        .add(Slider::new(&mut range.low, span.clone()).text("min"))
        .changed();
    let high_changed = ui
        .add(Slider::new(&mut range.high, span).text("max"))
        .changed();

    if range.low > range.high {
        if low_changed {
            range.high = range.low;
        } else if high_changed {
            range.low = range.high;
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button(format!("Export {EXPORT_FILE_NAME}…")).clicked() {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "Events: {}  (of {} loaded)",
            format_count(state.frame.matched),
            format_count(state.dataset.len())
        ));

        if ui.button("Download CSV").clicked() {
            save_file_dialog(state);
        }

        ui.separator();

        if let Some(name) = state.source.file_name() {
            ui.label(RichText::new(name.to_string_lossy()).weak());
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open earthquake catalogue")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(&path);
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Save filtered events")
        .set_file_name(EXPORT_FILE_NAME)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        state.save_export(&path);
    }
}

/// `1234567` → `"1,234,567"`.
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
