use eframe::egui::{Align, Layout, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::preview::Grid;

/// Render the data preview grid.
pub fn preview_table(ui: &mut Ui, grid: &Grid) {
    if grid.is_empty() {
        ui.label("No events found.");
        return;
    }

    ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(Layout::left_to_right(Align::Center))
            .columns(Column::auto().at_least(60.0), grid.columns.len())
            .min_scrolled_height(0.0)
            .header(20.0, |mut header| {
                for name in &grid.columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(name.as_str());
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, grid.rows.len(), |mut row| {
                    let cells = &grid.rows[row.index()];
                    for cell in cells {
                        row.col(|ui: &mut Ui| {
                            ui.label(cell.as_str());
                        });
                    }
                });
            });
    });
}
