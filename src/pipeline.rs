use crate::config::DashboardConfig;
use crate::data::export::export;
use crate::data::filter::{FilterSpec, apply};
use crate::data::model::Dataset;
use crate::data::preview::{Grid, preview};
use crate::map::{self, MapSurface};

// ---------------------------------------------------------------------------
// One full pass from filter choices to displayable output
// ---------------------------------------------------------------------------

/// What the map area shows.
#[derive(Debug, Clone, PartialEq)]
pub enum MapFrame {
    Surface(MapSurface),
    /// No events matched; show "No events found." instead of a map.
    Empty,
}

/// Output of [`render_frame`]: everything the UI draws for one spec.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Rows in the filtered view (the count label).
    pub matched: usize,
    pub map: MapFrame,
    pub grid: Grid,
    /// The whole filtered view as CSV.
    pub csv: Vec<u8>,
}

/// Run filter, map, preview, and export against `dataset` for `spec`.
///
/// Pure: the same inputs always give the same frame. The UI calls this again
/// whenever the spec changes. Writing CSV into memory cannot hit I/O errors,
/// so an export failure only logs and leaves `csv` empty.
pub fn render_frame(dataset: &Dataset, spec: &FilterSpec, config: &DashboardConfig) -> Frame {
    let view = apply(dataset, spec);
    let map = match map::render(&view, config.initial_zoom) {
        Some(surface) => MapFrame::Surface(surface),
        None => MapFrame::Empty,
    };
    let csv = export(&view).unwrap_or_else(|e| {
        log::error!("Export failed: {e:#}");
        Vec::new()
    });
    Frame {
        matched: view.len(),
        map,
        grid: preview(&view, config.preview_limit),
        csv,
    }
}
