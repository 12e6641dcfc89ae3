use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;

use crate::config::DashboardConfig;
use crate::data::export::EXPORT_FILE_NAME;
use crate::data::filter::FilterSpec;
use crate::data::model::{DateRange, Dataset};
use crate::data::store;
use crate::pipeline::{Frame, render_frame};

// ---------------------------------------------------------------------------
// Date picker glue
// ---------------------------------------------------------------------------

/// The two date pickers as the user left them.
///
/// While the start lies after the end the range is incomplete and no date
/// constraint is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateInput {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateInput {
    pub fn from_range(range: DateRange) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }

    pub fn selection(&self) -> Option<DateRange> {
        (self.start <= self.end).then(|| DateRange::new(self.start, self.end))
    }

    pub fn is_complete(&self) -> bool {
        self.start <= self.end
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded catalogue, shared with the load cache.
    pub dataset: Arc<Dataset>,

    /// Where `dataset` came from.
    pub source: PathBuf,

    /// Current filter selections.
    pub spec: FilterSpec,

    /// Picker values; `None` when the dataset has no usable timestamps.
    pub date_input: Option<DateInput>,

    /// Output of the last pipeline run.
    pub frame: Frame,

    /// Spec `frame` was computed for.
    frame_spec: FilterSpec,

    pub config: DashboardConfig,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Set when the map should jump back to the surface's centre and zoom.
    pub recenter_map: bool,
}

impl AppState {
    pub fn new(dataset: Arc<Dataset>, source: PathBuf, config: DashboardConfig) -> Self {
        let spec = FilterSpec::for_dataset(&dataset);
        let frame = render_frame(&dataset, &spec, &config);
        Self {
            date_input: spec.date_range.map(DateInput::from_range),
            frame_spec: spec.clone(),
            spec,
            frame,
            dataset,
            source,
            config,
            status_message: None,
            recenter_map: true,
        }
    }

    /// Ingest a newly loaded dataset and reset filters to its bounds.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>, source: PathBuf) {
        *self = Self::new(dataset, source, self.config.clone());
    }

    /// Load another catalogue through the shared cache. Failures leave the
    /// current dataset in place and surface as a status message.
    pub fn open_path(&mut self, path: &Path) {
        match store::load(path) {
            Ok(dataset) => self.set_dataset(dataset, path.to_path_buf()),
            Err(e) => {
                log::error!("Failed to load file: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Restore every filter to the dataset's bounds.
    pub fn reset_filters(&mut self) {
        self.spec = FilterSpec::for_dataset(&self.dataset);
        self.date_input = self.spec.date_range.map(DateInput::from_range);
        self.refresh();
    }

    /// Copy the picker state into the spec.
    pub fn sync_date_input(&mut self) {
        if let Some(input) = &self.date_input {
            self.spec.date_range = input.selection();
        }
    }

    /// Re-run the pipeline if the spec changed since the last run.
    pub fn refresh(&mut self) {
        if self.spec == self.frame_spec {
            return;
        }
        self.frame = render_frame(&self.dataset, &self.spec, &self.config);
        self.frame_spec = self.spec.clone();
        self.recenter_map = true;
    }

    /// Write the current export to `path`.
    pub fn save_export(&mut self, path: &Path) {
        match std::fs::write(path, &self.frame.csv) {
            Ok(()) => {
                log::info!("Exported {} events to {}", self.frame.matched, path.display());
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to write {}: {e}", path.display());
                self.status_message = Some(format!("Error: could not save {EXPORT_FILE_NAME}: {e}"));
            }
        }
    }
}
