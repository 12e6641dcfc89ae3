use anyhow::{Context, Result};

use super::filter::FilteredView;

/// Suggested file name for the download.
pub const EXPORT_FILE_NAME: &str = "filtered.csv";

/// Serialize every row of `view` as CSV: header first, source column order,
/// cells exactly as loaded, no index column.
pub fn export(view: &FilteredView<'_>) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(view.columns())
        .context("writing CSV header")?;
    for event in view.events() {
        writer
            .write_record(&event.cells)
            .context("writing CSV row")?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing CSV export: {}", e.error()))
}
