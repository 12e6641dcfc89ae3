use super::filter::FilteredView;

/// Rows shown in the preview table unless configured otherwise.
pub const DEFAULT_PREVIEW_LIMIT: usize = 100;

// ---------------------------------------------------------------------------
// Grid – the table preview payload
// ---------------------------------------------------------------------------

/// Header plus the leading rows of a view, cells verbatim.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Grid {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The first `limit` rows of `view` in dataset order. Truncation is silent.
pub fn preview(view: &FilteredView<'_>, limit: usize) -> Grid {
    Grid {
        columns: view.columns().to_vec(),
        rows: view.events().take(limit).map(|e| e.cells.clone()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{FilterSpec, apply};
    use crate::data::loader::read_csv;
    use crate::data::model::{Dataset, NumericRange};
    use std::path::Path;

    fn numbered(n: usize) -> Dataset {
        let mut text = String::from("magnitude,depth_km,region\n");
        for i in 0..n {
            text.push_str(&format!("{}.0,{i},R{i}\n", i % 7));
        }
        Dataset::from_table(Path::new("n.csv"), read_csv(text.as_bytes()).unwrap()).unwrap()
    }

    #[test]
    fn truncates_to_limit_in_order() {
        let ds = numbered(250);
        let view = apply(&ds, &FilterSpec::for_dataset(&ds));
        let grid = preview(&view, DEFAULT_PREVIEW_LIMIT);
        assert_eq!(grid.columns, vec!["magnitude", "depth_km", "region"]);
        assert_eq!(grid.rows.len(), 100);
        assert_eq!(grid.rows[0][2], "R0");
        assert_eq!(grid.rows[99][2], "R99");
    }

    #[test]
    fn short_view_is_shown_whole() {
        let ds = numbered(10);
        let spec = FilterSpec {
            magnitude_range: NumericRange::new(0.0, 1.0),
            ..FilterSpec::for_dataset(&ds)
        };
        let grid = preview(&apply(&ds, &spec), DEFAULT_PREVIEW_LIMIT);
        let regions: Vec<&str> = grid.rows.iter().map(|r| r[2].as_str()).collect();
        assert_eq!(regions, vec!["R0", "R1", "R7", "R8"]);
    }

    #[test]
    fn empty_view_keeps_header() {
        let ds = numbered(5);
        let spec = FilterSpec {
            magnitude_range: NumericRange::new(100.0, 200.0),
            ..FilterSpec::for_dataset(&ds)
        };
        let grid = preview(&apply(&ds, &spec), DEFAULT_PREVIEW_LIMIT);
        assert!(grid.is_empty());
        assert_eq!(grid.columns.len(), 3);
    }
}
