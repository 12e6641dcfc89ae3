use chrono::{Days, NaiveDateTime, NaiveTime};

use super::model::{DateRange, Dataset, Event, NumericRange};

// ---------------------------------------------------------------------------
// FilterSpec: the user's current constraints
// ---------------------------------------------------------------------------

/// Everything the side panel lets the user narrow the catalogue by.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    /// `None` means no date constraint (also used while a range is incomplete).
    pub date_range: Option<DateRange>,
    pub magnitude_range: NumericRange,
    pub depth_range: NumericRange,
    /// Case-insensitive substring of `region`; empty disables the constraint.
    pub search_text: String,
}

impl FilterSpec {
    /// A spec spanning the dataset's observed bounds, i.e. selecting everything.
    ///
    /// An empty dataset (or one with no numeric values) gets `[0, 0]` ranges.
    pub fn for_dataset(dataset: &Dataset) -> Self {
        let zero = NumericRange::new(0.0, 0.0);
        if dataset.is_empty() {
            return Self {
                date_range: None,
                magnitude_range: zero,
                depth_range: zero,
                search_text: String::new(),
            };
        }
        Self {
            date_range: dataset.date_bounds(),
            magnitude_range: dataset.magnitude_bounds().unwrap_or(zero),
            depth_range: dataset.depth_bounds().unwrap_or(zero),
            search_text: String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// One independent row test. A row is kept when every active predicate holds.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `start <= datetime < end`. `end` is `None` when the range reaches the
    /// last representable day. Rows without a timestamp fail.
    TimeWindow {
        start: NaiveDateTime,
        end: Option<NaiveDateTime>,
    },
    Magnitude(NumericRange),
    Depth(NumericRange),
    /// Needle is stored lowercased. Rows without a region fail.
    RegionContains(String),
}

impl Predicate {
    /// The half-open window covering every instant of the chosen days.
    pub fn time_window(range: DateRange) -> Self {
        let midnight = NaiveTime::MIN;
        Predicate::TimeWindow {
            start: range.start.and_time(midnight),
            end: range
                .end
                .checked_add_days(Days::new(1))
                .map(|d| d.and_time(midnight)),
        }
    }

    pub fn region_contains(text: &str) -> Self {
        Predicate::RegionContains(text.to_lowercase())
    }

    pub fn matches(&self, event: &Event) -> bool {
        match self {
            Predicate::TimeWindow { start, end } => match event.datetime {
                Some(t) => t >= *start && end.map_or(true, |end| t < end),
                None => false,
            },
            Predicate::Magnitude(range) => range.contains(event.magnitude),
            Predicate::Depth(range) => range.contains(event.depth_km),
            Predicate::RegionContains(needle) => event
                .region
                .as_deref()
                .is_some_and(|r| r.to_lowercase().contains(needle.as_str())),
        }
    }
}

/// Build the ordered predicate list for `spec` against `dataset`.
///
/// The time window only applies when the dataset has a `datetime` column and a
/// range is set; the region test only when the search text is non-empty.
pub fn predicates(dataset: &Dataset, spec: &FilterSpec) -> Vec<Predicate> {
    let mut preds = Vec::with_capacity(4);
    if let (true, Some(range)) = (dataset.has_datetime(), spec.date_range) {
        preds.push(Predicate::time_window(range));
    }
    preds.push(Predicate::Magnitude(spec.magnitude_range));
    preds.push(Predicate::Depth(spec.depth_range));
    if !spec.search_text.is_empty() {
        preds.push(Predicate::region_contains(&spec.search_text));
    }
    preds
}

// ---------------------------------------------------------------------------
// FilteredView
// ---------------------------------------------------------------------------

/// The rows of a dataset passing a spec, in dataset order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    pub dataset: &'a Dataset,
    /// Indices into `dataset.events`, ascending.
    pub indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The matching events in dataset order.
    pub fn events(&self) -> impl Iterator<Item = &'a Event> + '_ {
        let dataset = self.dataset;
        self.indices.iter().map(move |&i| &dataset.events[i])
    }

    pub fn columns(&self) -> &'a [String] {
        &self.dataset.columns
    }
}

/// Return the view of events that pass every predicate derived from `spec`.
pub fn apply<'a>(dataset: &'a Dataset, spec: &FilterSpec) -> FilteredView<'a> {
    let preds = predicates(dataset, spec);
    let indices = dataset
        .events
        .iter()
        .enumerate()
        .filter(|(_, ev)| preds.iter().all(|p| p.matches(ev)))
        .map(|(i, _)| i)
        .collect();
    FilteredView { dataset, indices }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::RawTable;
    use chrono::NaiveDate;
    use std::path::Path;

    fn dataset(rows: &[[&str; 6]]) -> Dataset {
        let table = RawTable {
            columns: ["datetime", "latitude", "longitude", "depth_km", "magnitude", "region"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        };
        Dataset::from_table(Path::new("test.csv"), table).unwrap()
    }

    fn sample() -> Dataset {
        dataset(&[
            ["2020-01-05 23:59:00", "7.1", "126.6", "10", "5.1", "Davao Oriental"],
            ["2020-01-06 00:01:00", "14.1", "120.9", "120", "3.2", "Batangas"],
            ["2020-01-03 12:00:00", "", "125.0", "33", "4.4", ""],
            ["2020-01-10 08:30:00", "9.8", "126.2", "5", "2.0", "Surigao del Norte"],
            ["", "12.0", "124.0", "60", "6.3", "Samar"],
        ])
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn default_spec_keeps_everything() {
        let ds = sample();
        let spec = FilterSpec::for_dataset(&ds);
        // The row without a timestamp is dropped once a date range is active.
        assert_eq!(apply(&ds, &spec).indices, vec![0, 1, 2, 3]);

        let spec = FilterSpec { date_range: None, ..spec };
        assert_eq!(apply(&ds, &spec).len(), ds.len());
    }

    #[test]
    fn end_date_is_whole_day_half_open() {
        let ds = sample();
        let spec = FilterSpec {
            date_range: Some(DateRange::new(day(2020, 1, 5), day(2020, 1, 5))),
            ..FilterSpec::for_dataset(&ds)
        };
        assert_eq!(apply(&ds, &spec).indices, vec![0]);
    }

    #[test]
    fn zoned_row_filters_on_its_local_day() {
        let ds = dataset(&[
            ["2020-01-06T05:00:00+08:00", "7.1", "126.6", "10", "5.1", "Davao Oriental"],
            ["2020-01-05 23:00:00", "14.1", "120.9", "120", "3.2", "Batangas"],
        ]);
        assert_eq!(
            ds.date_bounds(),
            Some(DateRange::new(day(2020, 1, 5), day(2020, 1, 6)))
        );
        let spec = FilterSpec {
            date_range: Some(DateRange::new(day(2020, 1, 6), day(2020, 1, 6))),
            ..FilterSpec::for_dataset(&ds)
        };
        assert_eq!(apply(&ds, &spec).indices, vec![0]);
        assert!(crate::map::marker_label(&ds.events[0]).starts_with("Date: 2020-01-06 05:00:00"));
    }

    #[test]
    fn date_range_ignored_without_datetime_column() {
        let table = RawTable {
            columns: vec!["magnitude".into(), "depth_km".into()],
            rows: vec![vec!["4.0".into(), "10".into()]],
        };
        let ds = Dataset::from_table(Path::new("t.csv"), table).unwrap();
        let spec = FilterSpec {
            date_range: Some(DateRange::new(day(1990, 1, 1), day(1990, 1, 2))),
            ..FilterSpec::for_dataset(&ds)
        };
        assert!(predicates(&ds, &spec)
            .iter()
            .all(|p| !matches!(p, Predicate::TimeWindow { .. })));
        assert_eq!(apply(&ds, &spec).len(), 1);
    }

    #[test]
    fn magnitude_and_depth_are_inclusive() {
        let ds = sample();
        let spec = FilterSpec {
            date_range: None,
            magnitude_range: NumericRange::new(3.2, 5.1),
            depth_range: NumericRange::new(10.0, 120.0),
            search_text: String::new(),
        };
        assert_eq!(apply(&ds, &spec).indices, vec![0, 1, 2]);
    }

    #[test]
    fn search_is_case_insensitive_and_skips_missing_region() {
        let ds = sample();
        let base = FilterSpec {
            date_range: None,
            ..FilterSpec::for_dataset(&ds)
        };
        let spec = FilterSpec {
            search_text: "davao".into(),
            ..base.clone()
        };
        assert_eq!(apply(&ds, &spec).indices, vec![0]);

        let spec = FilterSpec {
            search_text: "A".into(),
            ..base
        };
        // Row 2 has no region, so it never matches.
        assert_eq!(apply(&ds, &spec).indices, vec![0, 1, 3, 4]);
    }

    #[test]
    fn out_of_range_magnitude_is_empty_not_error() {
        let ds = sample();
        let spec = FilterSpec {
            magnitude_range: NumericRange::new(100.0, 200.0),
            ..FilterSpec::for_dataset(&ds)
        };
        let view = apply(&ds, &spec);
        assert!(view.is_empty());
        assert_eq!(view.events().count(), 0);
    }

    #[test]
    fn empty_dataset_is_empty_view() {
        let ds = dataset(&[]);
        let spec = FilterSpec::for_dataset(&ds);
        assert_eq!(spec.magnitude_range, NumericRange::new(0.0, 0.0));
        assert_eq!(spec.date_range, None);
        assert!(apply(&ds, &spec).is_empty());
    }

    #[test]
    fn views_are_ordered_subsets_and_idempotent() {
        let ds = sample();
        let specs = [
            FilterSpec::for_dataset(&ds),
            FilterSpec {
                magnitude_range: NumericRange::new(3.0, 6.0),
                search_text: "s".into(),
                ..FilterSpec::for_dataset(&ds)
            },
            FilterSpec {
                date_range: Some(DateRange::new(day(2020, 1, 4), day(2020, 1, 10))),
                depth_range: NumericRange::new(0.0, 50.0),
                ..FilterSpec::for_dataset(&ds)
            },
        ];
        for spec in &specs {
            let a = apply(&ds, spec);
            let b = apply(&ds, spec);
            assert_eq!(a.indices, b.indices);
            assert!(a.indices.windows(2).all(|w| w[0] < w[1]));
            for ev in a.events() {
                assert!(ds.events.contains(ev));
            }
        }
    }

    #[test]
    fn time_window_at_last_representable_day_is_open_ended() {
        let pred = Predicate::time_window(DateRange::new(day(2020, 1, 1), NaiveDate::MAX));
        assert!(matches!(pred, Predicate::TimeWindow { end: None, .. }));
    }
}
