use chrono::{DateTime, NaiveDate, NaiveDateTime};

// ---------------------------------------------------------------------------
// Lenient timestamp parsing for the `datetime` column
// ---------------------------------------------------------------------------

/// Layouts tried in order for naive (zone-less) timestamps.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
    "%d %B %Y - %I:%M %p",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Display layout used for marker labels and anywhere a timestamp is shown.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse one `datetime` cell.
///
/// Returns `None` for empty cells and for anything no known layout accepts.
/// Zoned timestamps keep their local wall time; the offset is dropped so the
/// calendar day matches the cell as written.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("nat") {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(dt.naive_local());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn parses_pandas_style_timestamp() {
        assert_eq!(
            parse_timestamp("2020-01-05 23:59:00"),
            Some(ymd_hms(2020, 1, 5, 23, 59, 0))
        );
    }

    #[test]
    fn parses_iso_t_separator_without_seconds() {
        assert_eq!(
            parse_timestamp("2020-01-06T00:01"),
            Some(ymd_hms(2020, 1, 6, 0, 1, 0))
        );
    }

    #[test]
    fn zoned_timestamp_keeps_local_wall_time() {
        assert_eq!(
            parse_timestamp("2020-01-06T05:00:00+08:00"),
            Some(ymd_hms(2020, 1, 6, 5, 0, 0))
        );
        assert_eq!(
            parse_timestamp("2020-01-06 05:00:00+08:00"),
            Some(ymd_hms(2020, 1, 6, 5, 0, 0))
        );
    }

    #[test]
    fn date_only_is_midnight() {
        assert_eq!(parse_timestamp("2019/12/31"), Some(ymd_hms(2019, 12, 31, 0, 0, 0)));
    }

    #[test]
    fn phivolcs_bulletin_layout() {
        assert_eq!(
            parse_timestamp("05 January 2020 - 11:59 PM"),
            Some(ymd_hms(2020, 1, 5, 23, 59, 0))
        );
    }

    #[test]
    fn garbage_and_empty_are_null() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("NaT"), None);
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("2020-13-45 10:00:00"), None);
    }
}
