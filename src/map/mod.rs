//! Map layer: filtered events → markers and centre; clusters per display zoom.
//!
//! ```text
//!   FilteredView
//!        │  skip rows without lat/lon
//!        ▼
//!   ┌──────────┐
//!   │  render   │  markers + centroid + initial zoom
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  cluster  │  group markers per Web Mercator tile
//!   └──────────┘
//! ```

pub mod cluster;

use crate::data::filter::FilteredView;
use crate::data::model::Event;
use crate::data::timestamp::DISPLAY_FORMAT;

pub use cluster::{MarkerCluster, cluster_markers};

/// Zoom level the map opens at.
pub const DEFAULT_ZOOM: u8 = 6;

/// Clusters are computed this many levels deeper than the displayed zoom, so
/// a cluster covers a fraction of the visible area rather than a whole tile.
pub const DEFAULT_CLUSTER_ZOOM_OFFSET: u8 = 2;

/// Tiles spanned horizontally by the visible area at any zoom.
const VIEW_TILES_ACROSS: f64 = 4.0;

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Longitude span (degrees) shown across the map at `zoom`.
pub fn view_span_degrees(zoom: u8) -> f64 {
    360.0 / 2.0_f64.powi(zoom.min(cluster::MAX_ZOOM) as i32) * VIEW_TILES_ACROSS
}

/// Inverse of [`view_span_degrees`]: the zoom whose view is about `span` wide.
pub fn zoom_for_span(span: f64) -> u8 {
    if !(span.is_finite() && span > 0.0) {
        return 0;
    }
    (360.0 * VIEW_TILES_ACROSS / span)
        .log2()
        .round()
        .clamp(0.0, cluster::MAX_ZOOM as f64) as u8
}

// ---------------------------------------------------------------------------
// Markers and the rendered surface
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub position: GeoPoint,
    pub magnitude: f64,
    /// Hover text: timestamp, magnitude, depth.
    pub label: String,
}

impl Marker {
    fn from_event(event: &Event, position: GeoPoint) -> Self {
        Marker {
            position,
            magnitude: event.magnitude,
            label: marker_label(event),
        }
    }
}

pub fn marker_label(event: &Event) -> String {
    let date = event
        .datetime
        .map(|t| t.format(DISPLAY_FORMAT).to_string())
        .unwrap_or_else(|| "unknown".to_string());
    format!(
        "Date: {date}\nMag: {}\nDepth: {} km",
        event.magnitude, event.depth_km
    )
}

/// Everything the map widget needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSurface {
    pub center: GeoPoint,
    pub zoom: u8,
    pub markers: Vec<Marker>,
}

impl MapSurface {
    /// Group the markers for the given display zoom.
    pub fn clusters_at(&self, zoom: u8, offset: u8) -> Vec<MarkerCluster> {
        cluster_markers(&self.markers, zoom.saturating_add(offset))
    }
}

/// Mean position of the events with both coordinates; `None` if there are none.
pub fn centroid<'e>(events: impl IntoIterator<Item = &'e Event>) -> Option<GeoPoint> {
    let (lat_sum, lon_sum, n) = events
        .into_iter()
        .filter_map(Event::position)
        .fold((0.0, 0.0, 0usize), |(la, lo, n), (lat, lon)| (la + lat, lo + lon, n + 1));
    (n > 0).then(|| GeoPoint {
        lat: lat_sum / n as f64,
        lon: lon_sum / n as f64,
    })
}

/// Turn a view into a map surface. An empty view renders nothing.
///
/// A view whose rows all lack coordinates still yields a surface, centred on
/// (0, 0) with no markers.
pub fn render(view: &FilteredView<'_>, zoom: u8) -> Option<MapSurface> {
    if view.is_empty() {
        return None;
    }

    let markers: Vec<Marker> = view
        .events()
        .filter_map(|e| {
            let (lat, lon) = e.position()?;
            Some(Marker::from_event(e, GeoPoint { lat, lon }))
        })
        .collect();

    let center = centroid(view.events()).unwrap_or(GeoPoint { lat: 0.0, lon: 0.0 });

    Some(MapSurface {
        center,
        zoom,
        markers,
    })
}
