//! Marker clustering on the Web Mercator tile grid.
//!
//! Markers falling in the same tile at the clustering zoom level are drawn as
//! one cluster placed at the mean position of its members.

use std::collections::HashMap;
use std::f64::consts::PI;

use super::{GeoPoint, Marker};

/// Web Mercator valid latitude range
pub const MIN_LAT: f64 = -85.05112878;
pub const MAX_LAT: f64 = 85.05112878;

pub const MAX_ZOOM: u8 = 18;

/// Tile coordinates in the Slippy Map system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    /// Y coordinate (north-south), 0 at north
    pub row: u32,
    /// X coordinate (east-west), 0 at west
    pub col: u32,
    pub zoom: u8,
}

/// Tile containing a point. Latitudes beyond the Mercator limit and
/// out-of-range longitudes are clamped onto the grid edge instead of failing.
pub fn tile_for(point: GeoPoint, zoom: u8) -> TileCoord {
    let zoom = zoom.min(MAX_ZOOM);
    let n = 2.0_f64.powi(zoom as i32);
    let max_index = n - 1.0;

    let lat = point.lat.clamp(MIN_LAT, MAX_LAT);
    let lon = point.lon.clamp(-180.0, 180.0);

    let col = ((lon + 180.0) / 360.0 * n).floor().clamp(0.0, max_index) as u32;

    let lat_rad = lat * PI / 180.0;
    let row = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n)
        .floor()
        .clamp(0.0, max_index) as u32;

    TileCoord { row, col, zoom }
}

// ---------------------------------------------------------------------------
// Clusters
// ---------------------------------------------------------------------------

/// A group of nearby markers. A cluster of one is drawn as a plain marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerCluster {
    pub tile: TileCoord,
    /// Mean position of the members.
    pub position: GeoPoint,
    /// Indices into the marker slice the cluster was built from.
    pub members: Vec<usize>,
}

impl MarkerCluster {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_single(&self) -> bool {
        self.members.len() == 1
    }
}

/// Group markers by tile at `zoom`.
///
/// Clusters come out in the order their first member appears in `markers`,
/// and members keep their marker order.
pub fn cluster_markers(markers: &[Marker], zoom: u8) -> Vec<MarkerCluster> {
    let mut slot_of: HashMap<TileCoord, usize> = HashMap::new();
    let mut clusters: Vec<MarkerCluster> = Vec::new();
    let mut sums: Vec<(f64, f64)> = Vec::new();

    for (i, marker) in markers.iter().enumerate() {
        let tile = tile_for(marker.position, zoom);
        let slot = *slot_of.entry(tile).or_insert_with(|| {
            clusters.push(MarkerCluster {
                tile,
                position: marker.position,
                members: Vec::new(),
            });
            sums.push((0.0, 0.0));
            clusters.len() - 1
        });
        clusters[slot].members.push(i);
        sums[slot].0 += marker.position.lat;
        sums[slot].1 += marker.position.lon;
    }

    for (cluster, (lat_sum, lon_sum)) in clusters.iter_mut().zip(sums) {
        let n = cluster.members.len() as f64;
        cluster.position = GeoPoint {
            lat: lat_sum / n,
            lon: lon_sum / n,
        };
    }
    clusters
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(lat: f64, lon: f64) -> Marker {
        Marker {
            position: GeoPoint { lat, lon },
            magnitude: 4.0,
            label: String::new(),
        }
    }

    #[test]
    fn london_at_zoom_10() {
        let tile = tile_for(GeoPoint { lat: 51.5074, lon: -0.1278 }, 10);
        assert_eq!((tile.row, tile.col, tile.zoom), (340, 511, 10));
    }

    #[test]
    fn equator_prime_meridian_at_zoom_1() {
        let tile = tile_for(GeoPoint { lat: 0.0, lon: 0.0 }, 1);
        assert_eq!((tile.row, tile.col), (1, 1));
    }

    #[test]
    fn poles_and_antimeridian_clamp_to_grid() {
        let n = tile_for(GeoPoint { lat: 90.0, lon: 180.0 }, 3);
        assert_eq!((n.row, n.col), (0, 7));
        let s = tile_for(GeoPoint { lat: -90.0, lon: -180.0 }, 3);
        assert_eq!((s.row, s.col), (7, 0));
    }

    #[test]
    fn nearby_markers_share_a_cluster() {
        let markers = vec![
            marker(7.10, 126.60),
            marker(14.10, 120.90),
            marker(7.12, 126.62),
        ];
        let clusters = cluster_markers(&markers, 6);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].members, vec![0, 2]);
        assert!((clusters[0].position.lat - 7.11).abs() < 1e-9);
        assert!((clusters[0].position.lon - 126.61).abs() < 1e-9);
        assert!(clusters[1].is_single());
    }

    #[test]
    fn deep_zoom_separates_markers() {
        let markers = vec![marker(7.10, 126.60), marker(7.12, 126.62)];
        assert_eq!(cluster_markers(&markers, 2).len(), 1);
        assert_eq!(cluster_markers(&markers, 16).len(), 2);
    }

    #[test]
    fn no_markers_no_clusters() {
        assert!(cluster_markers(&[], 6).is_empty());
    }
}
