use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Marker colours
// ---------------------------------------------------------------------------

/// Fill alpha for markers and clusters (0.7 opacity).
const FILL_ALPHA: u8 = 178;

/// Single event markers: red, semi-transparent.
pub const MARKER_FILL: Color32 = Color32::from_rgba_premultiplied(178, 0, 0, FILL_ALPHA);
pub const MARKER_STROKE: Color32 = Color32::RED;

/// Convert an HSL triple to an egui colour with the given alpha.
fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32, alpha: u8) -> Color32 {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    Color32::from_rgba_unmultiplied(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
        alpha,
    )
}

/// Cluster fill by member count: green for small groups, through yellow, to
/// orange for hundreds of events.
pub fn cluster_color(count: usize) -> Color32 {
    // log10 of 1..=1000 mapped onto hue 120 (green) .. 30 (orange)
    let t = ((count.max(1) as f32).log10() / 3.0).clamp(0.0, 1.0);
    let hue = 120.0 - t * 90.0;
    hsl_to_color32(hue, 0.75, 0.5, FILL_ALPHA)
}

/// Marker radius in points for a cluster of `count` members.
pub fn cluster_radius(count: usize) -> f32 {
    if count <= 1 {
        5.0
    } else {
        10.0 + 4.0 * (count as f32).log10()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_clusters_are_greener_than_large() {
        let small = cluster_color(2);
        let large = cluster_color(500);
        assert!(small.g() > small.r());
        assert!(large.r() > large.g());
    }

    #[test]
    fn single_marker_radius_is_five() {
        assert_eq!(cluster_radius(1), 5.0);
        assert!(cluster_radius(100) > cluster_radius(10));
    }
}
