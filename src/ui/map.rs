use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{MarkerShape, Plot, PlotBounds, PlotPoint, PlotPoints, Points, Text};

use crate::color::{MARKER_FILL, MARKER_STROKE, cluster_color, cluster_radius};
use crate::map::{MapSurface, MarkerCluster, view_span_degrees, zoom_for_span};
use crate::pipeline::MapFrame;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Event map (central panel)
// ---------------------------------------------------------------------------

/// Render the clustered event map, or the empty-state notice.
pub fn event_map(ui: &mut Ui, state: &mut AppState) {
    let recenter = std::mem::take(&mut state.recenter_map);
    let offset = state.config.cluster_zoom_offset;

    let surface = match &state.frame.map {
        MapFrame::Surface(surface) => surface,
        MapFrame::Empty => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.label(RichText::new("No events found.").heading().color(Color32::GRAY));
            });
            return;
        }
    };

    let response = Plot::new("event_map")
        .data_aspect(1.0)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .show_x(false)
        .show_y(false)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            if recenter {
                plot_ui.set_plot_bounds(initial_bounds(surface));
            }

            let zoom = zoom_for_span(plot_ui.plot_bounds().width());
            let clusters = surface.clusters_at(zoom, offset);

            let singles: Vec<[f64; 2]> = clusters
                .iter()
                .filter(|c| c.is_single())
                .map(|c| [c.position.lon, c.position.lat])
                .collect();
            if !singles.is_empty() {
                plot_ui.points(
                    Points::new(PlotPoints::from(singles.clone()))
                        .shape(MarkerShape::Circle)
                        .radius(cluster_radius(1))
                        .color(MARKER_FILL)
                        .filled(true)
                        .name("Event"),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(singles))
                        .shape(MarkerShape::Circle)
                        .radius(cluster_radius(1))
                        .color(MARKER_STROKE)
                        .filled(false),
                );
            }

            for cluster in clusters.iter().filter(|c| !c.is_single()) {
                let at = [cluster.position.lon, cluster.position.lat];
                plot_ui.points(
                    Points::new(PlotPoints::from(vec![at]))
                        .shape(MarkerShape::Circle)
                        .radius(cluster_radius(cluster.len()))
                        .color(cluster_color(cluster.len()))
                        .filled(true)
                        .name("Cluster"),
                );
                plot_ui.text(Text::new(
                    PlotPoint::new(at[0], at[1]),
                    RichText::new(cluster.len().to_string())
                        .strong()
                        .color(Color32::BLACK),
                ));
            }

            hovered_label(plot_ui, surface, &clusters)
        });

    if let Some(label) = response.inner {
        response.response.on_hover_text_at_pointer(label);
    }
}

/// Bounds showing the surface's centre at its initial zoom.
fn initial_bounds(surface: &MapSurface) -> PlotBounds {
    let half_lon = view_span_degrees(surface.zoom) / 2.0;
    let half_lat = half_lon / 2.0;
    let c = surface.center;
    PlotBounds::from_min_max(
        [c.lon - half_lon, c.lat - half_lat],
        [c.lon + half_lon, c.lat + half_lat],
    )
}

/// Text for the marker or cluster under the pointer, if any.
fn hovered_label(
    plot_ui: &egui_plot::PlotUi,
    surface: &MapSurface,
    clusters: &[MarkerCluster],
) -> Option<String> {
    let pointer = plot_ui.response().hover_pos()?;

    let (cluster, _) = clusters
        .iter()
        .map(|c| {
            let pos = plot_ui.screen_from_plot(PlotPoint::new(c.position.lon, c.position.lat));
            (c, pos.distance(pointer))
        })
        .filter(|(c, dist)| *dist <= cluster_radius(c.len()) + 2.0)
        .min_by(|a, b| a.1.total_cmp(&b.1))?;

    if cluster.is_single() {
        Some(surface.markers[cluster.members[0]].label.clone())
    } else {
        Some(format!("{} events\nZoom in to separate them", cluster.len()))
    }
}
