use std::f64::consts::{FRAC_PI_2, TAU};

use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{Corner, Legend, MarkerShape, Plot, PlotPoint, PlotPoints, Points, Polygon, Text};

use crate::data::model::{COL_CLASS, COL_PAYLOAD_MASS};
use crate::state::AppState;

/// Largest wedge drawn as one polygon; egui_plot only fills convex shapes.
const MAX_WEDGE: f64 = FRAC_PI_2;

/// Arc resolution in radians.
const ARC_STEP: f64 = 0.03;

// ---------------------------------------------------------------------------
// Outcome pie (top of the central panel)
// ---------------------------------------------------------------------------

/// Render the outcome pie for the current site selection.
pub fn outcome_pie(ui: &mut Ui, state: &AppState, height: f32) {
    let pie = &state.pie;
    chart_title(ui, &pie.title);

    if pie.is_empty() {
        ui.allocate_ui(egui::vec2(ui.available_width(), height), |ui: &mut Ui| {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.weak("No launches for this selection");
            });
        });
        return;
    }

    Plot::new("success_pie_chart")
        .height(height)
        .data_aspect(1.0)
        .legend(Legend::default().position(Corner::RightTop))
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .include_x(-1.1)
        .include_x(1.1)
        .include_y(-1.1)
        .include_y(1.1)
        .show(ui, |plot_ui| {
            // Slices run clockwise from twelve o'clock.
            let mut start = FRAC_PI_2;
            for (i, slice) in pie.slices.iter().enumerate() {
                let fraction = pie.fraction(i);
                let end = start - fraction * TAU;
                let color = state.slice_colors.color_for(&slice.label);

                for wedge in wedge_outlines(start, end) {
                    plot_ui.polygon(
                        Polygon::new(wedge.into_iter().collect::<PlotPoints>())
                            .name(&slice.label)
                            .fill_color(color)
                            .width(1.0),
                    );
                }

                let mid = (start + end) / 2.0;
                plot_ui.text(Text::new(
                    PlotPoint::new(0.65 * mid.cos(), 0.65 * mid.sin()),
                    RichText::new(format!("{:.1}%", fraction * 100.0)).color(Color32::WHITE),
                ));

                start = end;
            }
        });
}

/// Outline points of the pie wedge between two angles (radians, unit
/// radius), split into convex pieces of at most [`MAX_WEDGE`].
fn wedge_outlines(start: f64, end: f64) -> Vec<Vec<[f64; 2]>> {
    let sweep = start - end;
    let pieces = (sweep / MAX_WEDGE - 1e-9).ceil().max(1.0) as usize;
    let piece_sweep = sweep / pieces as f64;

    (0..pieces)
        .map(|p| {
            let a0 = start - p as f64 * piece_sweep;
            let steps = (piece_sweep / ARC_STEP).ceil().max(1.0) as usize;
            let mut outline = Vec::with_capacity(steps + 2);
            outline.push([0.0, 0.0]);
            for s in 0..=steps {
                let a = a0 - piece_sweep * s as f64 / steps as f64;
                outline.push([a.cos(), a.sin()]);
            }
            outline
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Payload scatter (bottom of the central panel)
// ---------------------------------------------------------------------------

/// Render payload mass vs. outcome, one colour per booster category.
pub fn payload_scatter(ui: &mut Ui, state: &AppState, height: f32) {
    let chart = &state.scatter;
    chart_title(ui, &chart.title);

    Plot::new("success_payload_scatter_chart")
        .height(height)
        .legend(Legend::default().position(Corner::RightTop))
        .x_axis_label(COL_PAYLOAD_MASS)
        .y_axis_label(COL_CLASS)
        .include_x(chart.window.low)
        .include_x(chart.window.high)
        .include_y(-0.25)
        .include_y(1.25)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for series in &chart.series {
                let points = Points::new(series.points.iter().copied().collect::<PlotPoints>())
                    .name(&series.category)
                    .color(state.booster_colors.color_for(&series.category))
                    .shape(MarkerShape::Circle)
                    .filled(true)
                    .radius(4.0);
                plot_ui.points(points);
            }
        });
}

fn chart_title(ui: &mut Ui, title: &str) {
    ui.vertical_centered(|ui: &mut Ui| {
        // Keep the padding of the right-aligned payload bounds.
        ui.label(RichText::new(title).strong().monospace());
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on_unit_circle(p: [f64; 2]) -> bool {
        ((p[0] * p[0] + p[1] * p[1]).sqrt() - 1.0).abs() < 1e-9
    }

    #[test]
    fn small_wedge_is_one_piece() {
        let wedges = wedge_outlines(FRAC_PI_2, 0.0);
        assert_eq!(wedges.len(), 1);
        let w = &wedges[0];
        assert_eq!(w[0], [0.0, 0.0]);
        assert!(w[1..].iter().all(|&p| on_unit_circle(p)));
        assert!((w[1][1] - 1.0).abs() < 1e-9);
        assert!((w.last().unwrap()[0] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn full_circle_splits_into_convex_pieces() {
        let wedges = wedge_outlines(FRAC_PI_2, FRAC_PI_2 - TAU);
        assert_eq!(wedges.len(), 4);
        for w in &wedges {
            assert_eq!(w[0], [0.0, 0.0]);
            assert!(w.len() >= 3);
        }
    }
}
