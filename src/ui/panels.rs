use eframe::egui::{self, Color32, RichText, TextEdit, Ui};

use crate::data::chart::group_thousands;
use crate::data::filter::{PayloadRange, SiteSelection};
use crate::state::AppState;

pub const DASHBOARD_TITLE: &str = "SpaceX Launch Records Dashboard";

const TITLE_COLOR: Color32 = Color32::from_rgb(0x50, 0x3D, 0x36);

/// Slider granularity in kilograms.
const PAYLOAD_STEP: f64 = 1000.0;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the dashboard title and the record counts.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(
            RichText::new(DASHBOARD_TITLE)
                .size(40.0)
                .color(TITLE_COLOR)
                .strong(),
        );
    });

    ui.horizontal(|ui: &mut Ui| {
        ui.label(state.status_line());
    });
}

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the site dropdown and the payload range control.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    site_dropdown(ui, state);

    ui.add_space(12.0);
    payload_slider(ui, state);

    ui.add_space(12.0);
    if ui.button("Reset filters").clicked() {
        state.reset_filters();
    }
}

/// Single-select, searchable site dropdown. `All Sites` is always listed.
fn site_dropdown(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Launch site");

    let current = state.filters.site.clone();
    let mut picked: Option<SiteSelection> = None;

    egui::ComboBox::from_id_salt("site_dropdown")
        .selected_text(current.label())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            ui.add(
                TextEdit::singleline(&mut state.site_search)
                    .hint_text("Select a Launch Site"),
            );
            ui.separator();

            let all = SiteSelection::All;
            if ui.selectable_label(current == all, all.label()).clicked() {
                picked = Some(all);
            }
            for site in state.matching_sites() {
                let option = SiteSelection::from_value(site);
                if ui.selectable_label(current == option, site).clicked() {
                    picked = Some(option);
                }
            }
        });

    if let Some(site) = picked {
        log::debug!("site dropdown -> {}", site.value());
        state.site_search.clear();
        state.set_site(site);
    }
}

/// Two-handle payload range: one slider per bound, both stepping by
/// [`PAYLOAD_STEP`] inside the observed payload bounds.
fn payload_slider(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Payload range (Kg):");

    let (min, max) = (state.dataset.min_payload, state.dataset.max_payload);
    let PayloadRange { mut low, mut high } = state.filters.payload;

    let low_changed = ui
        .add(
            egui::Slider::new(&mut low, min..=max)
                .step_by(PAYLOAD_STEP)
                .text("min"),
        )
        .changed();
    let high_changed = ui
        .add(
            egui::Slider::new(&mut high, min..=max)
                .step_by(PAYLOAD_STEP)
                .text("max"),
        )
        .changed();

    // Dragging one handle past the other drags both.
    if low_changed && low > high {
        high = low;
    }
    if high_changed && high < low {
        low = high;
    }

    if low_changed || high_changed {
        state.set_payload_range(PayloadRange::new(low, high));
    }

    ui.horizontal(|ui: &mut Ui| {
        ui.weak(group_thousands(min.trunc() as i64));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
            ui.weak(group_thousands(max.trunc() as i64));
        });
    });
}
