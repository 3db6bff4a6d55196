use crate::color::ColorMap;
use crate::data::chart::{outcome_summary, payload_correlation, PieChart, ScatterChart};
use crate::data::filter::{FilterState, PayloadRange, SiteSelection};
use crate::data::model::{LaunchDataset, Outcome};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// Widget changes go through the setters, which recompute only the charts
/// that depend on the changed value.
pub struct AppState {
    /// Launch table loaded at startup; never mutated.
    pub dataset: LaunchDataset,

    /// Current dropdown and slider values.
    pub filters: FilterState,

    /// Cached outcome pie for `filters.site`.
    pub pie: PieChart,

    /// Cached payload scatter for `filters`.
    pub scatter: ScatterChart,

    /// Colours for pie slices (sites and outcomes).
    pub slice_colors: ColorMap,

    /// Colours for scatter series (booster version categories).
    pub booster_colors: ColorMap,

    /// Text typed into the searchable site dropdown.
    pub site_search: String,
}

impl AppState {
    /// Ingest the dataset, set widget defaults and compute both charts.
    pub fn new(dataset: LaunchDataset) -> Self {
        let filters = FilterState::initial(&dataset);
        let pie = outcome_summary(&dataset, &filters.site);
        let scatter = payload_correlation(&dataset, &filters);

        let outcome_labels = [Outcome::Success.to_string(), Outcome::Failure.to_string()];
        let slice_colors = ColorMap::new(
            dataset
                .sites
                .iter()
                .chain(&outcome_labels)
                .map(String::as_str),
        );
        let booster_colors = ColorMap::new(dataset.booster_categories.iter().map(String::as_str));

        Self {
            dataset,
            filters,
            pie,
            scatter,
            slice_colors,
            booster_colors,
            site_search: String::new(),
        }
    }

    /// Dropdown changed: both charts depend on the site.
    pub fn set_site(&mut self, site: SiteSelection) {
        if site == self.filters.site {
            return;
        }
        self.filters.site = site;
        self.pie = outcome_summary(&self.dataset, &self.filters.site);
        self.scatter = payload_correlation(&self.dataset, &self.filters);
    }

    /// Slider changed: only the scatter depends on the payload window.
    /// The range is clamped to the observed payload bounds.
    pub fn set_payload_range(&mut self, range: PayloadRange) {
        let range = range.clamp_to(self.dataset.min_payload, self.dataset.max_payload);
        if range == self.filters.payload {
            return;
        }
        self.filters.payload = range;
        self.scatter = payload_correlation(&self.dataset, &self.filters);
    }

    /// Reset both widgets to their defaults.
    pub fn reset_filters(&mut self) {
        self.set_site(SiteSelection::All);
        self.set_payload_range(PayloadRange::full(&self.dataset));
    }

    /// Header summary; the shown count is the scatter after both filters.
    pub fn status_line(&self) -> String {
        format!(
            "{} launches loaded, {} shown",
            self.dataset.len(),
            self.scatter.point_count()
        )
    }

    /// Sites whose name contains the dropdown search text (case-insensitive).
    pub fn matching_sites(&self) -> Vec<&str> {
        let needle = self.site_search.trim().to_lowercase();
        self.dataset
            .sites
            .iter()
            .map(String::as_str)
            .filter(|site| needle.is_empty() || site.to_lowercase().contains(&needle))
            .collect()
    }
}
