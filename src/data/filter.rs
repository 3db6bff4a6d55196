use super::model::{LaunchDataset, LaunchRecord};

/// Dropdown value meaning "no site filter".
pub const ALL_SITES: &str = "ALL";

// ---------------------------------------------------------------------------
// Site selection
// ---------------------------------------------------------------------------

/// The dropdown value: every site, or one concrete site name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SiteSelection {
    #[default]
    All,
    Site(String),
}

impl SiteSelection {
    /// Map a raw dropdown value; the `ALL` sentinel selects every site.
    pub fn from_value(value: &str) -> Self {
        if value == ALL_SITES {
            SiteSelection::All
        } else {
            SiteSelection::Site(value.to_string())
        }
    }

    /// The raw dropdown value.
    pub fn value(&self) -> &str {
        match self {
            SiteSelection::All => ALL_SITES,
            SiteSelection::Site(s) => s,
        }
    }

    /// Label shown in the dropdown.
    pub fn label(&self) -> &str {
        match self {
            SiteSelection::All => "All Sites",
            SiteSelection::Site(s) => s,
        }
    }

    pub fn matches(&self, record: &LaunchRecord) -> bool {
        match self {
            SiteSelection::All => true,
            SiteSelection::Site(s) => record.launch_site == *s,
        }
    }
}

// ---------------------------------------------------------------------------
// Payload range
// ---------------------------------------------------------------------------

/// Inclusive payload window in kilograms, `low <= high`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayloadRange {
    pub low: f64,
    pub high: f64,
}

impl PayloadRange {
    /// Build a range, ordering the bounds.
    pub fn new(a: f64, b: f64) -> Self {
        PayloadRange {
            low: a.min(b),
            high: a.max(b),
        }
    }

    /// The observed payload range of the dataset (the slider default).
    pub fn full(dataset: &LaunchDataset) -> Self {
        PayloadRange::new(dataset.min_payload, dataset.max_payload)
    }

    /// Pull both bounds inside `[min, max]`.
    pub fn clamp_to(self, min: f64, max: f64) -> Self {
        PayloadRange::new(self.low.clamp(min, max), self.high.clamp(min, max))
    }

    /// Bounds truncated toward zero, as shown in chart titles.
    pub fn int_bounds(&self) -> (i64, i64) {
        (self.low.trunc() as i64, self.high.trunc() as i64)
    }

    /// Inclusive on both ends, compared on the exact bounds.
    pub fn contains(&self, payload_kg: f64) -> bool {
        payload_kg >= self.low && payload_kg <= self.high
    }
}

// ---------------------------------------------------------------------------
// Filter state: the current widget values
// ---------------------------------------------------------------------------

/// Everything the user can change: selected site and payload window.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub site: SiteSelection,
    pub payload: PayloadRange,
}

impl FilterState {
    /// Widget defaults: all sites, full observed payload range.
    pub fn initial(dataset: &LaunchDataset) -> Self {
        FilterState {
            site: SiteSelection::All,
            payload: PayloadRange::full(dataset),
        }
    }
}

/// Indices of records launched from the selected site(s).
pub fn site_indices(dataset: &LaunchDataset, site: &SiteSelection) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| site.matches(rec))
        .map(|(i, _)| i)
        .collect()
}

/// Indices of records passing both the site and the payload filter.
pub fn filtered_indices(dataset: &LaunchDataset, filters: &FilterState) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| filters.site.matches(rec) && filters.payload.contains(rec.payload_mass_kg))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;
    use crate::data::model::Outcome;

    fn dataset() -> LaunchDataset {
        LaunchDataset::from_records(vec![
            record("A", 0.0, Outcome::Failure, "v1.0"),
            record("A", 500.0, Outcome::Success, "FT"),
            record("B", 2500.0, Outcome::Success, "FT"),
            record("A", 5000.0, Outcome::Failure, "B4"),
            record("B", 5000.5, Outcome::Success, "B5"),
            record("A", 10000.0, Outcome::Success, "FT"),
        ])
        .unwrap()
    }

    #[test]
    fn sentinel_maps_to_all() {
        assert_eq!(SiteSelection::from_value("ALL"), SiteSelection::All);
        assert_eq!(
            SiteSelection::from_value("A"),
            SiteSelection::Site("A".to_string())
        );
        assert_eq!(SiteSelection::All.value(), ALL_SITES);
    }

    #[test]
    fn site_filter_keeps_only_that_site() {
        let ds = dataset();
        for site in &ds.sites {
            let sel = SiteSelection::Site(site.clone());
            let idx = site_indices(&ds, &sel);
            assert!(!idx.is_empty());
            assert!(idx.iter().all(|&i| ds.records[i].launch_site == *site));
        }
        assert_eq!(site_indices(&ds, &SiteSelection::All).len(), ds.len());
        assert!(site_indices(&ds, &SiteSelection::Site("Z".into())).is_empty());
    }

    #[test]
    fn initial_state_spans_observed_payloads() {
        let ds = dataset();
        let state = FilterState::initial(&ds);
        assert_eq!(state.site, SiteSelection::All);
        assert_eq!(state.payload.low, 0.0);
        assert_eq!(state.payload.high, 10000.0);
        assert_eq!(filtered_indices(&ds, &state).len(), ds.len());
    }

    #[test]
    fn site_and_window_filter_is_inclusive() {
        let ds = dataset();
        let state = FilterState {
            site: SiteSelection::Site("A".to_string()),
            payload: PayloadRange::new(500.0, 5000.0),
        };
        assert_eq!(filtered_indices(&ds, &state), vec![1, 3]);
    }

    #[test]
    fn window_membership_matches_predicate() {
        let ds = dataset();
        for (low, high) in [(0.0, 0.0), (400.0, 2600.0), (5000.0, 10000.0), (1.0, 2.0)] {
            let state = FilterState {
                site: SiteSelection::All,
                payload: PayloadRange::new(low, high),
            };
            let kept = filtered_indices(&ds, &state);
            for (i, rec) in ds.records.iter().enumerate() {
                let inside = rec.payload_mass_kg >= low && rec.payload_mass_kg <= high;
                assert_eq!(kept.contains(&i), inside, "row {i} in [{low}, {high}]");
            }
        }
    }

    #[test]
    fn fractional_bounds_compare_exactly() {
        let range = PayloadRange::new(499.9, 5000.9);
        assert_eq!(range.int_bounds(), (499, 5000));
        assert!(range.contains(5000.5));
        assert!(range.contains(5000.9));
        assert!(!range.contains(499.5));
        assert!(!range.contains(5001.0));
    }

    #[test]
    fn default_range_keeps_fractional_extremes() {
        let ds = LaunchDataset::from_records(vec![
            record("A", 362.5, Outcome::Success, "v1.1"),
            record("B", 9600.5, Outcome::Failure, "B4"),
        ])
        .unwrap();
        let state = FilterState::initial(&ds);
        assert_eq!(filtered_indices(&ds, &state), vec![0, 1]);
    }

    #[test]
    fn clamp_keeps_bounds_inside_and_ordered() {
        let r = PayloadRange::new(-50.0, 20000.0).clamp_to(0.0, 10000.0);
        assert_eq!(r, PayloadRange { low: 0.0, high: 10000.0 });

        let swapped = PayloadRange::new(8000.0, 2000.0);
        assert_eq!(swapped.low, 2000.0);
        assert_eq!(swapped.high, 8000.0);
    }
}
