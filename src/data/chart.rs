use super::filter::{filtered_indices, site_indices, FilterState, PayloadRange, SiteSelection};
use super::model::LaunchDataset;

// ---------------------------------------------------------------------------
// Outcome summary (pie chart)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub count: usize,
}

/// Chart model for the outcome pie; rendering lives in `ui::plot`.
#[derive(Debug, Clone, PartialEq)]
pub struct PieChart {
    pub title: String,
    pub slices: Vec<PieSlice>,
}

impl PieChart {
    pub fn total(&self) -> usize {
        self.slices.iter().map(|s| s.count).sum()
    }

    /// Share of slice `i` in the whole pie, 0.0 for an empty chart.
    pub fn fraction(&self, i: usize) -> f64 {
        let total = self.total();
        match self.slices.get(i) {
            Some(slice) if total > 0 => slice.count as f64 / total as f64,
            _ => 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Build the outcome pie for the selected site.
///
/// * `All` → launch counts grouped by site over the whole table.
/// * A site → success vs. failure counts for that site only. A site that is
///   not in the table yields an empty pie.
pub fn outcome_summary(dataset: &LaunchDataset, site: &SiteSelection) -> PieChart {
    let rows = site_indices(dataset, site);

    let (title, labels): (String, Vec<String>) = match site {
        SiteSelection::All => (
            "Success vs. Failed Launches for All Sites".to_string(),
            rows.iter()
                .map(|&i| dataset.records[i].launch_site.clone())
                .collect(),
        ),
        SiteSelection::Site(name) => (
            format!("Success vs. Failed Launches for {name}"),
            rows.iter()
                .map(|&i| dataset.records[i].outcome.to_string())
                .collect(),
        ),
    };

    PieChart {
        title,
        slices: count_in_order(labels),
    }
}

/// Count labels, keeping the order in which each label first appears.
fn count_in_order(labels: Vec<String>) -> Vec<PieSlice> {
    let mut slices: Vec<PieSlice> = Vec::new();
    for label in labels {
        match slices.iter_mut().find(|s| s.label == label) {
            Some(slice) => slice.count += 1,
            None => slices.push(PieSlice { label, count: 1 }),
        }
    }
    slices
}

// ---------------------------------------------------------------------------
// Payload correlation (scatter chart)
// ---------------------------------------------------------------------------

/// All points of one booster version category: `[payload_kg, class]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub category: String,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterChart {
    pub title: String,
    pub series: Vec<ScatterSeries>,
    /// The payload window the chart was built for.
    pub window: PayloadRange,
}

impl ScatterChart {
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }
}

/// Build the payload-vs-outcome scatter for the current filters, one series
/// per booster version category.
pub fn payload_correlation(dataset: &LaunchDataset, filters: &FilterState) -> ScatterChart {
    log::debug!(
        "Params: {} [{}, {}]",
        filters.site.value(),
        filters.payload.low,
        filters.payload.high
    );

    let rows = filtered_indices(dataset, filters);

    let series = dataset
        .booster_categories
        .iter()
        .filter_map(|category| {
            let points: Vec<[f64; 2]> = rows
                .iter()
                .map(|&i| &dataset.records[i])
                .filter(|rec| rec.booster_category == *category)
                .map(|rec| [rec.payload_mass_kg, rec.outcome.class() as f64])
                .collect();
            (!points.is_empty()).then(|| ScatterSeries {
                category: category.clone(),
                points,
            })
        })
        .collect();

    ScatterChart {
        title: scatter_title(&filters.site, &filters.payload),
        series,
        window: filters.payload,
    }
}

fn scatter_title(site: &SiteSelection, range: &PayloadRange) -> String {
    let (low, high) = range.int_bounds();
    let prefix = match site {
        SiteSelection::All => "All sites".to_string(),
        SiteSelection::Site(name) => format!("Site {name}"),
    };
    format!(
        "{prefix} - payload mass between {:>8}kg and {:>8}kg",
        group_thousands(low),
        group_thousands(high)
    )
}

/// `9600` → `"9,600"`.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
