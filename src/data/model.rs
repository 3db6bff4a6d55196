use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Column names of the launch table
// ---------------------------------------------------------------------------

pub const COL_LAUNCH_SITE: &str = "Launch Site";
pub const COL_PAYLOAD_MASS: &str = "Payload Mass (kg)";
pub const COL_CLASS: &str = "class";
pub const COL_BOOSTER_CATEGORY: &str = "Booster Version Category";

/// Columns every input file must provide.
pub const REQUIRED_COLUMNS: [&str; 4] = [
    COL_LAUNCH_SITE,
    COL_PAYLOAD_MASS,
    COL_CLASS,
    COL_BOOSTER_CATEGORY,
];

// ---------------------------------------------------------------------------
// Schema errors
// ---------------------------------------------------------------------------

/// Reasons a launch table is rejected at startup.
#[derive(Debug, Error, PartialEq)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("row {row}: column '{column}' has invalid value '{value}'")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("row {row}: outcome class must be 0 or 1, got '{value}'")]
    InvalidClass { row: usize, value: String },

    #[error("dataset contains no launch records")]
    Empty,
}

// ---------------------------------------------------------------------------
// Outcome – the binary `class` column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Outcome {
    Failure,
    Success,
}

impl Outcome {
    /// Interpret a raw `class` value. Integral floats (`1.0`) are accepted
    /// since Pandas writes them when the column ever held a NaN.
    pub fn from_class(value: f64) -> Option<Self> {
        if value == 0.0 {
            Some(Outcome::Failure)
        } else if value == 1.0 {
            Some(Outcome::Success)
        } else {
            None
        }
    }

    /// Parse the textual form found in CSV cells.
    pub fn parse(s: &str) -> Option<Self> {
        s.trim().parse::<f64>().ok().and_then(Self::from_class)
    }

    /// The 0/1 value plotted on the scatter's y axis.
    pub fn class(self) -> u8 {
        match self {
            Outcome::Failure => 0,
            Outcome::Success => 1,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "Success (1)"),
            Outcome::Failure => write!(f, "Failure (0)"),
        }
    }
}

// ---------------------------------------------------------------------------
// LaunchRecord – one row of the table
// ---------------------------------------------------------------------------

/// A single launch attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRecord {
    pub launch_site: String,
    /// Payload mass in kilograms.
    pub payload_mass_kg: f64,
    pub outcome: Outcome,
    pub booster_category: String,
}

// ---------------------------------------------------------------------------
// LaunchDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed table with the summary values the widgets are built from.
#[derive(Debug, Clone)]
pub struct LaunchDataset {
    pub records: Vec<LaunchRecord>,
    /// Distinct launch sites in order of first appearance.
    pub sites: Vec<String>,
    /// Distinct booster version categories in order of first appearance.
    pub booster_categories: Vec<String>,
    pub min_payload: f64,
    pub max_payload: f64,
}

impl LaunchDataset {
    /// Compute the derived columns. An empty table has no payload bounds and
    /// is rejected.
    pub fn from_records(records: Vec<LaunchRecord>) -> Result<Self, LoadError> {
        if records.is_empty() {
            return Err(LoadError::Empty);
        }

        let mut sites: Vec<String> = Vec::new();
        let mut booster_categories: Vec<String> = Vec::new();
        let mut min_payload = f64::INFINITY;
        let mut max_payload = f64::NEG_INFINITY;

        for rec in &records {
            if !sites.contains(&rec.launch_site) {
                sites.push(rec.launch_site.clone());
            }
            if !booster_categories.contains(&rec.booster_category) {
                booster_categories.push(rec.booster_category.clone());
            }
            min_payload = min_payload.min(rec.payload_mass_kg);
            max_payload = max_payload.max(rec.payload_mass_kg);
        }

        Ok(LaunchDataset {
            records,
            sites,
            booster_categories,
            min_payload,
            max_payload,
        })
    }

    /// Number of launch records.
    pub fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(site: &str, payload: f64, outcome: Outcome, booster: &str) -> LaunchRecord {
        LaunchRecord {
            launch_site: site.to_string(),
            payload_mass_kg: payload,
            outcome,
            booster_category: booster.to_string(),
        }
    }

    #[test]
    fn summary_values_follow_first_appearance() {
        let ds = LaunchDataset::from_records(vec![
            record("B", 500.0, Outcome::Success, "v1.1"),
            record("A", 9600.0, Outcome::Failure, "FT"),
            record("B", 0.0, Outcome::Success, "v1.1"),
        ])
        .unwrap();

        assert_eq!(ds.sites, vec!["B", "A"]);
        assert_eq!(ds.booster_categories, vec!["v1.1", "FT"]);
        assert_eq!(ds.min_payload, 0.0);
        assert_eq!(ds.max_payload, 9600.0);
        assert_eq!(ds.len(), 3);
    }

    #[test]
    fn empty_table_is_rejected() {
        assert_eq!(
            LaunchDataset::from_records(Vec::new()).unwrap_err(),
            LoadError::Empty
        );
    }

    #[test]
    fn outcome_accepts_integral_floats_only() {
        assert_eq!(Outcome::parse("1"), Some(Outcome::Success));
        assert_eq!(Outcome::parse("0.0"), Some(Outcome::Failure));
        assert_eq!(Outcome::parse(" 1 "), Some(Outcome::Success));
        assert_eq!(Outcome::parse("2"), None);
        assert_eq!(Outcome::parse("yes"), None);
        assert_eq!(Outcome::Success.class(), 1);
    }
}
