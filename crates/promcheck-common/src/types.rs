use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Classification of one rule evaluation result.
///
/// `Silent` applies once per rule, when the query returned no series at all.
/// Every returned series classifies as either `Pending` (seen, but not yet
/// sustained for the rule's `for` duration) or `Firing`.
///
/// # Examples
///
/// ```
/// use promcheck_common::types::AlertState;
///
/// let state: AlertState = "firing".parse().unwrap();
/// assert_eq!(state, AlertState::Firing);
/// assert_eq!(state.to_string(), "FIRING");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertState {
    Silent,
    Pending,
    Firing,
}

impl std::fmt::Display for AlertState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertState::Silent => write!(f, "SILENT"),
            AlertState::Pending => write!(f, "PENDING"),
            AlertState::Firing => write!(f, "FIRING"),
        }
    }
}

impl std::str::FromStr for AlertState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SILENT" => Ok(AlertState::Silent),
            "PENDING" => Ok(AlertState::Pending),
            "FIRING" => Ok(AlertState::Firing),
            _ => Err(format!("unknown alert state: {s}")),
        }
    }
}

/// One (timestamp, value) pair of a time series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// One labeled time series returned for a rule's query expression.
///
/// Samples are chronological as returned by the range query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    #[serde(default)]
    pub labels: HashMap<String, String>,
    #[serde(default)]
    pub samples: Vec<Sample>,
}

impl Series {
    /// Time between the earliest and latest sample. Zero when the series
    /// holds fewer than two samples.
    pub fn elapsed(&self) -> Duration {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) if self.samples.len() >= 2 => {
                last.timestamp - first.timestamp
            }
            _ => Duration::zero(),
        }
    }

    /// Value of the most recent sample, if any.
    pub fn latest_value(&self) -> Option<f64> {
        self.samples.last().map(|s| s.value)
    }
}

/// The full set of series returned for one rule over one query window.
pub type Matrix = Vec<Series>;

/// Per-series evaluation output: where the series sits relative to the
/// rule's `for` threshold, plus rendered annotations when firing.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertResult {
    pub labels: HashMap<String, String>,
    pub elapsed: Duration,
    pub state: AlertState,
    /// Rendered annotation strings; empty unless `state` is `Firing`.
    pub annotations: HashMap<String, String>,
}

/// Format a label set the way Prometheus prints a metric: `{a="b", c="d"}`
/// with keys sorted, `{}` for the empty set.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use promcheck_common::types::format_labels;
///
/// let mut labels = HashMap::new();
/// labels.insert("job".to_string(), "api".to_string());
/// labels.insert("instance".to_string(), "web-01".to_string());
/// assert_eq!(format_labels(&labels), r#"{instance="web-01", job="api"}"#);
/// ```
pub fn format_labels(labels: &HashMap<String, String>) -> String {
    let mut pairs: Vec<String> = labels
        .iter()
        .map(|(k, v)| format!("{k}=\"{v}\""))
        .collect();
    pairs.sort();
    format!("{{{}}}", pairs.join(", "))
}
