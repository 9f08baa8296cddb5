//! Observation options
//!
//! Threshold and root margin are handed to the platform untouched. Only
//! the platform decides whether they are valid.

use serde::{Deserialize, Serialize};

/// Visibility-detection options for a single observer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverOptions {
    /// Visible fractions at which the platform reports a change
    pub threshold: Vec<f64>,
    /// CSS margin applied around the viewport, e.g. `"200px"` or `"10% 0px"`
    pub root_margin: String,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            threshold: vec![0.0],
            root_margin: "0px".to_string(),
        }
    }
}

impl ObserverOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a single threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = vec![threshold];
        self
    }

    pub fn with_thresholds(mut self, thresholds: impl Into<Vec<f64>>) -> Self {
        self.threshold = thresholds.into();
        self
    }

    pub fn with_root_margin(mut self, root_margin: impl Into<String>) -> Self {
        self.root_margin = root_margin.into();
        self
    }
}
