use serde::{Deserialize, Serialize};

/// One series slice inside a full-redraw snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSlice {
    pub title: String,
    pub values: Vec<f64>,
    pub color: String,
}

/// Full-redraw payload for the render sink: the visible window of every
/// series plus its x labels.
///
/// Serializable so hosts can hand it to an out-of-process renderer without
/// inventing their own wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub labels: Vec<f64>,
    pub datasets: Vec<SeriesSlice>,
}

impl RenderSnapshot {
    /// Number of visible samples; every dataset slice has the same length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
