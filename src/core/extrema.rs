use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::SeriesStore;

/// Location of an extremal y value: the sample's x paired with its y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesExtrema {
    pub min: BoundaryPoint,
    pub max: BoundaryPoint,
}

/// Per-series minimum/maximum over the whole dataset.
///
/// Recomputed on every load, replace, or add-series; never on a window tick.
/// Ties break to the lowest index so repeated extrema are deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtremaTable {
    entries: IndexMap<String, SeriesExtrema>,
}

impl ExtremaTable {
    /// One O(N) scan per series.
    #[must_use]
    pub fn compute(store: &SeriesStore) -> Self {
        let x_axis = store.x_axis();
        let mut entries = IndexMap::with_capacity(store.series_count());

        for (title, values) in store.iter() {
            let Some(extrema) = scan_series(x_axis, values) else {
                continue;
            };
            entries.insert(title.to_owned(), extrema);
        }

        Self { entries }
    }

    #[must_use]
    pub fn get(&self, title: &str) -> Option<SeriesExtrema> {
        self.entries.get(title).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, SeriesExtrema)> {
        self.entries
            .iter()
            .map(|(title, extrema)| (title.as_str(), *extrema))
    }
}

fn scan_series(x_axis: &[f64], values: &[f64]) -> Option<SeriesExtrema> {
    let first = *values.first()?;
    let mut min_index = 0usize;
    let mut max_index = 0usize;
    let mut min_y = OrderedFloat(first);
    let mut max_y = OrderedFloat(first);

    // Strict comparisons keep the first occurrence on ties.
    for (index, &value) in values.iter().enumerate().skip(1) {
        let value = OrderedFloat(value);
        if value < min_y {
            min_y = value;
            min_index = index;
        }
        if value > max_y {
            max_y = value;
            max_index = index;
        }
    }

    Some(SeriesExtrema {
        min: BoundaryPoint {
            x: x_axis[min_index],
            y: min_y.into_inner(),
        },
        max: BoundaryPoint {
            x: x_axis[max_index],
            y: max_y.into_inner(),
        },
    })
}
