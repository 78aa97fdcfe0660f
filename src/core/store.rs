use indexmap::IndexMap;
use tracing::debug;

use crate::error::{ChartError, ChartResult};

/// One named y-series handed to [`SeriesStore::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesInput {
    pub title: String,
    pub values: Vec<f64>,
}

impl SeriesInput {
    #[must_use]
    pub fn new(title: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            title: title.into(),
            values,
        }
    }
}

/// Parsed dataset: one x-axis plus N named y-series of equal length.
///
/// The store is replaced wholesale on every file load; it is never mutated
/// while a window cursor is reading it. Series keep insertion order because
/// the formula evaluator binds variables by declared position.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStore {
    x_title: String,
    x_axis: Vec<f64>,
    series: IndexMap<String, Vec<f64>>,
}

impl SeriesStore {
    /// Validates lengths and builds a fresh store.
    ///
    /// Any series whose value count differs from the x-axis fails the whole
    /// construction with [`ChartError::LengthMismatch`]; nothing is created.
    pub fn new(
        x_title: impl Into<String>,
        x_axis: Vec<f64>,
        series: Vec<SeriesInput>,
    ) -> ChartResult<Self> {
        if x_axis.is_empty() {
            return Err(ChartError::EmptyDataset);
        }

        let x_title = x_title.into();
        let expected = x_axis.len();
        let mut map = IndexMap::with_capacity(series.len());
        for entry in series {
            if entry.values.len() != expected {
                return Err(ChartError::LengthMismatch {
                    title: entry.title,
                    expected,
                    actual: entry.values.len(),
                });
            }
            // A series shadowing the x-axis title would hijack the x binding
            // in formulas; the same collision rule as add_series applies here.
            if entry.title == x_title {
                return Err(ChartError::DuplicateTitle(entry.title));
            }
            if map.insert(entry.title.clone(), entry.values).is_some() {
                return Err(ChartError::DuplicateTitle(entry.title));
            }
        }

        debug!(
            samples = expected,
            series_count = map.len(),
            "series store built"
        );

        Ok(Self {
            x_title,
            x_axis,
            series: map,
        })
    }

    /// Registers a new series, validating length and title uniqueness first.
    ///
    /// On failure the store is untouched; a collision never overwrites.
    pub fn add_series(&mut self, title: impl Into<String>, values: Vec<f64>) -> ChartResult<()> {
        let title = title.into();
        if self.series.contains_key(&title) || title == self.x_title {
            return Err(ChartError::DuplicateTitle(title));
        }
        if values.len() != self.x_axis.len() {
            return Err(ChartError::LengthMismatch {
                title,
                expected: self.x_axis.len(),
                actual: values.len(),
            });
        }

        debug!(title = %title, samples = values.len(), "series added");
        self.series.insert(title, values);
        Ok(())
    }

    /// Renames a series, preserving its position and keeping titles unique.
    pub fn set_series_title(&mut self, current: &str, title: impl Into<String>) -> ChartResult<()> {
        let title = title.into();
        let index = self
            .series
            .get_index_of(current)
            .ok_or_else(|| ChartError::UnknownSeries(current.to_owned()))?;
        if title == current {
            return Ok(());
        }
        if self.series.contains_key(&title) || title == self.x_title {
            return Err(ChartError::DuplicateTitle(title));
        }

        let values = self.series.shift_remove(current).unwrap_or_default();
        self.series.shift_insert(index, title, values);
        Ok(())
    }

    /// Renames the x-axis, keeping titles unique.
    pub fn set_x_title(&mut self, title: impl Into<String>) -> ChartResult<()> {
        let title = title.into();
        if self.series.contains_key(&title) {
            return Err(ChartError::DuplicateTitle(title));
        }
        self.x_title = title;
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.x_axis.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x_axis.is_empty()
    }

    #[must_use]
    pub fn x_title(&self) -> &str {
        &self.x_title
    }

    #[must_use]
    pub fn x_axis(&self) -> &[f64] {
        &self.x_axis
    }

    #[must_use]
    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    /// Series titles in declared order; this order defines formula bindings.
    #[must_use]
    pub fn titles(&self) -> Vec<&str> {
        self.series.keys().map(String::as_str).collect()
    }

    #[must_use]
    pub fn values(&self, title: &str) -> Option<&[f64]> {
        self.series.get(title).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.series
            .iter()
            .map(|(title, values)| (title.as_str(), values.as_slice()))
    }
}
