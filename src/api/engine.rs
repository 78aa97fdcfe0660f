use tracing::{debug, warn};

use crate::core::{
    CompiledFormula, ExtremaTable, PaletteColor, SeriesExtrema, SeriesStore, TickDelta, TickToken,
    WindowCursor,
};
use crate::error::ChartResult;
use crate::ingest;

use super::{EngineConfig, RenderSnapshot, SeriesSlice};

/// Main orchestration facade consumed by host applications.
///
/// `LiveChart` owns the dataset, the extrema table, the window cursor, and
/// the active line color. It does not own a timer: the host's event loop
/// schedules ticks at the cadence carried by the [`TickToken`] returned
/// from [`start`](Self::start) and calls [`tick`](Self::tick) with it.
pub struct LiveChart {
    store: SeriesStore,
    extrema: ExtremaTable,
    cursor: WindowCursor,
    color: PaletteColor,
    config: EngineConfig,
}

impl LiveChart {
    /// Builds an engine around an already-validated store.
    pub fn new(store: SeriesStore, config: EngineConfig) -> ChartResult<Self> {
        let cursor = WindowCursor::new(&store, config.capacity, config.period)?;
        let color = config
            .color
            .as_deref()
            .map_or_else(PaletteColor::default, PaletteColor::sanitize);
        let extrema = ExtremaTable::compute(&store);

        debug!(
            samples = store.len(),
            series_count = store.series_count(),
            capacity = config.capacity,
            "engine built"
        );

        Ok(Self {
            store,
            extrema,
            cursor,
            color,
            config,
        })
    }

    /// Parses a raw delimited payload and builds an engine from it.
    pub fn from_payload(payload: &str, config: EngineConfig) -> ChartResult<Self> {
        let store = ingest::parse_payload(payload)?;
        Self::new(store, config)
    }

    /// Wholesale-replaces the dataset.
    ///
    /// The cursor is stopped before the swap so no tick can read across the
    /// replacement, and the new store is validated against the configured
    /// capacity before anything changes: on error the previous dataset,
    /// extrema, and window are fully intact. Derived series do not survive
    /// a replacement. The engine comes back stopped; call
    /// [`start`](Self::start) to resume ticking.
    pub fn load(&mut self, store: SeriesStore) -> ChartResult<()> {
        let cursor = WindowCursor::new(&store, self.config.capacity, self.cursor.period())?;

        self.cursor.stop();
        self.extrema = ExtremaTable::compute(&store);
        self.store = store;
        self.cursor = cursor;
        debug!(samples = self.store.len(), "dataset replaced");
        Ok(())
    }

    /// Parses and loads a raw payload, replacing the current dataset.
    pub fn load_payload(&mut self, payload: &str) -> ChartResult<()> {
        self.load(ingest::parse_payload(payload)?)
    }

    /// Begins periodic ticking; idempotent. The returned token must be
    /// presented with every scheduled tick.
    pub fn start(&mut self) -> TickToken {
        self.cursor.start()
    }

    /// Halts ticking; idempotent. No tick fires after this returns, even
    /// one already queued by the host scheduler.
    pub fn stop(&mut self) {
        self.cursor.stop();
    }

    /// Changes the tick cadence, invalidating the previous schedule before
    /// handing out the replacement token.
    pub fn set_period(&mut self, period: std::time::Duration) -> TickToken {
        self.cursor.set_period(period)
    }

    /// Host scheduler callback: advances the window one sample.
    ///
    /// Returns `None` for a stale token (the schedule it belongs to was
    /// stopped or reconfigured) — the host should drop that schedule.
    pub fn tick(&mut self, token: TickToken) -> Option<TickDelta> {
        self.cursor.advance(&self.store, token)
    }

    /// Re-centers the window on the sample whose rounded x matches the
    /// rounded target, stopping the cursor, and returns the one-shot
    /// full-window snapshot for the render sink.
    pub fn jump_to_x(&mut self, target: f64) -> ChartResult<RenderSnapshot> {
        self.cursor.jump_to_x(&self.store, target)?;
        Ok(self.snapshot())
    }

    /// Resizes the viewport and returns the fresh full-window snapshot.
    pub fn set_capacity(&mut self, capacity: usize) -> ChartResult<RenderSnapshot> {
        self.cursor.set_capacity(&self.store, capacity)?;
        self.config.capacity = capacity;
        Ok(self.snapshot())
    }

    /// Compiles `formula` against the declared series titles plus the
    /// x-axis title and registers the materialized series.
    ///
    /// Compilation failure, a non-finite result at any sample, a title
    /// collision, or a length mismatch rejects the whole operation with the
    /// store unmodified.
    pub fn add_derived_series(&mut self, title: &str, formula: &str) -> ChartResult<()> {
        let mut bindings = self.store.titles();
        bindings.push(self.store.x_title());
        let compiled = CompiledFormula::compile(formula, &bindings)?;

        let mut columns: Vec<&[f64]> = bindings
            .iter()
            .take(bindings.len() - 1)
            .filter_map(|binding| self.store.values(binding))
            .collect();
        columns.push(self.store.x_axis());

        let values = compiled.materialize(&columns, self.store.len())?;
        self.store.add_series(title, values)?;

        self.cursor.resync(&self.store);
        self.extrema = ExtremaTable::compute(&self.store);
        debug!(title = %title, formula = %formula, "derived series added");
        Ok(())
    }

    /// Palette-gated color change: malformed input keeps the engine usable
    /// by degrading to the default color.
    pub fn set_color(&mut self, candidate: &str) {
        let color = PaletteColor::sanitize(candidate);
        if color.as_str() != candidate {
            warn!(requested = %candidate, applied = color.as_str(), "color fell back to default");
        }
        self.color = color;
    }

    /// Renames the x-axis; the new title becomes the formula binding for
    /// the x column.
    pub fn set_x_title(&mut self, title: &str) -> ChartResult<()> {
        self.store.set_x_title(title)
    }

    /// Renames a y-series, keeping titles unique.
    pub fn set_series_title(&mut self, current: &str, title: &str) -> ChartResult<()> {
        self.store.set_series_title(current, title)?;
        self.extrema = ExtremaTable::compute(&self.store);
        Ok(())
    }

    /// Full-window snapshot of every series for a complete redraw.
    #[must_use]
    pub fn snapshot(&self) -> RenderSnapshot {
        let datasets = self
            .store
            .titles()
            .iter()
            .enumerate()
            .map(|(row, title)| SeriesSlice {
                title: (*title).to_owned(),
                values: self.cursor.row(row).unwrap_or_default(),
                color: self.color.as_str().to_owned(),
            })
            .collect();

        RenderSnapshot {
            labels: self.cursor.labels(),
            datasets,
        }
    }

    #[must_use]
    pub fn store(&self) -> &SeriesStore {
        &self.store
    }

    #[must_use]
    pub fn extrema(&self, title: &str) -> Option<SeriesExtrema> {
        self.extrema.get(title)
    }

    #[must_use]
    pub fn extrema_table(&self) -> &ExtremaTable {
        &self.extrema
    }

    #[must_use]
    pub fn color(&self) -> &str {
        self.color.as_str()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.cursor.is_running()
    }

    #[must_use]
    pub fn period(&self) -> std::time::Duration {
        self.cursor.period()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.cursor.capacity()
    }

    #[must_use]
    pub fn cursor_end(&self) -> usize {
        self.cursor.end()
    }
}
