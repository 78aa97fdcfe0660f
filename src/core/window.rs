use std::collections::VecDeque;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::core::SeriesStore;
use crate::error::{ChartError, ChartResult};

/// Proof that a scheduled tick belongs to the current cursor configuration.
///
/// Every state change (stop, cadence, jump, capacity, replace) bumps the
/// cursor epoch; a tick presented with a stale token is dropped, so no
/// snapshot with a stale cursor or capacity is emitted after a change
/// request returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickToken {
    pub(crate) epoch: u64,
    pub period: Duration,
}

/// Incremental update emitted on each tick: one appended label plus one
/// appended value per series, in declared series order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickDelta {
    pub append_label: f64,
    pub append_values: SmallVec<[f64; 4]>,
}

/// Fixed-capacity viewport cycling over a [`SeriesStore`].
///
/// The retained window is backed by one `VecDeque` per series so a tick is
/// pop-front + push-back, O(1) amortized. The cursor never owns the store;
/// callers pass it in and must not replace it while the cursor is attached.
#[derive(Debug, Clone)]
pub struct WindowCursor {
    end: usize,
    capacity: usize,
    len: usize,
    period: Duration,
    running: bool,
    epoch: u64,
    labels: VecDeque<f64>,
    rows: Vec<VecDeque<f64>>,
}

impl WindowCursor {
    /// Attaches a cursor with the window pre-filled by the first `capacity`
    /// samples, so the first tick advances past the filled region.
    pub fn new(store: &SeriesStore, capacity: usize, period: Duration) -> ChartResult<Self> {
        validate_capacity(capacity, store.len())?;

        let mut cursor = Self {
            end: capacity - 1,
            capacity,
            len: store.len(),
            period,
            running: false,
            epoch: 0,
            labels: VecDeque::with_capacity(capacity),
            rows: Vec::new(),
        };
        cursor.rebuild(store);
        Ok(cursor)
    }

    /// Begins ticking. Idempotent: starting a running cursor returns the
    /// already-scheduled token so exactly one recurring tick exists.
    pub fn start(&mut self) -> TickToken {
        if !self.running {
            self.running = true;
            debug!(period_ms = self.period.as_millis() as u64, "cursor started");
        }
        self.token()
    }

    /// Halts ticking. Idempotent; bumps the epoch so a tick already queued
    /// with the previous token is dropped rather than delivered late.
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.epoch += 1;
            debug!("cursor stopped");
        }
    }

    /// Changes the tick cadence, stop-then-restart atomically: the old
    /// schedule's token goes stale before the new one is handed out.
    pub fn set_period(&mut self, period: Duration) -> TickToken {
        self.epoch += 1;
        self.period = period;
        self.running = true;
        debug!(period_ms = period.as_millis() as u64, "cursor cadence changed");
        self.token()
    }

    /// Advances the cursor one sample, wrapping past the last index to 0,
    /// and returns the delta for an incremental redraw.
    ///
    /// Returns `None` when the cursor is stopped or `token` predates the
    /// latest state change.
    pub fn advance(&mut self, store: &SeriesStore, token: TickToken) -> Option<TickDelta> {
        if !self.running || token.epoch != self.epoch {
            trace!(stale = token.epoch != self.epoch, "tick dropped");
            return None;
        }

        self.end = (self.end + 1) % self.len;
        let label = store.x_axis()[self.end];
        self.labels.pop_front();
        self.labels.push_back(label);

        let mut values = SmallVec::with_capacity(self.rows.len());
        for (row, (_, series)) in self.rows.iter_mut().zip(store.iter()) {
            let value = series[self.end];
            row.pop_front();
            row.push_back(value);
            values.push(value);
        }

        Some(TickDelta {
            append_label: label,
            append_values: values,
        })
    }

    /// Re-centers the window on the sample whose rounded x equals the
    /// rounded target. Stops the cursor first so the jump cannot race a
    /// queued tick; on `ValueNotFound` the window is left untouched.
    pub fn jump_to_x(&mut self, store: &SeriesStore, target: f64) -> ChartResult<()> {
        let rounded = target.round();
        let index = store
            .x_axis()
            .iter()
            .position(|x| x.round() == rounded)
            .ok_or(ChartError::ValueNotFound(target))?;

        self.stop();
        self.epoch += 1;
        // Put the match at the window midpoint, clamped so the window still
        // holds exactly `capacity` samples inside the store.
        self.end = (index + self.capacity / 2).clamp(self.capacity - 1, self.len - 1);
        self.rebuild(store);
        debug!(target, index, end = self.end, "cursor re-centered");
        Ok(())
    }

    /// Resizes the viewport and rebuilds the retained window at the current
    /// cursor position. Outstanding tokens go stale; a host that keeps
    /// ticking re-fetches one via [`start`](Self::start) or
    /// [`token`](Self::token).
    pub fn set_capacity(&mut self, store: &SeriesStore, capacity: usize) -> ChartResult<()> {
        validate_capacity(capacity, self.len)?;
        self.epoch += 1;
        self.capacity = capacity;
        self.rebuild(store);
        debug!(capacity, end = self.end, "viewport resized");
        Ok(())
    }

    /// Re-reads the retained window after the store gained or renamed a
    /// series. Invalidates any outstanding token; cursor position and
    /// capacity are preserved.
    pub fn resync(&mut self, store: &SeriesStore) {
        self.epoch += 1;
        self.rebuild(store);
    }

    #[must_use]
    pub fn token(&self) -> TickToken {
        TickToken {
            epoch: self.epoch,
            period: self.period,
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Retained x labels, oldest first.
    #[must_use]
    pub fn labels(&self) -> Vec<f64> {
        self.labels.iter().copied().collect()
    }

    /// Retained values for the series at `row`, oldest first.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<Vec<f64>> {
        self.rows.get(row).map(|r| r.iter().copied().collect())
    }

    // O(capacity) rebuild, used only by one-shot operations (attach, jump,
    // resize) — the tick path never calls this.
    fn rebuild(&mut self, store: &SeriesStore) {
        let take = |series: &[f64]| {
            (0..self.capacity)
                .map(|k| {
                    let back = self.capacity - 1 - k;
                    let index = (self.end + self.len - back) % self.len;
                    series[index]
                })
                .collect::<VecDeque<f64>>()
        };

        self.labels = take(store.x_axis());
        self.rows = store.iter().map(|(_, series)| take(series)).collect();
    }
}

fn validate_capacity(capacity: usize, len: usize) -> ChartResult<()> {
    if capacity == 0 || capacity > len {
        return Err(ChartError::InvalidCapacity {
            requested: capacity,
            len,
        });
    }
    Ok(())
}
