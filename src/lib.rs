//! livechart: streaming multi-series windowing engine.
//!
//! This crate keeps a bounded, cyclically-advancing viewport over a larger
//! multi-series dataset, tracks per-series extrema, and can materialize new
//! series from user-supplied arithmetic formulas. Rendering is left to the
//! host: the engine emits snapshot and delta structures for a render sink.

pub mod api;
pub mod core;
pub mod error;
pub mod ingest;
pub mod telemetry;

pub use api::{EngineConfig, LiveChart, RenderSnapshot, TickDelta, TickToken};
pub use error::{ChartError, ChartResult};
