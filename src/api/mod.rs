mod config;
mod engine;
mod snapshot;

pub use config::EngineConfig;
pub use engine::LiveChart;
pub use snapshot::{RenderSnapshot, SeriesSlice};

pub use crate::core::{TickDelta, TickToken};
