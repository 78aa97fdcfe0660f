pub mod extrema;
pub mod formula;
pub mod palette;
pub mod store;
pub mod window;

pub use extrema::{BoundaryPoint, ExtremaTable, SeriesExtrema};
pub use formula::CompiledFormula;
pub use palette::{DEFAULT_COLOR, PaletteColor, is_valid_hex_color};
pub use store::{SeriesInput, SeriesStore};
pub use window::{TickDelta, TickToken, WindowCursor};
