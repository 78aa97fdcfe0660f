use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ChartError, ChartResult};

/// Fallback applied whenever a caller supplies a malformed color.
pub const DEFAULT_COLOR: &str = "#000";

/// Accepts only `#RGB` or `#RRGGBB`, hex digits case-insensitive.
#[must_use]
pub fn is_valid_hex_color(candidate: &str) -> bool {
    let Some(digits) = candidate.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

/// A color string guaranteed to match the hex grammar post-construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaletteColor(String);

impl PaletteColor {
    /// Strict gate: rejects anything outside the hex grammar.
    pub fn parse(candidate: impl Into<String>) -> ChartResult<Self> {
        let candidate = candidate.into();
        if is_valid_hex_color(&candidate) {
            Ok(Self(candidate))
        } else {
            Err(ChartError::InvalidColor(candidate))
        }
    }

    /// Lenient gate: malformed input degrades to [`DEFAULT_COLOR`] with a
    /// warning instead of failing the caller.
    #[must_use]
    pub fn sanitize(candidate: &str) -> Self {
        if is_valid_hex_color(candidate) {
            Self(candidate.to_owned())
        } else {
            warn!(rejected = %candidate, fallback = DEFAULT_COLOR, "invalid color, using default");
            Self::default()
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PaletteColor {
    fn default() -> Self {
        Self(DEFAULT_COLOR.to_owned())
    }
}
