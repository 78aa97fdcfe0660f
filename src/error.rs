use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("series `{title}` has {actual} values but the x-axis has {expected}")]
    LengthMismatch {
        title: String,
        expected: usize,
        actual: usize,
    },

    #[error("a series titled `{0}` already exists")]
    DuplicateTitle(String),

    #[error("no x-axis value rounds to {0}")]
    ValueNotFound(f64),

    #[error("`{0}` is not a #RGB or #RRGGBB hex color")]
    InvalidColor(String),

    #[error("formula does not compile: {0}")]
    FormulaCompile(String),

    #[error("formula evaluation failed at sample {index}: {detail}")]
    FormulaEval { index: usize, detail: String },

    #[error("payload parse error on line {line}: {detail}")]
    Parse { line: usize, detail: String },

    #[error("window capacity {requested} is invalid for a dataset of {len} samples")]
    InvalidCapacity { requested: usize, len: usize },

    #[error("no series titled `{0}` exists")]
    UnknownSeries(String),

    #[error("dataset must contain at least one sample")]
    EmptyDataset,
}
