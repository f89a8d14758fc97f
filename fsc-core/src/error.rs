use thiserror::Error;

/// Errors that can occur when loading or converting survey records.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("row {row}: unparseable sample date {value:?}")]
    BadDate { row: usize, value: String },

    #[error("row {row}: unparseable water-year type {value:?}")]
    BadWaterYearType { row: usize, value: String },

    #[error("row {row}: negative CPUE {value}")]
    NegativeCpue { row: usize, value: f64 },
}
