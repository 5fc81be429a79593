use thiserror::Error;

/// Precondition failures raised by the simulation core.
///
/// None of these are recoverable at runtime: they mean the caller passed
/// misaligned or out-of-range inputs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("{what}: length {left} does not match length {right}")]
    LengthMismatch {
        what: &'static str,
        left: usize,
        right: usize,
    },

    #[error("{what} must not be empty")]
    EmptyInput { what: &'static str },

    #[error("stock fraction {fraction} at year index {index} is outside [0, 1]")]
    FractionOutOfRange { index: usize, fraction: f64 },

    #[error(
        "retirement {start_year}-{end_year} is outside the historical data {first_year}-{last_year}"
    )]
    StartYearOutOfRange {
        start_year: u32,
        end_year: u32,
        first_year: u32,
        last_year: u32,
    },

    #[error("horizon of {horizon} years exceeds the {available} years of historical data")]
    HorizonTooLong { horizon: usize, available: usize },

    #[error("{years} years of data starting in {first_year} run past the last representable year")]
    YearOverflow { first_year: u32, years: usize },

    #[error("nominal expenses in {start_year}-{end_year} need inflation data the history lacks")]
    InflationUnavailable { start_year: u32, end_year: u32 },
}
