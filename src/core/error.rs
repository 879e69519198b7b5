//! Error types for cash book operations.

/// Reasons a cash book operation is refused.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("No exchange rate configured. Set one with `caja rate set` first")]
    RateNotConfigured,

    #[error("Exchange rate must be a positive number, got {0}")]
    InvalidRate(f64),

    #[error("{field} must be a non-negative number, got {value}")]
    InvalidAmount { field: &'static str, value: f64 },

    #[error("{field} is too large to record, got {value}")]
    AmountOutOfRange { field: &'static str, value: f64 },

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// A persisted record that breaks a record invariant.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Expense {0:?} is marked paid but has no payment date")]
    MissingPaymentDate(Option<u64>),

    #[error("Expense {0:?} is pending but has a payment date")]
    UnexpectedPaymentDate(Option<u64>),

    #[error("Exchange rate for {0} must be a positive number, got {1}")]
    InvalidRate(chrono::NaiveDate, f64),
}
