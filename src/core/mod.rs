//! Cash book records and the computations over them

pub mod analytics;
pub mod clock;
pub mod config;
pub mod error;
pub mod ledger;
pub mod log;
pub mod model;
pub mod rate;
pub mod store;

// Re-export main types for cleaner imports
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::LedgerError;
pub use ledger::{Ledger, PaymentOutcome};
pub use store::DocumentStore;
