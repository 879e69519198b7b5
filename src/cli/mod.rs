//! Terminal screens for each command

pub mod balance;
pub mod payments;
pub mod rate;
pub mod record;
pub mod setup;
pub mod summary;
pub mod ui;
