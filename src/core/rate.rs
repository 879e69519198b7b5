//! Exchange rate lookups

use crate::core::model::ExchangeRate;

/// The rate record with the latest date. When several records share that
/// date, the one inserted first wins.
pub fn current_rate_record(rates: &[ExchangeRate]) -> Option<&ExchangeRate> {
    // max_by_key keeps the last of equal maxima, which is the first inserted once reversed
    rates.iter().rev().max_by_key(|r| r.date)
}

/// The value of the current rate, if any rate was ever recorded.
pub fn current_rate(rates: &[ExchangeRate]) -> Option<f64> {
    current_rate_record(rates).map(|r| r.rate)
}

/// All rates, newest date first. Same-day entries keep their insertion
/// order, so the head of the list is always the current rate.
pub fn rate_history(rates: &[ExchangeRate]) -> Vec<&ExchangeRate> {
    let mut history: Vec<&ExchangeRate> = rates.iter().collect();
    history.sort_by(|a, b| b.date.cmp(&a.date));
    history
}
