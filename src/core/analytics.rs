//! Date filtering, totals and balances over the cash book records.
use crate::core::model::{Classification, Dated, Expense, Sale};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Sub;

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// A range covering a single day.
    pub fn day(day: NaiveDate) -> Self {
        Self::new(day, day)
    }

    /// The `days` days before `end`, plus `end` itself.
    pub fn ending_on(end: NaiveDate, days: u32) -> Self {
        let start = end
            .checked_sub_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MIN);
        Self::new(start, end)
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

pub fn filter_by_range<T: Dated>(records: &[T], range: DateRange) -> Vec<&T> {
    records.iter().filter(|r| range.contains(r.date())).collect()
}

/// Whether pending expenses count against the balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationMode {
    /// Every expense reduces the balance.
    Flat,
    /// Only paid expenses reduce the balance; pending ones are reported apart.
    #[default]
    PaymentAware,
}

/// A sum kept in both currencies.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub local: f64,
    pub reference: f64,
}

impl Totals {
    fn add(&mut self, local: f64, reference: f64) {
        self.local += local;
        self.reference += reference;
    }
}

impl Sub for Totals {
    type Output = Totals;

    fn sub(self, rhs: Totals) -> Totals {
        Totals {
            local: self.local - rhs.local,
            reference: self.reference - rhs.reference,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Aggregate {
    pub sales: Totals,
    /// Expenses that reduce the balance.
    pub expenses: Totals,
    /// Unpaid expenses in payment-aware mode; always zero in flat mode.
    pub pending: Totals,
    pub balance: Totals,
}

/// Sums sales and expenses and derives the balance in each currency.
///
/// Reference-currency sums add up each record's stored reference amount, so
/// they reflect the rate in effect when each record was created.
pub fn aggregate<'a>(
    sales: impl IntoIterator<Item = &'a Sale>,
    expenses: impl IntoIterator<Item = &'a Expense>,
    mode: AggregationMode,
) -> Aggregate {
    let mut result = Aggregate::default();
    for sale in sales {
        result.sales.add(sale.total_local, sale.total_ref);
    }
    for expense in expenses {
        let counted = match mode {
            AggregationMode::Flat => true,
            AggregationMode::PaymentAware => expense.is_paid(),
        };
        if counted {
            result.expenses.add(expense.amount_local, expense.amount_ref);
        } else {
            result.pending.add(expense.amount_local, expense.amount_ref);
        }
    }
    result.balance = result.sales - result.expenses;
    result
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationSummary {
    pub classification: Classification,
    pub totals: Totals,
    pub paid: usize,
    pub pending: usize,
}

/// Groups expenses by classification, ordered by label.
pub fn group_by_classification<'a>(
    expenses: impl IntoIterator<Item = &'a Expense>,
) -> Vec<ClassificationSummary> {
    let mut groups: BTreeMap<String, ClassificationSummary> = BTreeMap::new();
    for expense in expenses {
        let group = groups
            .entry(expense.classification.label().to_string())
            .or_insert_with(|| ClassificationSummary {
                classification: expense.classification.clone(),
                totals: Totals::default(),
                paid: 0,
                pending: 0,
            });
        group.totals.add(expense.amount_local, expense.amount_ref);
        if expense.is_paid() {
            group.paid += 1;
        } else {
            group.pending += 1;
        }
    }
    groups.into_values().collect()
}

pub fn pending_expenses<'a>(expenses: impl IntoIterator<Item = &'a Expense>) -> Vec<&'a Expense> {
    expenses.into_iter().filter(|e| !e.is_paid()).collect()
}

/// Expenses paid within the last `days` days, counting back from `today`.
pub fn recent_payments<'a>(
    expenses: impl IntoIterator<Item = &'a Expense>,
    today: NaiveDate,
    days: u32,
) -> Vec<&'a Expense> {
    let since = DateRange::ending_on(today, days).start;
    expenses
        .into_iter()
        .filter(|e| e.paid_on.is_some_and(|paid_on| paid_on >= since))
        .collect()
}
