//! The cash book: owns the records for a session and flushes every change.
use crate::core::clock::Clock;
use crate::core::error::LedgerError;
use crate::core::model::{Document, ExchangeRate, Expense, NewExpense, NewSale, Sale};
use crate::core::rate;
use crate::core::store::DocumentStore;
use chrono::NaiveDate;
use tracing::{debug, info};

/// Result of asking for an expense to be marked paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// The expense went from pending to paid on the given day.
    Marked(NaiveDate),
    /// The expense was already paid on the given day; nothing changed.
    AlreadyPaid(NaiveDate),
    /// No expense has that id; nothing changed.
    NotFound,
}

/// Holds the loaded document together with the store it came from.
///
/// Each successful mutation rewrites the whole document through the store
/// before returning. A rejected mutation leaves both untouched.
pub struct Ledger<S, C> {
    store: S,
    clock: C,
    document: Document,
}

impl<S: DocumentStore, C: Clock> Ledger<S, C> {
    pub fn open(mut store: S, clock: C) -> anyhow::Result<Self> {
        let document = store.load()?;
        debug!(
            sales = document.sales.len(),
            expenses = document.expenses.len(),
            rates = document.rates.len(),
            "Opened ledger"
        );
        Ok(Self {
            store,
            clock,
            document,
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn sales(&self) -> &[Sale] {
        &self.document.sales
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.document.expenses
    }

    pub fn rates(&self) -> &[ExchangeRate] {
        &self.document.rates
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn current_rate(&self) -> Option<f64> {
        rate::current_rate(&self.document.rates)
    }

    pub fn add_rate(&mut self, date: NaiveDate, rate: f64) -> Result<&ExchangeRate, LedgerError> {
        if !(rate.is_finite() && rate > 0.0) {
            return Err(LedgerError::InvalidRate(rate));
        }

        self.document.rates.push(ExchangeRate { date, rate });
        if let Err(e) = self.flush() {
            self.document.rates.pop();
            return Err(e);
        }
        info!(%date, rate, "Recorded exchange rate");
        Ok(&self.document.rates[self.document.rates.len() - 1])
    }

    pub fn append_sale(&mut self, sale: NewSale) -> Result<&Sale, LedgerError> {
        let rate = self.current_rate().ok_or(LedgerError::RateNotConfigured)?;
        for (field, value) in sale.amounts.labelled() {
            check_amount(field, value)?;
        }

        let id = self.document.sales.len() as u64 + 1;
        let record = Sale::new(id, sale.date, sale.amounts, sale.description, rate);
        check_derived("Total Bs.", record.total_local)?;
        check_derived("Total $", record.total_ref)?;
        self.document.sales.push(record);
        if let Err(e) = self.flush() {
            self.document.sales.pop();
            return Err(e);
        }

        let sale = &self.document.sales[self.document.sales.len() - 1];
        info!(id, total = sale.total_local, rate, "Registered sale");
        Ok(sale)
    }

    pub fn append_expense(&mut self, expense: NewExpense) -> Result<&Expense, LedgerError> {
        let rate = self.current_rate().ok_or(LedgerError::RateNotConfigured)?;
        check_amount("Amount", expense.amount)?;

        let id = self.document.expenses.len() as u64 + 1;
        let mut record = Expense::new(
            id,
            expense.date,
            expense.classification,
            expense.description,
            expense.amount,
            rate,
        );
        check_derived("Amount in $", record.amount_ref)?;
        if expense.paid {
            record.paid_on = Some(expense.date);
        }
        self.document.expenses.push(record);
        if let Err(e) = self.flush() {
            self.document.expenses.pop();
            return Err(e);
        }

        let expense = &self.document.expenses[self.document.expenses.len() - 1];
        info!(
            id,
            amount = expense.amount_local,
            paid = expense.is_paid(),
            "Registered expense"
        );
        Ok(expense)
    }

    /// Moves the expense with `id` from pending to paid, stamped with today.
    /// Unknown ids and already-paid expenses are left alone.
    pub fn mark_expense_paid(&mut self, id: u64) -> Result<PaymentOutcome, LedgerError> {
        let today = self.clock.today();
        let Some(index) = self
            .document
            .expenses
            .iter()
            .position(|e| e.id == Some(id))
        else {
            debug!(id, "No expense to mark paid");
            return Ok(PaymentOutcome::NotFound);
        };

        if let Some(paid_on) = self.document.expenses[index].paid_on {
            debug!(id, %paid_on, "Expense already paid");
            return Ok(PaymentOutcome::AlreadyPaid(paid_on));
        }

        self.document.expenses[index].paid_on = Some(today);
        if let Err(e) = self.flush() {
            self.document.expenses[index].paid_on = None;
            return Err(e);
        }
        info!(id, %today, "Marked expense paid");
        Ok(PaymentOutcome::Marked(today))
    }

    fn flush(&mut self) -> Result<(), LedgerError> {
        self.store.save(&self.document)?;
        Ok(())
    }
}

fn check_amount(field: &'static str, value: f64) -> Result<(), LedgerError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(LedgerError::InvalidAmount { field, value })
    }
}

/// Derived values must survive a round trip through the data file, which
/// cannot hold infinities.
fn check_derived(field: &'static str, value: f64) -> Result<(), LedgerError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(LedgerError::AmountOutOfRange { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::analytics::{self, AggregationMode};
    use crate::core::clock::FixedClock;
    use crate::core::model::{Classification, SaleAmounts};
    use crate::store::{JsonFileStore, MemoryStore};
    use anyhow::{Result, anyhow};

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn ledger_on(today: &str) -> Ledger<MemoryStore, FixedClock> {
        Ledger::open(MemoryStore::new(), FixedClock(day(today))).unwrap()
    }

    fn new_sale(date: &str, point_of_sale: f64) -> NewSale {
        NewSale {
            date: day(date),
            amounts: SaleAmounts {
                point_of_sale,
                ..Default::default()
            },
            description: String::new(),
        }
    }

    fn new_expense(date: &str, amount: f64, paid: bool) -> NewExpense {
        NewExpense {
            date: day(date),
            classification: Classification::Maintenance,
            description: "Aire acondicionado".to_string(),
            amount,
            paid,
        }
    }

    /// Store whose saves always fail.
    struct FailingStore;

    impl DocumentStore for FailingStore {
        fn load(&mut self) -> Result<Document> {
            Ok(Document::default())
        }

        fn save(&mut self, _document: &Document) -> Result<()> {
            Err(anyhow!("disk full"))
        }
    }

    #[test]
    fn test_sale_uses_latest_rate() {
        let mut ledger = ledger_on("2024-01-15");
        ledger.add_rate(day("2024-01-01"), 36.0).unwrap();
        ledger.add_rate(day("2024-01-15"), 40.0).unwrap();

        let sale = ledger.append_sale(new_sale("2024-01-15", 100.0)).unwrap();

        assert_eq!(sale.total_local, 100.0);
        assert_eq!(sale.total_ref, 2.5);
        assert_eq!(sale.rate, 40.0);
        assert_eq!(sale.id, Some(1));
        assert_eq!(ledger.store().saves(), 3);
        assert_eq!(ledger.store().document().sales.len(), 1);
    }

    #[test]
    fn test_sale_without_rate_is_rejected() {
        let mut ledger = ledger_on("2024-01-15");

        let err = ledger
            .append_sale(new_sale("2024-01-15", 100.0))
            .unwrap_err();

        assert!(matches!(err, LedgerError::RateNotConfigured));
        assert!(ledger.sales().is_empty());
        assert_eq!(ledger.store().saves(), 0);
    }

    #[test]
    fn test_expense_without_rate_is_rejected() {
        let mut ledger = ledger_on("2024-01-15");

        let err = ledger
            .append_expense(new_expense("2024-01-15", 400.0, false))
            .unwrap_err();

        assert!(matches!(err, LedgerError::RateNotConfigured));
        assert!(ledger.expenses().is_empty());
        assert_eq!(ledger.store().saves(), 0);
    }

    #[test]
    fn test_negative_amount_is_rejected() {
        let mut ledger = ledger_on("2024-01-15");
        ledger.add_rate(day("2024-01-15"), 40.0).unwrap();

        let err = ledger
            .append_expense(new_expense("2024-01-15", -1.0, false))
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount { .. }));

        let mut sale = new_sale("2024-01-15", 100.0);
        sale.amounts.external = f64::NAN;
        assert!(ledger.append_sale(sale).is_err());

        assert!(ledger.sales().is_empty());
        assert!(ledger.expenses().is_empty());
        assert_eq!(ledger.store().saves(), 1);
    }

    #[test]
    fn test_overflowing_sale_total_is_rejected() {
        let mut ledger = ledger_on("2024-01-15");
        ledger.add_rate(day("2024-01-15"), 40.0).unwrap();

        let mut sale = new_sale("2024-01-15", 1e308);
        sale.amounts.foreign_cash = 1e308;
        let err = ledger.append_sale(sale).unwrap_err();

        assert!(matches!(
            err,
            LedgerError::AmountOutOfRange {
                field: "Total Bs.",
                ..
            }
        ));
        assert!(ledger.sales().is_empty());
        assert_eq!(ledger.store().saves(), 1);
    }

    #[test]
    fn test_tiny_rate_overflowing_conversion_is_rejected() {
        let mut ledger = ledger_on("2024-01-15");
        ledger.add_rate(day("2024-01-15"), 1e-310).unwrap();

        let err = ledger
            .append_expense(new_expense("2024-01-15", 10.0, false))
            .unwrap_err();
        assert!(matches!(err, LedgerError::AmountOutOfRange { .. }));

        let err = ledger
            .append_sale(new_sale("2024-01-15", 10.0))
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::AmountOutOfRange {
                field: "Total $",
                ..
            }
        ));

        assert!(ledger.expenses().is_empty());
        assert!(ledger.sales().is_empty());
        assert_eq!(ledger.store().saves(), 1);
    }

    #[test]
    fn test_open_rejects_stored_non_positive_rate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("balance_data.json");
        std::fs::write(
            &path,
            r#"{ "tasas_cambio": [{ "fecha": "2024-01-15", "tasa": -40.0 }] }"#,
        )
        .unwrap();

        let result = Ledger::open(JsonFileStore::new(&path), FixedClock(day("2024-01-15")));

        let err = result.err().expect("Negative stored rate should fail to open");
        assert!(format!("{err:#}").contains("must be a positive number"));
    }

    #[test]
    fn test_accepted_records_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("balance_data.json");
        let mut ledger =
            Ledger::open(JsonFileStore::new(&path), FixedClock(day("2024-01-15"))).unwrap();
        ledger.add_rate(day("2024-01-15"), 1e-300).unwrap();
        assert!(ledger.append_sale(new_sale("2024-01-15", 1e308)).is_err());
        ledger.add_rate(day("2024-01-16"), 40.0).unwrap();
        ledger.append_sale(new_sale("2024-01-16", 1e308)).unwrap();

        let reopened =
            Ledger::open(JsonFileStore::new(&path), FixedClock(day("2024-01-16"))).unwrap();
        assert_eq!(reopened.sales().len(), 1);
        assert_eq!(reopened.rates().len(), 2);
    }

    #[test]
    fn test_invalid_rate_is_rejected() {
        let mut ledger = ledger_on("2024-01-15");

        assert!(matches!(
            ledger.add_rate(day("2024-01-15"), 0.0),
            Err(LedgerError::InvalidRate(_))
        ));
        assert!(ledger.add_rate(day("2024-01-15"), -3.0).is_err());
        assert!(ledger.rates().is_empty());
        assert_eq!(ledger.current_rate(), None);
    }

    #[test]
    fn test_ids_are_sequential_per_collection() {
        let mut ledger = ledger_on("2024-01-15");
        ledger.add_rate(day("2024-01-15"), 40.0).unwrap();

        ledger.append_sale(new_sale("2024-01-15", 10.0)).unwrap();
        ledger.append_sale(new_sale("2024-01-15", 20.0)).unwrap();
        ledger
            .append_expense(new_expense("2024-01-15", 5.0, false))
            .unwrap();

        let sale_ids: Vec<_> = ledger.sales().iter().map(|s| s.id).collect();
        assert_eq!(sale_ids, vec![Some(1), Some(2)]);
        assert_eq!(ledger.expenses()[0].id, Some(1));
    }

    #[test]
    fn test_expense_lifecycle() {
        let mut ledger = ledger_on("2024-01-20");
        ledger.add_rate(day("2024-01-15"), 40.0).unwrap();

        let expense = ledger
            .append_expense(new_expense("2024-01-15", 400.0, false))
            .unwrap();
        assert_eq!(expense.amount_ref, 10.0);
        assert!(!expense.is_paid());
        assert_eq!(analytics::pending_expenses(ledger.expenses()).len(), 1);

        let outcome = ledger.mark_expense_paid(1).unwrap();
        assert_eq!(outcome, PaymentOutcome::Marked(day("2024-01-20")));

        let expense = &ledger.expenses()[0];
        assert!(expense.is_paid());
        assert_eq!(expense.paid_on, Some(day("2024-01-20")));
        assert!(analytics::pending_expenses(ledger.expenses()).is_empty());
        assert_eq!(
            analytics::recent_payments(ledger.expenses(), ledger.today(), 7).len(),
            1
        );
        assert_eq!(
            ledger.store().document().expenses[0].paid_on,
            Some(day("2024-01-20"))
        );
    }

    #[test]
    fn test_mark_paid_twice_keeps_first_date() {
        let mut ledger = ledger_on("2024-01-20");
        ledger.add_rate(day("2024-01-15"), 40.0).unwrap();
        ledger
            .append_expense(new_expense("2024-01-15", 400.0, false))
            .unwrap();
        ledger.mark_expense_paid(1).unwrap();
        let saves = ledger.store().saves();

        let mut later = Ledger::open(
            MemoryStore::with_document(ledger.document().clone()),
            FixedClock(day("2024-02-01")),
        )
        .unwrap();
        let outcome = later.mark_expense_paid(1).unwrap();

        assert_eq!(outcome, PaymentOutcome::AlreadyPaid(day("2024-01-20")));
        assert_eq!(later.expenses()[0].paid_on, Some(day("2024-01-20")));
        assert_eq!(later.store().saves(), 0);
        assert_eq!(ledger.store().saves(), saves);
    }

    #[test]
    fn test_mark_unknown_expense_is_noop() {
        let mut ledger = ledger_on("2024-01-20");
        ledger.add_rate(day("2024-01-15"), 40.0).unwrap();

        assert_eq!(
            ledger.mark_expense_paid(42).unwrap(),
            PaymentOutcome::NotFound
        );
        assert_eq!(ledger.store().saves(), 1);
    }

    #[test]
    fn test_expense_paid_at_creation_uses_expense_date() {
        let mut ledger = ledger_on("2024-01-20");
        ledger.add_rate(day("2024-01-15"), 40.0).unwrap();

        let expense = ledger
            .append_expense(new_expense("2024-01-16", 80.0, true))
            .unwrap();

        assert_eq!(expense.paid_on, Some(day("2024-01-16")));
    }

    #[test]
    fn test_balance_counts_only_paid_expenses() {
        let mut ledger = ledger_on("2024-01-20");
        ledger.add_rate(day("2024-01-15"), 40.0).unwrap();
        ledger.append_sale(new_sale("2024-01-15", 1000.0)).unwrap();
        ledger
            .append_expense(new_expense("2024-01-15", 400.0, true))
            .unwrap();
        ledger
            .append_expense(new_expense("2024-01-15", 200.0, false))
            .unwrap();

        let result = analytics::aggregate(
            ledger.sales(),
            ledger.expenses(),
            AggregationMode::PaymentAware,
        );

        assert_eq!(result.balance.local, 600.0);
        assert_eq!(result.pending.local, 200.0);
    }

    #[test]
    fn test_failed_flush_rolls_back() {
        let mut ledger = Ledger::open(FailingStore, FixedClock(day("2024-01-20"))).unwrap();

        let err = ledger.add_rate(day("2024-01-15"), 40.0).unwrap_err();

        assert!(matches!(err, LedgerError::Store(_)));
        assert!(err.to_string().contains("disk full"));
        assert!(ledger.rates().is_empty());
    }
}
