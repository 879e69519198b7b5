use super::ui;
use crate::core::model::{NewExpense, NewSale};
use crate::core::{Clock, DocumentStore, Ledger};
use anyhow::Result;
use comfy_table::Cell;

/// Registers a sale and renders its breakdown in both currencies.
pub fn sale<S: DocumentStore, C: Clock>(
    ledger: &mut Ledger<S, C>,
    sale: NewSale,
) -> Result<String> {
    let sale = ledger.append_sale(sale)?;

    let mut output = ui::style_text(
        &format!(
            "Sale #{} registered. Total: {} ({})",
            sale.id.unwrap_or_default(),
            ui::local(sale.total_local),
            ui::reference(sale.total_ref)
        ),
        ui::StyleType::Success,
    );
    output.push_str("\n\n");

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(""),
        ui::header_cell("Bs."),
        ui::header_cell("$"),
    ]);
    for (label, amount) in sale.amounts().labelled() {
        table.add_row(vec![
            Cell::new(label),
            ui::amount_cell(ui::local(amount)),
            ui::amount_cell(ui::reference(amount / sale.rate)),
        ]);
    }
    table.add_row(vec![
        Cell::new(ui::style_text("Total", ui::StyleType::TotalLabel)),
        ui::amount_cell(ui::style_text(
            &ui::local(sale.total_local),
            ui::StyleType::TotalValue,
        )),
        ui::amount_cell(ui::style_text(
            &ui::reference(sale.total_ref),
            ui::StyleType::TotalValue,
        )),
    ]);
    output.push_str(&table.to_string());
    output.push_str(&format!(
        "\n{}",
        ui::style_text(
            &format!("Rate used: {:.2} Bs/$", sale.rate),
            ui::StyleType::Subtle
        )
    ));
    Ok(output)
}

/// Registers an expense and renders a one-line confirmation.
pub fn expense<S: DocumentStore, C: Clock>(
    ledger: &mut Ledger<S, C>,
    expense: NewExpense,
) -> Result<String> {
    let expense = ledger.append_expense(expense)?;
    let status = if expense.is_paid() { "paid" } else { "pending" };
    Ok(ui::style_text(
        &format!(
            "Expense #{} registered: {} ({}) under {}, status: {status}",
            expense.id.unwrap_or_default(),
            ui::local(expense.amount_local),
            ui::reference(expense.amount_ref),
            expense.classification
        ),
        ui::StyleType::Success,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FixedClock;
    use crate::core::LedgerError;
    use crate::core::model::{Classification, SaleAmounts};
    use crate::store::MemoryStore;
    use chrono::NaiveDate;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn ledger() -> Ledger<MemoryStore, FixedClock> {
        Ledger::open(MemoryStore::new(), FixedClock(day("2024-01-15"))).unwrap()
    }

    #[test]
    fn test_sale_breakdown() -> anyhow::Result<()> {
        let mut ledger = ledger();
        ledger.add_rate(day("2024-01-15"), 40.0)?;

        let output = sale(
            &mut ledger,
            NewSale {
                date: day("2024-01-15"),
                amounts: SaleAmounts {
                    point_of_sale: 100.0,
                    foreign_cash: 400.0,
                    ..Default::default()
                },
                description: "Sábado".to_string(),
            },
        )?;

        assert!(output.contains("Sale #1 registered"));
        assert!(output.contains("Bs. 500.00"));
        assert!(output.contains("$ 12.50"));
        assert!(output.contains("$ 2.50"));
        assert!(output.contains("$ 10.00"));
        assert!(output.contains("Rate used: 40.00 Bs/$"));
        Ok(())
    }

    #[test]
    fn test_sale_without_rate_surfaces_validation_error() {
        let mut ledger = ledger();

        let err = sale(
            &mut ledger,
            NewSale {
                date: day("2024-01-15"),
                amounts: SaleAmounts::default(),
                description: String::new(),
            },
        )
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<LedgerError>(),
            Some(LedgerError::RateNotConfigured)
        ));
        assert!(err.to_string().contains("No exchange rate configured"));
        assert_eq!(ledger.store().saves(), 0);
    }

    #[test]
    fn test_expense_confirmation() -> anyhow::Result<()> {
        let mut ledger = ledger();
        ledger.add_rate(day("2024-01-15"), 40.0)?;

        let output = expense(
            &mut ledger,
            NewExpense {
                date: day("2024-01-15"),
                classification: Classification::RawMaterials,
                description: "Harina".to_string(),
                amount: 400.0,
                paid: true,
            },
        )?;

        assert!(output.contains("Expense #1 registered"));
        assert!(output.contains("$ 10.00"));
        assert!(output.contains("Gastos x Compras Materia Prima"));
        assert!(output.contains("status: paid"));
        Ok(())
    }
}
