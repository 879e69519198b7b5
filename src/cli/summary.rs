use super::ui;
use crate::core::analytics::{self, Aggregate, AggregationMode, DateRange};
use crate::core::config::AppConfig;
use crate::core::{Clock, DocumentStore, Ledger};
use comfy_table::{Cell, Table};

/// Renders the running totals of every record plus today's figures.
pub fn render<S: DocumentStore, C: Clock>(ledger: &Ledger<S, C>, config: &AppConfig) -> String {
    let mut output = ui::section("Cumulative summary");
    output.push_str(&rate_line(ledger.current_rate()));
    output.push_str("\n\n");

    let cumulative = analytics::aggregate(ledger.sales(), ledger.expenses(), config.mode);
    output.push_str(&totals_table(&cumulative, config.mode).to_string());

    let today = ledger.today();
    let range = DateRange::day(today);
    let sales = analytics::filter_by_range(ledger.sales(), range);
    let expenses = analytics::filter_by_range(ledger.expenses(), range);
    let daily = analytics::aggregate(sales.iter().copied(), expenses.iter().copied(), config.mode);

    output.push_str("\n\n");
    output.push_str(&ui::section(&format!("Today ({today})")));
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Sales today"),
        ui::header_cell("Expenses today"),
        ui::header_cell("Balance today"),
    ]);
    table.add_row(vec![
        ui::amount_cell(ui::local(daily.sales.local)),
        ui::amount_cell(ui::local(daily.expenses.local)),
        ui::balance_cell(daily.balance.local, ui::local),
    ]);
    output.push_str(&table.to_string());
    output
}

pub(crate) fn rate_line(rate: Option<f64>) -> String {
    match rate {
        Some(rate) => format!(
            "Current exchange rate: {}",
            ui::style_text(&format!("{rate:.2} Bs/$"), ui::StyleType::TotalValue)
        ),
        None => ui::style_text(
            "No exchange rate configured. Set one with `caja rate set` first.",
            ui::StyleType::Error,
        ),
    }
}

/// Sales, expenses and balance in both currencies, one row each.
pub(crate) fn totals_table(totals: &Aggregate, mode: AggregationMode) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(""),
        ui::header_cell("Bs."),
        ui::header_cell("$"),
    ]);

    let expenses_label = match mode {
        AggregationMode::Flat => "Expenses",
        AggregationMode::PaymentAware => "Paid expenses",
    };
    table.add_row(vec![
        Cell::new("Sales"),
        ui::amount_cell(ui::local(totals.sales.local)),
        ui::amount_cell(ui::reference(totals.sales.reference)),
    ]);
    table.add_row(vec![
        Cell::new(expenses_label),
        ui::amount_cell(ui::local(totals.expenses.local)),
        ui::amount_cell(ui::reference(totals.expenses.reference)),
    ]);
    if mode == AggregationMode::PaymentAware {
        table.add_row(vec![
            Cell::new("Pending expenses"),
            ui::amount_cell(ui::local(totals.pending.local)),
            ui::amount_cell(ui::reference(totals.pending.reference)),
        ]);
    }
    table.add_row(vec![
        Cell::new(ui::style_text("Balance", ui::StyleType::TotalLabel)),
        ui::balance_cell(totals.balance.local, ui::local),
        ui::balance_cell(totals.balance.reference, ui::reference),
    ]);
    table
}
