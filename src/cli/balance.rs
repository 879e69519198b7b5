use super::{summary, ui};
use crate::core::analytics::{self, AggregationMode, DateRange};
use crate::core::config::AppConfig;
use crate::core::model::{Expense, Sale};
use crate::core::{Clock, DocumentStore, Ledger};
use comfy_table::Cell;

/// Resolves the requested range, defaulting to the configured window ending today.
pub fn resolve_range(
    from: Option<chrono::NaiveDate>,
    to: Option<chrono::NaiveDate>,
    today: chrono::NaiveDate,
    window_days: u32,
) -> DateRange {
    let end = to.unwrap_or(today);
    let start = from.unwrap_or_else(|| DateRange::ending_on(today, window_days).start);
    DateRange::new(start, end)
}

/// Renders totals, record details and the per-classification summary for `range`.
pub fn render<S: DocumentStore, C: Clock>(
    ledger: &Ledger<S, C>,
    config: &AppConfig,
    range: DateRange,
) -> String {
    let mut output = ui::section(&format!("Balance from {} to {}", range.start, range.end));
    if range.is_empty() {
        output.push_str(&ui::style_text(
            "The start date is after the end date, so no records are selected",
            ui::StyleType::Error,
        ));
        output.push('\n');
    }
    output.push_str(&summary::rate_line(ledger.current_rate()));
    output.push_str("\n\n");

    let sales = analytics::filter_by_range(ledger.sales(), range);
    let expenses = analytics::filter_by_range(ledger.expenses(), range);
    let totals = analytics::aggregate(sales.iter().copied(), expenses.iter().copied(), config.mode);
    output.push_str(&summary::totals_table(&totals, config.mode).to_string());

    output.push_str("\n\n");
    output.push_str(&sales_section(&sales));

    match config.mode {
        AggregationMode::PaymentAware => {
            let (paid, pending): (Vec<&Expense>, Vec<&Expense>) =
                expenses.iter().copied().partition(|e| e.is_paid());
            output.push_str("\n\n");
            output.push_str(&expenses_section(
                "Paid expenses",
                "No paid expenses in the selected period",
                &paid,
                true,
            ));
            output.push_str("\n\n");
            output.push_str(&expenses_section(
                "Pending expenses",
                "No pending expenses in the selected period",
                &pending,
                false,
            ));
        }
        AggregationMode::Flat => {
            output.push_str("\n\n");
            output.push_str(&expenses_section(
                "Expenses",
                "No expenses in the selected period",
                &expenses,
                false,
            ));
        }
    }

    output.push_str("\n\n");
    output.push_str(&classification_section(&expenses, config.mode));
    output
}

fn sales_section(sales: &[&Sale]) -> String {
    let mut output = ui::section("Sales");
    if sales.is_empty() {
        output.push_str(&ui::style_text(
            "No sales in the selected period",
            ui::StyleType::Subtle,
        ));
        return output;
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("Point of sale"),
        ui::header_cell("$ cash"),
        ui::header_cell("External"),
        ui::header_cell("Bs. cash"),
        ui::header_cell("Total Bs."),
        ui::header_cell("Total $"),
        ui::header_cell("Description"),
    ]);
    for sale in sales {
        table.add_row(vec![
            Cell::new(sale.date),
            ui::amount_cell(format!("{:.2}", sale.point_of_sale)),
            ui::amount_cell(format!("{:.2}", sale.foreign_cash)),
            ui::amount_cell(format!("{:.2}", sale.external)),
            ui::amount_cell(format!("{:.2}", sale.local_cash)),
            ui::amount_cell(ui::local(sale.total_local)),
            ui::amount_cell(ui::reference(sale.total_ref)),
            Cell::new(&sale.description),
        ]);
    }
    output.push_str(&table.to_string());
    output
}

fn expenses_section(title: &str, empty: &str, expenses: &[&Expense], with_paid_on: bool) -> String {
    let mut output = ui::section(title);
    if expenses.is_empty() {
        output.push_str(&ui::style_text(empty, ui::StyleType::Subtle));
        return output;
    }

    let mut header = vec![
        ui::header_cell("Date"),
        ui::header_cell("Classification"),
        ui::header_cell("Description"),
        ui::header_cell("Bs."),
        ui::header_cell("$"),
    ];
    if with_paid_on {
        header.push(ui::header_cell("Paid on"));
    }

    let mut table = ui::new_styled_table();
    table.set_header(header);
    for expense in expenses {
        let mut row = vec![
            Cell::new(expense.date),
            Cell::new(&expense.classification),
            Cell::new(&expense.description),
            ui::amount_cell(ui::local(expense.amount_local)),
            ui::amount_cell(ui::reference(expense.amount_ref)),
        ];
        if with_paid_on {
            row.push(ui::format_optional_cell(expense.paid_on, |d| d.to_string()));
        }
        table.add_row(row);
    }
    output.push_str(&table.to_string());
    output
}

fn classification_section(expenses: &[&Expense], mode: AggregationMode) -> String {
    let mut output = ui::section("Expenses by classification");
    let groups = analytics::group_by_classification(expenses.iter().copied());
    if groups.is_empty() {
        output.push_str(&ui::style_text(
            "No expenses to summarize",
            ui::StyleType::Subtle,
        ));
        return output;
    }

    let mut header = vec![
        ui::header_cell("Classification"),
        ui::header_cell("Bs."),
        ui::header_cell("$"),
    ];
    if mode == AggregationMode::PaymentAware {
        header.push(ui::header_cell("Paid"));
        header.push(ui::header_cell("Pending"));
    }

    let mut table = ui::new_styled_table();
    table.set_header(header);
    for group in groups {
        let mut row = vec![
            Cell::new(&group.classification),
            ui::amount_cell(ui::local(group.totals.local)),
            ui::amount_cell(ui::reference(group.totals.reference)),
        ];
        if mode == AggregationMode::PaymentAware {
            row.push(ui::amount_cell(group.paid.to_string()));
            row.push(ui::amount_cell(group.pending.to_string()));
        }
        table.add_row(row);
    }
    output.push_str(&table.to_string());
    output
}
