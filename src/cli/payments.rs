use super::ui;
use crate::core::analytics;
use crate::core::config::AppConfig;
use crate::core::{Clock, DocumentStore, Ledger, PaymentOutcome};
use anyhow::Result;
use comfy_table::Cell;

/// Renders the expenses awaiting payment and the payments made recently.
pub fn render<S: DocumentStore, C: Clock>(ledger: &Ledger<S, C>, config: &AppConfig) -> String {
    let mut output = ui::section("Pending expenses");

    let pending = analytics::pending_expenses(ledger.expenses());
    if pending.is_empty() {
        output.push_str(&ui::style_text(
            "No expenses pending payment",
            ui::StyleType::Success,
        ));
    } else {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Id"),
            ui::header_cell("Date"),
            ui::header_cell("Classification"),
            ui::header_cell("Description"),
            ui::header_cell("Bs."),
            ui::header_cell("$"),
        ]);
        for expense in &pending {
            table.add_row(vec![
                ui::format_optional_cell(expense.id, |id| id.to_string()),
                Cell::new(expense.date),
                Cell::new(&expense.classification),
                Cell::new(&expense.description),
                ui::amount_cell(ui::local(expense.amount_local)),
                ui::amount_cell(ui::reference(expense.amount_ref)),
            ]);
        }
        output.push_str(&table.to_string());
        output.push_str(&format!(
            "\n{}",
            ui::style_text("Mark one paid with `caja pay <ID>`", ui::StyleType::Subtle)
        ));
    }

    output.push_str("\n\n");
    output.push_str(&ui::section(&format!(
        "Payments in the last {} days",
        config.recent_payment_days
    )));
    let recent =
        analytics::recent_payments(ledger.expenses(), ledger.today(), config.recent_payment_days);
    if recent.is_empty() {
        output.push_str(&ui::style_text(
            "No recent payments",
            ui::StyleType::Subtle,
        ));
        return output;
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("Paid on"),
        ui::header_cell("Classification"),
        ui::header_cell("Description"),
        ui::header_cell("Bs."),
        ui::header_cell("$"),
    ]);
    for expense in recent {
        table.add_row(vec![
            Cell::new(expense.date),
            ui::format_optional_cell(expense.paid_on, |d| d.to_string()),
            Cell::new(&expense.classification),
            Cell::new(&expense.description),
            ui::amount_cell(ui::local(expense.amount_local)),
            ui::amount_cell(ui::reference(expense.amount_ref)),
        ]);
    }
    output.push_str(&table.to_string());
    output
}

/// Marks expense `id` paid today and describes what happened.
pub fn pay<S: DocumentStore, C: Clock>(ledger: &mut Ledger<S, C>, id: u64) -> Result<String> {
    let message = match ledger.mark_expense_paid(id)? {
        PaymentOutcome::Marked(day) => ui::style_text(
            &format!("Expense #{id} marked as paid on {day}"),
            ui::StyleType::Success,
        ),
        PaymentOutcome::AlreadyPaid(day) => ui::style_text(
            &format!("Expense #{id} was already paid on {day}"),
            ui::StyleType::Subtle,
        ),
        PaymentOutcome::NotFound => ui::style_text(
            &format!("No expense with id {id}"),
            ui::StyleType::Error,
        ),
    };
    Ok(message)
}
