use super::{summary, ui};
use crate::core::rate;
use crate::core::{Clock, DocumentStore, Ledger};
use anyhow::Result;
use chrono::NaiveDate;
use comfy_table::Cell;

/// Records a new exchange rate, dated today unless `date` is given.
pub fn set<S: DocumentStore, C: Clock>(
    ledger: &mut Ledger<S, C>,
    date: Option<NaiveDate>,
    value: f64,
) -> Result<String> {
    let date = date.unwrap_or_else(|| ledger.today());
    let recorded = ledger.add_rate(date, value)?;
    let mut output = ui::style_text(
        &format!(
            "Exchange rate saved: {:.2} Bs/$ as of {}",
            recorded.rate, recorded.date
        ),
        ui::StyleType::Success,
    );

    // An older or same-day entry does not displace the rate in effect
    if let Some(current) = rate::current_rate_record(ledger.rates())
        .filter(|current| current.date > date || current.rate != value)
    {
        output.push('\n');
        output.push_str(&ui::style_text(
            &format!(
                "Current rate stays at {:.2} Bs/$ (recorded for {})",
                current.rate, current.date
            ),
            ui::StyleType::Subtle,
        ));
    }
    Ok(output)
}

/// Renders the current rate and every recorded rate, newest first.
pub fn render_history<S: DocumentStore, C: Clock>(ledger: &Ledger<S, C>) -> String {
    let mut output = ui::section("Exchange rates");
    output.push_str(&summary::rate_line(ledger.current_rate()));

    let history = rate::rate_history(ledger.rates());
    if history.is_empty() {
        return output;
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Date"), ui::header_cell("Bs/$")]);
    for entry in history {
        table.add_row(vec![
            Cell::new(entry.date),
            ui::amount_cell(format!("{:.2}", entry.rate)),
        ]);
    }
    output.push_str("\n\n");
    output.push_str(&table.to_string());
    output
}
