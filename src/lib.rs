pub mod cli;
pub mod core;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::model::{Classification, NewExpense, NewSale, SaleAmounts};
use crate::core::{Clock, Ledger, SystemClock};
use anyhow::Result;
use chrono::NaiveDate;
use store::JsonFileStore;
use tracing::{debug, info};

/// Every operation the cash book offers. Omitted dates mean "today".
#[derive(Debug, Clone)]
pub enum AppCommand {
    Summary,
    SetRate {
        date: Option<NaiveDate>,
        rate: f64,
    },
    RateHistory,
    Sale {
        date: Option<NaiveDate>,
        amounts: SaleAmounts,
        description: String,
    },
    Expense {
        date: Option<NaiveDate>,
        classification: Classification,
        description: String,
        amount: f64,
        paid: bool,
    },
    Balance {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
    Payments,
    Pay {
        id: u64,
    },
}

pub fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    run_command_at(command, config_path, SystemClock)
}

/// Runs `command` with "today" supplied by `clock`.
pub fn run_command_at<C: Clock>(
    command: AppCommand,
    config_path: Option<&str>,
    clock: C,
) -> Result<()> {
    info!("caja starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let store = JsonFileStore::new(config.data_file_path()?);
    let mut ledger = Ledger::open(store, clock)?;

    let output = match command {
        AppCommand::Summary => cli::summary::render(&ledger, &config),
        AppCommand::SetRate { date, rate } => cli::rate::set(&mut ledger, date, rate)?,
        AppCommand::RateHistory => cli::rate::render_history(&ledger),
        AppCommand::Sale {
            date,
            amounts,
            description,
        } => {
            let sale = NewSale {
                date: date.unwrap_or_else(|| ledger.today()),
                amounts,
                description,
            };
            cli::record::sale(&mut ledger, sale)?
        }
        AppCommand::Expense {
            date,
            classification,
            description,
            amount,
            paid,
        } => {
            let expense = NewExpense {
                date: date.unwrap_or_else(|| ledger.today()),
                classification,
                description,
                amount,
                paid,
            };
            cli::record::expense(&mut ledger, expense)?
        }
        AppCommand::Balance { from, to } => {
            let range = cli::balance::resolve_range(
                from,
                to,
                ledger.today(),
                config.balance_window_days,
            );
            cli::balance::render(&ledger, &config, range)
        }
        AppCommand::Payments => cli::payments::render(&ledger, &config),
        AppCommand::Pay { id } => cli::payments::pay(&mut ledger, id)?,
    };

    println!("{output}");
    Ok(())
}
