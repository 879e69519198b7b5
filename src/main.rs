use anyhow::Result;
use caja::core::log::init_logging;
use caja::core::model::{Classification, SaleAmounts};
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display cumulative totals and today's figures
    Summary,
    /// Configure or inspect the exchange rate
    #[command(subcommand)]
    Rate(RateCommands),
    /// Register a sale
    Sale {
        /// Day of the sale (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,
        /// Point of sale amount (Bs)
        #[arg(long, default_value_t = 0.0)]
        pos: f64,
        /// Dollars received in cash, expressed in Bs
        #[arg(long, default_value_t = 0.0)]
        usd_cash: f64,
        /// External sale amount (Bs)
        #[arg(long, default_value_t = 0.0)]
        external: f64,
        /// Bolivars received in cash (Bs)
        #[arg(long, default_value_t = 0.0)]
        cash: f64,
        /// Optional description
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Register an expense
    Expense {
        /// Day of the expense (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,
        /// Classification label or alias (admin, maintenance, payroll, sales, raw-materials)
        #[arg(short = 'k', long)]
        classification: Classification,
        /// Amount in Bs
        #[arg(short, long)]
        amount: f64,
        /// What the expense was for
        #[arg(long, default_value = "")]
        description: String,
        /// The expense is already paid
        #[arg(long)]
        paid: bool,
    },
    /// Display the balance over a date range
    Balance {
        /// First day of the range (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last day of the range (YYYY-MM-DD), defaults to today
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Display pending expenses and recent payments
    Payments,
    /// Mark an expense as paid today
    Pay {
        /// Id of the expense
        id: u64,
    },
}

#[derive(Subcommand)]
enum RateCommands {
    /// Record a new exchange rate (Bs per $)
    Set {
        rate: f64,
        /// Day the rate applies from (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Display the current rate and the rate history
    History,
}

impl From<Commands> for caja::AppCommand {
    fn from(cmd: Commands) -> caja::AppCommand {
        match cmd {
            Commands::Summary => caja::AppCommand::Summary,
            Commands::Rate(RateCommands::Set { rate, date }) => {
                caja::AppCommand::SetRate { date, rate }
            }
            Commands::Rate(RateCommands::History) => caja::AppCommand::RateHistory,
            Commands::Sale {
                date,
                pos,
                usd_cash,
                external,
                cash,
                description,
            } => caja::AppCommand::Sale {
                date,
                amounts: SaleAmounts {
                    point_of_sale: pos,
                    foreign_cash: usd_cash,
                    external,
                    local_cash: cash,
                },
                description,
            },
            Commands::Expense {
                date,
                classification,
                amount,
                description,
                paid,
            } => caja::AppCommand::Expense {
                date,
                classification,
                description,
                amount,
                paid,
            },
            Commands::Balance { from, to } => caja::AppCommand::Balance { from, to },
            Commands::Payments => caja::AppCommand::Payments,
            Commands::Pay { id } => caja::AppCommand::Pay { id },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => caja::cli::setup::setup(),
        Some(cmd) => caja::run_command(cmd.into(), cli.config_path.as_deref()),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
