//! Records kept in the cash book and their persisted form.
//!
//! Field names on disk are the ones the document has always used (`fecha`,
//! `monto_bs`, ...), so existing `balance_data.json` files load unchanged.

use crate::core::error::RecordError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::Display;
use std::str::FromStr;

/// Anything that happened on a calendar day.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

/// Expense category used for grouped reporting.
///
/// The five known labels are offered to the operator, but any other label
/// found in a document is kept as-is and reported as its own group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Classification {
    Administrative,
    Maintenance,
    Payroll,
    Sales,
    RawMaterials,
    Other(String),
}

impl Classification {
    pub const KNOWN: [Classification; 5] = [
        Classification::Administrative,
        Classification::Maintenance,
        Classification::Payroll,
        Classification::Sales,
        Classification::RawMaterials,
    ];

    pub fn label(&self) -> &str {
        match self {
            Classification::Administrative => "Gastos administrativos",
            Classification::Maintenance => "Gastos Mantenimiento",
            Classification::Payroll => "Gastos Nómina",
            Classification::Sales => "Gastos Venta",
            Classification::RawMaterials => "Gastos x Compras Materia Prima",
            Classification::Other(label) => label,
        }
    }

    /// Short name accepted on the command line.
    pub fn alias(&self) -> Option<&'static str> {
        match self {
            Classification::Administrative => Some("admin"),
            Classification::Maintenance => Some("maintenance"),
            Classification::Payroll => Some("payroll"),
            Classification::Sales => Some("sales"),
            Classification::RawMaterials => Some("raw-materials"),
            Classification::Other(_) => None,
        }
    }
}

impl From<String> for Classification {
    fn from(label: String) -> Self {
        Classification::KNOWN
            .into_iter()
            .find(|c| c.label() == label)
            .unwrap_or(Classification::Other(label))
    }
}

impl From<Classification> for String {
    fn from(classification: Classification) -> Self {
        match classification {
            Classification::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

/// Lenient parsing for user input: aliases and labels match case-insensitively.
impl FromStr for Classification {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let known = Classification::KNOWN.into_iter().find(|c| {
            c.label().eq_ignore_ascii_case(input)
                || c.alias().is_some_and(|a| a.eq_ignore_ascii_case(input))
        });
        Ok(known.unwrap_or_else(|| Classification::from(input.to_string())))
    }
}

impl Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The four ways a sale is collected, all in local currency.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SaleAmounts {
    pub point_of_sale: f64,
    pub foreign_cash: f64,
    pub external: f64,
    pub local_cash: f64,
}

impl SaleAmounts {
    pub fn total(&self) -> f64 {
        self.point_of_sale + self.foreign_cash + self.external + self.local_cash
    }

    pub fn labelled(&self) -> [(&'static str, f64); 4] {
        [
            ("Point of sale", self.point_of_sale),
            ("$ cash", self.foreign_cash),
            ("External sale", self.external),
            ("Bs. cash", self.local_cash),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
    #[serde(rename = "punto_venta_bs")]
    pub point_of_sale: f64,
    #[serde(rename = "dolar_cash_bs")]
    pub foreign_cash: f64,
    #[serde(rename = "venta_externa_bs")]
    pub external: f64,
    #[serde(rename = "bs_cash_bs")]
    pub local_cash: f64,
    #[serde(rename = "total_bs")]
    pub total_local: f64,
    #[serde(rename = "total_usd")]
    pub total_ref: f64,
    #[serde(rename = "descripcion", default)]
    pub description: String,
    #[serde(rename = "tasa_cambio")]
    pub rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
}

impl Sale {
    /// Builds a sale, deriving both totals from the components and `rate`.
    pub fn new(
        id: u64,
        date: NaiveDate,
        amounts: SaleAmounts,
        description: String,
        rate: f64,
    ) -> Self {
        let total_local = amounts.total();
        Self {
            date,
            point_of_sale: amounts.point_of_sale,
            foreign_cash: amounts.foreign_cash,
            external: amounts.external,
            local_cash: amounts.local_cash,
            total_local,
            total_ref: total_local / rate,
            description,
            rate,
            id: Some(id),
        }
    }

    pub fn amounts(&self) -> SaleAmounts {
        SaleAmounts {
            point_of_sale: self.point_of_sale,
            foreign_cash: self.foreign_cash,
            external: self.external,
            local_cash: self.local_cash,
        }
    }
}

impl Dated for Sale {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// An expense. `paid_on` is `Some` exactly when the expense has been paid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ExpenseRecord", into = "ExpenseRecord")]
pub struct Expense {
    pub date: NaiveDate,
    pub classification: Classification,
    pub description: String,
    pub amount_local: f64,
    pub amount_ref: f64,
    pub rate: f64,
    pub id: Option<u64>,
    pub paid_on: Option<NaiveDate>,
}

impl Expense {
    pub fn new(
        id: u64,
        date: NaiveDate,
        classification: Classification,
        description: String,
        amount_local: f64,
        rate: f64,
    ) -> Self {
        Self {
            date,
            classification,
            description,
            amount_local,
            amount_ref: amount_local / rate,
            rate,
            id: Some(id),
            paid_on: None,
        }
    }

    pub fn is_paid(&self) -> bool {
        self.paid_on.is_some()
    }
}

impl Dated for Expense {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// On-disk shape of an expense, with the paid flag and payment date stored
/// side by side.
#[derive(Serialize, Deserialize)]
struct ExpenseRecord {
    #[serde(rename = "fecha")]
    date: NaiveDate,
    #[serde(rename = "clasificacion")]
    classification: Classification,
    #[serde(rename = "descripcion", default)]
    description: String,
    #[serde(rename = "monto_bs")]
    amount_local: f64,
    #[serde(rename = "monto_usd")]
    amount_ref: f64,
    #[serde(rename = "tasa_cambio")]
    rate: f64,
    #[serde(rename = "pagado", default)]
    paid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<u64>,
    #[serde(rename = "fecha_pago", default)]
    paid_on: Option<NaiveDate>,
}

impl TryFrom<ExpenseRecord> for Expense {
    type Error = RecordError;

    fn try_from(record: ExpenseRecord) -> Result<Self, Self::Error> {
        match (record.paid, record.paid_on) {
            (true, None) => return Err(RecordError::MissingPaymentDate(record.id)),
            (false, Some(_)) => return Err(RecordError::UnexpectedPaymentDate(record.id)),
            _ => {}
        }
        Ok(Self {
            date: record.date,
            classification: record.classification,
            description: record.description,
            amount_local: record.amount_local,
            amount_ref: record.amount_ref,
            rate: record.rate,
            id: record.id,
            paid_on: record.paid_on,
        })
    }
}

impl From<Expense> for ExpenseRecord {
    fn from(expense: Expense) -> Self {
        Self {
            date: expense.date,
            classification: expense.classification,
            description: expense.description,
            amount_local: expense.amount_local,
            amount_ref: expense.amount_ref,
            rate: expense.rate,
            paid: expense.paid_on.is_some(),
            id: expense.id,
            paid_on: expense.paid_on,
        }
    }
}

/// Local-currency units per one reference-currency unit, as of `date`.
///
/// Loading rejects a rate that is not a positive finite number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RateRecord", into = "RateRecord")]
pub struct ExchangeRate {
    pub date: NaiveDate,
    pub rate: f64,
}

#[derive(Serialize, Deserialize)]
struct RateRecord {
    #[serde(rename = "fecha")]
    date: NaiveDate,
    #[serde(rename = "tasa")]
    rate: f64,
}

impl TryFrom<RateRecord> for ExchangeRate {
    type Error = RecordError;

    fn try_from(record: RateRecord) -> Result<Self, Self::Error> {
        if !(record.rate.is_finite() && record.rate > 0.0) {
            return Err(RecordError::InvalidRate(record.date, record.rate));
        }
        Ok(Self {
            date: record.date,
            rate: record.rate,
        })
    }
}

impl From<ExchangeRate> for RateRecord {
    fn from(rate: ExchangeRate) -> Self {
        Self {
            date: rate.date,
            rate: rate.rate,
        }
    }
}

/// Everything the cash book persists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "ventas", default)]
    pub sales: Vec<Sale>,
    #[serde(rename = "gastos", default)]
    pub expenses: Vec<Expense>,
    #[serde(rename = "tasas_cambio", default)]
    pub rates: Vec<ExchangeRate>,
}

/// A sale as entered by the operator, before a rate is applied.
#[derive(Debug, Clone)]
pub struct NewSale {
    pub date: NaiveDate,
    pub amounts: SaleAmounts,
    pub description: String,
}

/// An expense as entered by the operator, before a rate is applied.
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub date: NaiveDate,
    pub classification: Classification,
    pub description: String,
    pub amount: f64,
    pub paid: bool,
}
