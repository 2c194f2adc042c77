use super::sheets::{Record, SheetStore};
use anyhow::{Context as _, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;

/// Shared handler state. The gateway is built once in `main` and injected
/// here instead of living in a memoized global, so tests can swap in a fake
/// backend.
#[derive(Clone)]
pub struct AppState {
    pub sheets: Arc<dyn SheetStore>,
    /// Message from a failed startup probe; rendered as a banner on the
    /// overview while the server keeps serving in a degraded state.
    pub probe_error: Option<String>,
}

pub mod columns {
    pub const ID: &str = "Id";
    pub const ADDRESS: &str = "Address";
    pub const OWNER: &str = "Owner";
    pub const STATUS: &str = "Status";
    pub const NEXT_PAYMENT_DATE: &str = "NextPaymentDate";
    pub const DATE: &str = "Date";
    pub const AMOUNT: &str = "Amount";
}

/// Dates are stored in the sheet as e.g. "2024.01.15".
pub const SHEET_DATE_FORMAT: &str = "%Y.%m.%d";
/// What an `<input type="date">` submits.
const FORM_DATE_FORMAT: &str = "%Y-%m-%d";

/// One row of the Properties worksheet. Status and date stay raw strings:
/// the sheet is hand-edited, so anything can show up in those cells, and
/// the charts group by whatever text is there.
#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    pub id: String,
    pub address: String,
    pub owner: String,
    pub status: String,
    pub next_payment_date: String,
}

impl Property {
    pub fn from_record(record: &Record) -> Self {
        Self {
            id: record.get(columns::ID).to_string(),
            address: record.get(columns::ADDRESS).to_string(),
            owner: record.get(columns::OWNER).to_string(),
            status: record.get(columns::STATUS).to_string(),
            next_payment_date: record.get(columns::NEXT_PAYMENT_DATE).to_string(),
        }
    }

    /// Only the exact status "Active" counts towards the active metric.
    pub fn is_active(&self) -> bool {
        self.status == "Active"
    }
}

/// One row of the Payments worksheet. A non-numeric or empty amount cell
/// becomes `None` rather than an error.
#[derive(Clone, Debug, PartialEq)]
pub struct Payment {
    pub date: String,
    pub amount: Option<f64>,
    pub status: String,
}

impl Payment {
    pub fn from_record(record: &Record) -> Self {
        Self {
            date: record.get(columns::DATE).to_string(),
            amount: record.get(columns::AMOUNT).trim().parse().ok(),
            status: record.get(columns::STATUS).to_string(),
        }
    }

    pub fn is_paid(&self) -> bool {
        self.status == "Paid"
    }
}

/// The add-property form submission. The status select constrains its own
/// values; the text fields are accepted as-is, empty included.
#[derive(Debug, Deserialize)]
pub struct PropertyForm {
    pub id: String,
    pub address: String,
    pub owner: String,
    pub status: String,
    pub next_payment_date: String,
}

impl PropertyForm {
    /// The positional row appended to the Properties worksheet, with the
    /// date reformatted from the date input's `2024-01-15` to the sheet's
    /// `2024.01.15`. An unparseable date is a submission error.
    pub fn into_row(self) -> Result<Vec<String>> {
        let date = NaiveDate::parse_from_str(&self.next_payment_date, FORM_DATE_FORMAT)
            .with_context(|| format!("{:?} is not a valid date", self.next_payment_date))?;
        Ok(vec![
            self.id,
            self.address,
            self.owner,
            self.status,
            date.format(SHEET_DATE_FORMAT).to_string(),
        ])
    }
}
