//! Spreadsheet gateway. The Google Sheets spreadsheet is the only durable
//! store: reads pull a whole worksheet at once, writes append one row. The
//! [`SheetStore`] trait is the seam that lets tests substitute an in-memory
//! backend for the real API.

use super::config::Config;
use anyhow::{Context as _, Result};
use async_trait::async_trait;
use google_sheets4::{
    api::{Scope, ValueRange},
    hyper, hyper_rustls, oauth2, Sheets,
};
use serde_json::Value;

/// One worksheet row, keyed by the header row. Field order follows the
/// header row so tables render columns in sheet order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    /// Rows shorter than the header are padded with empty cells; cells
    /// beyond the header width are dropped.
    pub fn from_row(headers: &[String], mut row: Vec<String>) -> Self {
        if row.len() < headers.len() {
            row.resize(headers.len(), String::new());
        }
        Self {
            fields: headers.iter().cloned().zip(row).collect(),
        }
    }

    /// Value under the given header, or the empty string when the column
    /// does not exist. Missing columns must never be an error anywhere
    /// downstream, so absence and emptiness are deliberately conflated.
    pub fn get(&self, header: &str) -> &str {
        self.fields
            .iter()
            .find(|(k, _)| k == header)
            .map(|(_, v)| v.as_str())
            .unwrap_or("")
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }
}

fn records_from_rows(rows: Vec<Vec<String>>) -> Vec<Record> {
    let mut rows = rows.into_iter();
    let headers = match rows.next() {
        Some(h) => h,
        None => return Vec::new(),
    };
    rows.map(|row| Record::from_row(&headers, row)).collect()
}

#[async_trait]
pub trait SheetStore: Send + Sync {
    /// Every data row of the worksheet, header-keyed. The whole sheet is
    /// fetched on each call; there is no pagination and no caching.
    async fn records(&self, worksheet: &str) -> Result<Vec<Record>>;

    /// Append one positional row after the existing rows.
    async fn append_row(&self, worksheet: &str, values: Vec<String>) -> Result<()>;
}

type Connector = hyper_rustls::HttpsConnector<hyper::client::HttpConnector>;

/// The live gateway: a `Sheets` hub authenticated with a service account.
pub struct GoogleSheets {
    hub: Sheets<Connector>,
    sheet_id: String,
}

impl std::fmt::Debug for GoogleSheets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleSheets")
            .field("sheet_id", &self.sheet_id)
            .finish_non_exhaustive()
    }
}

impl GoogleSheets {
    /// Builds the authenticated client. Credentials come from the inline
    /// `GOOGLE_CREDENTIALS` JSON when set, otherwise from the local key
    /// file. Either source failing to parse is a hard error; no client is
    /// handed out in that case.
    pub async fn connect(config: &Config) -> Result<Self> {
        let client = hyper::Client::builder().build(
            hyper_rustls::HttpsConnectorBuilder::new()
                .with_native_roots()
                .https_or_http()
                .enable_http1()
                .build(),
        );

        let key = match &config.google_credentials {
            Some(json) => oauth2::parse_service_account_key(json)
                .context("GOOGLE_CREDENTIALS is not a valid service-account key")?,
            None => oauth2::read_service_account_key(&config.credentials_file)
                .await
                .with_context(|| {
                    format!("cannot read service-account key from {}", config.credentials_file)
                })?,
        };
        let auth = oauth2::ServiceAccountAuthenticator::with_client(key, client.clone())
            .build()
            .await
            .context("could not build the service-account authenticator")?;

        Ok(Self {
            hub: Sheets::new(client, auth),
            sheet_id: config.sheet_id.clone(),
        })
    }

    /// One-shot startup check that the spreadsheet can be opened. A failure
    /// here is remembered and shown as a banner, but the server keeps
    /// running; later page loads fail or succeed on their own.
    pub async fn probe(&self) -> Result<()> {
        self.hub
            .spreadsheets()
            .get(&self.sheet_id)
            .add_scope(Scope::Spreadsheet)
            .add_scope(Scope::Drive)
            .doit()
            .await
            .with_context(|| format!("cannot open spreadsheet {}", self.sheet_id))?;
        Ok(())
    }
}

fn cell_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait]
impl SheetStore for GoogleSheets {
    async fn records(&self, worksheet: &str) -> Result<Vec<Record>> {
        let (_, value_range) = self
            .hub
            .spreadsheets()
            .values_get(&self.sheet_id, worksheet)
            .add_scope(Scope::Spreadsheet)
            .add_scope(Scope::Drive)
            .doit()
            .await
            .with_context(|| format!("cannot read worksheet {worksheet}"))?;

        let rows = value_range
            .values
            .unwrap_or_default()
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect();
        Ok(records_from_rows(rows))
    }

    async fn append_row(&self, worksheet: &str, values: Vec<String>) -> Result<()> {
        let row = ValueRange {
            major_dimension: Some("ROWS".to_string()),
            range: None,
            values: Some(vec![values.into_iter().map(Value::String).collect()]),
        };
        self.hub
            .spreadsheets()
            .values_append(row, &self.sheet_id, worksheet)
            .value_input_option("USER_ENTERED")
            .add_scope(Scope::Spreadsheet)
            .add_scope(Scope::Drive)
            .doit()
            .await
            .with_context(|| format!("cannot append to worksheet {worksheet}"))?;
        Ok(())
    }
}
