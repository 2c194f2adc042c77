//! Runtime configuration, read once at startup. `main` loads `.env` via
//! dotenvy before this runs, so a local env file works the same as real
//! environment variables.

use std::env;

/// Worksheet holding one row per property.
pub const PROPERTIES_WORKSHEET: &str = "Properties";
/// Worksheet holding one row per payment.
pub const PAYMENTS_WORKSHEET: &str = "Payments";

/// Stands in when `SHEET_ID` is unset, so the startup probe fails with a
/// message that names the actual problem.
pub const SHEET_ID_PLACEHOLDER: &str = "REPLACE_WITH_SHEET_ID";

#[derive(Clone, Debug)]
pub struct Config {
    /// Identifier of the spreadsheet we treat as the database.
    pub sheet_id: String,
    /// Inline service-account key JSON; takes precedence over the file.
    pub google_credentials: Option<String>,
    /// Fallback service-account key file, relative to the working directory.
    pub credentials_file: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            sheet_id: env::var("SHEET_ID")
                .unwrap_or_else(|_| SHEET_ID_PLACEHOLDER.to_string()),
            google_credentials: env::var("GOOGLE_CREDENTIALS").ok(),
            credentials_file: "credentials.json".to_string(),
        }
    }
}
