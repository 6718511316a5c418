/// Core type definitions for the volatility tracker
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Trading days per year used for annualization
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;
/// Hours in the reference trading session
pub const SESSION_HOURS: f64 = 6.5;

/// OHLC bar, used both for raw 1-minute bars and resampled candles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Bar {
    pub fn new(timestamp: DateTime<Utc>, open: f64, high: f64, low: f64, close: f64) -> Self {
        Bar { timestamp, open, high, low, close }
    }

    /// Bar where all four prices are the same value
    pub fn flat(timestamp: DateTime<Utc>, value: f64) -> Self {
        Bar::new(timestamp, value, value, value, value)
    }
}

/// Price bar enriched with its log return and rolling annualized volatility
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolatilityRow {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub ret: f64,
    pub vola: f64,
}

impl VolatilityRow {
    pub fn bar(&self) -> Bar {
        Bar::new(self.timestamp, self.open, self.high, self.low, self.close)
    }
}

/// Annualization basis for the volatility statistic
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Annualization {
    /// 1-minute bars: 252 days * 6.5 hours * 60 minutes
    Minute,
    /// Daily bars: 252 trading days
    Daily,
    Custom { periods_per_year: f64 },
}

impl Annualization {
    pub fn periods_per_year(&self) -> f64 {
        match self {
            Annualization::Minute => TRADING_DAYS_PER_YEAR * SESSION_HOURS * 60.0,
            Annualization::Daily => TRADING_DAYS_PER_YEAR,
            Annualization::Custom { periods_per_year } => *periods_per_year,
        }
    }

    pub fn factor(&self) -> f64 {
        self.periods_per_year().sqrt()
    }

    pub fn as_str(&self) -> &str {
        match self {
            Annualization::Minute => "MINUTE",
            Annualization::Daily => "DAILY",
            Annualization::Custom { .. } => "CUSTOM",
        }
    }
}

/// Where the Sheets service-account credential comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialSource {
    /// JSON blob resolved by name (explicit config, environment, secret store)
    Env,
    /// JSON key file on disk
    File,
}

/// Parameters of one volatility computation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolatilityConfig {
    pub window: usize,
    pub annualization: Annualization,
    pub credential_source: CredentialSource,
}

/// Configuration for the tracker
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    // Market Data
    pub symbol: String,
    pub rate_limit_per_sec: u32,
    pub chart_base_url: String,

    // Volatility
    pub window: usize,
    pub annualization: Annualization,
    /// Rolling window in trading days for the daily analog
    pub daily_window: usize,

    // Dashboard
    pub interval: String,
    pub cache_ttl_sec: u64,
    pub refresh_interval_sec: u64,

    // Export
    pub excel_path: String,
    pub sheet_key: Option<String>,
    pub worksheet: String,
    pub sheets_base_url: String,

    // Credentials
    pub credential_source: CredentialSource,
    pub credentials_path: String,
    pub gspread_cred_json: Option<String>,
    pub secrets_path: String,

    // Logging
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            symbol: "^BSESN".to_string(),
            rate_limit_per_sec: 2,
            chart_base_url: crate::data::yahoo::DEFAULT_BASE_URL.to_string(),
            window: 5,
            annualization: Annualization::Minute,
            daily_window: 20,
            interval: "1 Minute".to_string(),
            cache_ttl_sec: 60,
            refresh_interval_sec: 60,
            excel_path: "sensex_volatility.xlsx".to_string(),
            sheet_key: None,
            worksheet: "Sheet1".to_string(),
            sheets_base_url: crate::export::gsheet::SHEETS_BASE_URL.to_string(),
            credential_source: CredentialSource::Env,
            credentials_path: "credentials.json".to_string(),
            gspread_cred_json: None,
            secrets_path: "secrets.toml".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn volatility(&self) -> VolatilityConfig {
        VolatilityConfig {
            window: self.window,
            annualization: self.annualization,
            credential_source: self.credential_source,
        }
    }
}
