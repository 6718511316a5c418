/// Named credential lookup
///
/// Resolution order is fixed: explicit config value, then process
/// environment, then the secret store file. Empty values count as unset.
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use crate::error::{Result, VolaError};
use crate::types::AppConfig;

/// Service-account JSON blob for the Sheets exporter
pub const GSPREAD_CRED_JSON: &str = "GSPREAD_CRED_JSON";
/// Target spreadsheet id
pub const GSHEET_KEY: &str = "GSHEET_KEY";

/// Where a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialOrigin {
    Explicit,
    Environment,
    SecretStore,
}

pub struct CredentialResolver {
    explicit: HashMap<String, String>,
    secrets: HashMap<String, String>,
    env_lookup: fn(&str) -> Option<String>,
}

impl Default for CredentialResolver {
    fn default() -> Self {
        CredentialResolver::new()
    }
}

impl CredentialResolver {
    pub fn new() -> Self {
        CredentialResolver {
            explicit: HashMap::new(),
            secrets: HashMap::new(),
            env_lookup: |name| std::env::var(name).ok(),
        }
    }

    /// Resolver seeded from config values and the configured secret store
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let mut resolver = CredentialResolver::new();

        if let Some(blob) = &config.gspread_cred_json {
            resolver = resolver.with_explicit(GSPREAD_CRED_JSON, blob);
        }
        if let Some(key) = &config.sheet_key {
            resolver = resolver.with_explicit(GSHEET_KEY, key);
        }

        let secrets_path = Path::new(&config.secrets_path);
        if secrets_path.exists() {
            resolver = resolver.with_secrets(load_secrets(secrets_path)?);
        }

        Ok(resolver)
    }

    pub fn with_explicit(mut self, name: &str, value: &str) -> Self {
        self.explicit.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_secrets(mut self, secrets: HashMap<String, String>) -> Self {
        self.secrets = secrets;
        self
    }

    /// Replace the environment lookup (tests, sandboxed runs)
    pub fn with_env_lookup(mut self, lookup: fn(&str) -> Option<String>) -> Self {
        self.env_lookup = lookup;
        self
    }

    pub fn lookup(&self, name: &str) -> Option<(String, CredentialOrigin)> {
        let non_empty = |v: &String| !v.trim().is_empty();

        if let Some(v) = self.explicit.get(name).filter(|v| non_empty(v)) {
            return Some((v.clone(), CredentialOrigin::Explicit));
        }
        if let Some(v) = (self.env_lookup)(name).filter(non_empty) {
            return Some((v, CredentialOrigin::Environment));
        }
        self.secrets
            .get(name)
            .filter(|v| non_empty(v))
            .map(|v| (v.clone(), CredentialOrigin::SecretStore))
    }

    /// Resolve `name` or fail with a configuration error naming it
    pub fn resolve(&self, name: &str) -> Result<String> {
        match self.lookup(name) {
            Some((value, origin)) => {
                debug!("Resolved {} from {:?}", name, origin);
                Ok(value)
            }
            None => Err(VolaError::MissingConfig(name.to_string())),
        }
    }
}

/// Read top-level string entries of a TOML secret store
pub fn load_secrets<P: AsRef<Path>>(path: P) -> Result<HashMap<String, String>> {
    let content = std::fs::read_to_string(path.as_ref())?;
    let table: toml::Table = toml::from_str(&content)
        .map_err(|e| VolaError::ConfigError(format!("Failed to parse secrets: {}", e)))?;

    Ok(table
        .into_iter()
        .filter_map(|(k, v)| match v {
            toml::Value::String(s) => Some((k, s)),
            _ => None,
        })
        .collect())
}
