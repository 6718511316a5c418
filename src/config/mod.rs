pub mod loader;
pub mod credentials;

pub use loader::{load_config, validate_config};
pub use credentials::{load_secrets, CredentialOrigin, CredentialResolver, GSHEET_KEY, GSPREAD_CRED_JSON};
