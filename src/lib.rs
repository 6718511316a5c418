pub mod types;
pub mod error;
pub mod config;
pub mod time;
pub mod analytics;
pub mod data;
pub mod pipeline;
pub mod export;
pub mod dashboard;
pub mod utils;
pub mod app;

pub use types::*;
pub use error::{Result, VolaError};
