mod config;
mod error;
mod interner;

pub use config::{DashboardConfigExt, config_path};
pub use error::ConfigError;
pub use interner::{IStr, StringTable, StringTableBuilder};
