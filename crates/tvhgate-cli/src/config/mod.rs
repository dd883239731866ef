//! Application configuration module.
//!
//! TOML config file with environment variable overrides for the backend
//! connection, advertised device identity, stream parameters and refresh
//! scheduling.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::AppConfig;
pub use paths::resolve_config_path;
