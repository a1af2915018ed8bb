//! Calendar settings persistence.
//! Settings live in a TOML file inside the platform config directory.

mod service;

pub use service::{database_path, SettingsService};
