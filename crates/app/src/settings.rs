//! Settings for the command line front end.
//!
//! Values are read, lowest priority first, from the built-in defaults, an
//! optional TOML file (`config/quota.toml` unless `--config` says otherwise),
//! `QUOTA_*` environment variables and finally the global CLI flags.

use serde::Deserialize;

use crate::{cli::GlobalArgs, error::Result};

const DEFAULT_CONFIG_PATH: &str = "config/quota.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// JSON file holding people and transactions.
    pub store_path: String,
    /// Log level for the `quota` and `engine` targets.
    pub level: String,
    /// Category given to expenses entered without one.
    pub default_category: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_path: "quota.json".to_string(),
            level: "info".to_string(),
            default_category: engine::DEFAULT_CATEGORY.to_string(),
        }
    }
}

pub fn load(args: &GlobalArgs) -> Result<Settings> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("QUOTA"));
    let mut settings: Settings = builder.build()?.try_deserialize()?;

    if let Some(store) = &args.store {
        settings.store_path = store.clone();
    }
    if let Some(level) = &args.level {
        settings.level = level.clone();
    }

    Ok(settings)
}
