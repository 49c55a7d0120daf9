use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

use super::api_server::ApiServer;

#[derive(Debug, Deserialize, Clone, Default)]
#[allow(unused)]
pub struct Settings {
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub api: ApiServer,
}

impl Settings {
    pub fn get_environment() -> Environment {
        Environment::default()
            .prefix("STACKS")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }

    /// Layered configuration, lowest precedence first: built-in
    /// defaults, `config/default`, `config/{run_mode}`, `config/local`,
    /// then `STACKS__`-prefixed environment variables.
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("STACKS_RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .set_default("api.bind_address", "0.0.0.0:8080")?
            .set_default("api.public_catalog_reads", true)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(Self::get_environment());

        let s = builder.build()?;
        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_deserialize_from_an_empty_config() {
        let config = Config::builder().build().unwrap();
        let settings: Settings = config.try_deserialize().unwrap();
        assert!(settings.api.public_catalog_reads);
        assert_eq!(settings.api.admin_username, "admin");
        assert!(settings.api.admin_password.is_none());
    }
}
