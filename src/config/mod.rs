mod types;

pub use types::*;

use crate::{Error, Result};
use std::{env, path::Path};
use tracing::debug;

pub async fn load() -> Result<Config> {
    // A missing .env is the normal case outside local development.
    let _ = dotenvy::dotenv();

    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());
    let mut config = load_from_path(&config_path).await?;
    apply_env_overrides(&mut config, |key| env::var(key).ok())?;
    validate(&config)?;

    Ok(config)
}

/// Reads the YAML file at `path`, falling back to defaults when it does not exist.
pub async fn load_from_path(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();

    if !tokio::fs::try_exists(path).await? {
        debug!("No configuration file at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    debug!("Loading configuration from: {}", path.display());

    let config_str = tokio::fs::read_to_string(path).await?;
    if config_str.trim().is_empty() {
        return Ok(Config::default());
    }
    let config: Config = serde_yaml::from_str(&config_str)?;

    Ok(config)
}

/// Applies `GEMINI_API_KEY`, `PORT`, `APP_ENV` and `LLM_TIMEOUT_SECS` on top of the file values.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(api_key) = lookup("GEMINI_API_KEY").filter(|v| !v.is_empty()) {
        config.llm.api_key = api_key;
    }

    if let Some(port) = lookup("PORT") {
        config.server.port = port
            .parse()
            .map_err(|_| Error::config(format!("Invalid PORT value: '{port}'")))?;
    }

    if let Some(environment) = lookup("APP_ENV") {
        config.server.environment = environment.parse().map_err(Error::config)?;
    }

    if let Some(timeout) = lookup("LLM_TIMEOUT_SECS") {
        config.llm.timeout_secs = timeout
            .parse()
            .map_err(|_| Error::config(format!("Invalid LLM_TIMEOUT_SECS value: '{timeout}'")))?;
    }

    Ok(())
}

pub fn validate(config: &Config) -> Result<()> {
    if config.llm.api_key.trim().is_empty() {
        return Err(Error::config(
            "llm.api_key is empty; set it in the config file or via GEMINI_API_KEY",
        ));
    }
    if config.llm.model.trim().is_empty() {
        return Err(Error::config("llm.model must not be empty"));
    }
    if config.llm.timeout_secs == 0 {
        return Err(Error::config("llm.timeout_secs must be greater than zero"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_env_overrides_replace_file_values() {
        let mut config = Config::default();
        apply_env_overrides(
            &mut config,
            lookup_from(&[
                ("GEMINI_API_KEY", "from-env"),
                ("PORT", "8081"),
                ("APP_ENV", "production"),
                ("LLM_TIMEOUT_SECS", "12"),
            ]),
        )
        .unwrap();

        assert_eq!(config.llm.api_key, "from-env");
        assert_eq!(config.server.port, 8081);
        assert!(config.server.environment.is_production());
        assert_eq!(config.llm.timeout_secs, 12);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let mut config = Config::default();
        let result = apply_env_overrides(&mut config, lookup_from(&[("PORT", "eighty")]));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_empty_api_key_fails_validation() {
        let config = Config::default();
        assert!(matches!(validate(&config), Err(Error::Config(_))));
    }

    #[test]
    fn test_zero_timeout_fails_validation() {
        let mut config = Config::default();
        config.llm.api_key = "key".to_string();
        config.llm.timeout_secs = 0;
        assert!(matches!(validate(&config), Err(Error::Config(_))));
    }
}
