use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;
use std::env;

/// Environment variable naming the deployment environment (`dev`, `test`, `prod`).
pub const ENVIRONMENT_VAR: &str = "ENVIRONMENT";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

/// Whether the process runs with `ENVIRONMENT=prod`.
pub fn is_production() -> bool {
    env::var(ENVIRONMENT_VAR).unwrap_or_else(|_| "dev".to_string()) == "prod"
}

/// Read a required service variable.
///
/// Outside production a missing variable falls back to `default`; in
/// production every variable has to be set explicitly.
pub fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

/// Read an optional variable; unset and empty values are both `None`.
pub fn get_optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|val| !val.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_env_prefers_the_environment() {
        unsafe { env::set_var("CORE_TEST_GET_ENV_SET", "from-env") };
        let value = get_env("CORE_TEST_GET_ENV_SET", Some("fallback"), false).unwrap();
        assert_eq!(value, "from-env");
    }

    #[test]
    fn get_env_falls_back_to_default_outside_production() {
        let value = get_env("CORE_TEST_GET_ENV_UNSET", Some("fallback"), false).unwrap();
        assert_eq!(value, "fallback");
    }

    #[test]
    fn get_env_requires_variables_in_production() {
        let err = get_env("CORE_TEST_GET_ENV_PROD", Some("fallback"), true).unwrap_err();
        assert!(err.to_string().contains("required in production"));
    }

    #[test]
    fn get_env_without_default_is_an_error() {
        let err = get_env("CORE_TEST_GET_ENV_NO_DEFAULT", None, false).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }

    #[test]
    fn empty_optional_env_is_none() {
        unsafe { env::set_var("CORE_TEST_OPTIONAL_EMPTY", "") };
        assert_eq!(get_optional_env("CORE_TEST_OPTIONAL_EMPTY"), None);
        assert_eq!(get_optional_env("CORE_TEST_OPTIONAL_UNSET"), None);
    }
}
