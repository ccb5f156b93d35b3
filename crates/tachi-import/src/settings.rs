//! Configuration file and process environment.
//!
//! Both are checked with the schema validator before use, so a bad value is
//! reported with its key and the received value instead of a serde error.
//!
//! - `Settings` - `config.toml`
//! - `Environment` - `TACHI_IMPORT_*` variables (other variables are ignored)
//! - Retry constants for remote fetches

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{EnumString, IntoStaticStr};
use tracing::debug;

use crate::error::{Error, Result};
use crate::validate::{Schema, ValidateOptions, format_validation_error, validate};

/// Remote fetch retry configuration.
///
/// Exponential backoff: 250ms → 500ms between three attempts.
pub mod retry {
    /// Maximum number of attempts per request, including the first.
    pub const MAX_FETCH_ATTEMPTS: u32 = 3;

    /// Delay (in ms) after each failed attempt but the last.
    pub const RETRY_DELAYS_MS: [u64; 2] = [250, 500];
}

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DEFAULT_ARC_BASE_URL: &str = "https://arc.example.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SERVICE_NAME: &str = "tachi-import";

pub const ENV_MODE: &str = "TACHI_IMPORT_ENV";
pub const ENV_ARC_BASE_URL: &str = "TACHI_IMPORT_ARC_BASE_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the ARC API.
    pub arc_base_url: String,
    pub request_timeout_secs: u64,
    /// Service name recorded on imports created by this tool.
    pub service_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arc_base_url: DEFAULT_ARC_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            service_name: DEFAULT_SERVICE_NAME.to_string(),
        }
    }
}

fn settings_schema() -> Schema {
    Schema::object([
        ("arc_base_url", Schema::String.optional()),
        ("request_timeout_secs", Schema::positive_non_zero_integer().optional()),
        ("service_name", Schema::string_length(3, 15).optional()),
    ])
}

impl Settings {
    /// `<config dir>/tachi-import/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tachi-import").join(CONFIG_FILE_NAME))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        debug!("Loaded config from {:?}", path.as_ref());
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(content)?;
        let value = serde_json::to_value(&table)?;

        if let Some(err) = validate(&value, &settings_schema(), ValidateOptions::default()) {
            return Err(Error::ConfigParseError(format_validation_error(
                &err,
                "Invalid config file",
            )));
        }

        Ok(serde_json::from_value(value)?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Environment variables take precedence over the file.
    pub fn apply_environment(&mut self, env: &Environment) {
        if let Some(url) = &env.arc_base_url {
            self.arc_base_url = url.clone();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, IntoStaticStr)]
#[strum(serialize_all = "UPPERCASE")]
pub enum RunMode {
    #[default]
    Prod,
    Dev,
    Test,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Environment {
    pub mode: RunMode,
    pub arc_base_url: Option<String>,
}

fn environment_schema() -> Schema {
    Schema::object([
        (ENV_MODE, Schema::one_of(["PROD", "DEV", "TEST"]).optional()),
        (ENV_ARC_BASE_URL, Schema::String.optional()),
    ])
}

impl Environment {
    /// Read the current process environment. Non-UTF-8 variables are skipped.
    pub fn from_process() -> Result<Self> {
        Self::from_vars(
            std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?))),
        )
    }

    /// Validate an environment given as key/value pairs. Every key is optional
    /// and unrelated keys are allowed.
    pub fn from_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Result<Self>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let map: Map<String, Value> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), Value::String(v.into())))
            .collect();
        let value = Value::Object(map);

        if let Some(err) = validate(&value, &environment_schema(), ValidateOptions::allow_excess_keys()) {
            return Err(Error::InvalidEnvironment(format_validation_error(
                &err,
                "Cannot safely boot",
            )));
        }

        let mode = value
            .get(ENV_MODE)
            .and_then(Value::as_str)
            .and_then(|s| RunMode::from_str(s).ok())
            .unwrap_or_default();
        let arc_base_url = value
            .get(ENV_ARC_BASE_URL)
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(Self { mode, arc_base_url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_full_config() {
        let settings = Settings::parse(
            r#"
arc_base_url = "https://arc.example.com"
request_timeout_secs = 10
service_name = "my-importer"
"#,
        )
        .unwrap();

        assert_eq!(settings.arc_base_url, "https://arc.example.com");
        assert_eq!(settings.timeout(), Duration::from_secs(10));
        assert_eq!(settings.service_name, "my-importer");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        assert_eq!(Settings::parse("").unwrap(), Settings::default());
    }

    #[test]
    fn test_invalid_timeout_names_key() {
        let err = Settings::parse("request_timeout_secs = 0").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Config parse error: Invalid config file: request_timeout_secs | Expected a positive non-zero integer. | Received 0 [number]."
        );
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = Settings::parse("arc_url = \"x\"").unwrap_err();
        assert!(err.to_string().contains("Unexpected properties in object: arc_url"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "service_name = \"batchy\"").unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.service_name, "batchy");
        assert_eq!(settings.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Settings::load(dir.path().join("nope.toml")),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_environment_ignores_unrelated_keys() {
        let env = Environment::from_vars([
            ("PATH", "/usr/bin"),
            ("HOME", "/root"),
            (ENV_MODE, "DEV"),
        ])
        .unwrap();

        assert_eq!(env.mode, RunMode::Dev);
        assert!(env.arc_base_url.is_none());
    }

    #[test]
    fn test_environment_mode_defaults_to_prod() {
        let env = Environment::from_vars(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(env, Environment::default());
        assert_eq!(env.mode, RunMode::Prod);
    }

    #[test]
    fn test_environment_rejects_bad_mode() {
        let err = Environment::from_vars([(ENV_MODE, "STAGING")]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid environment: Cannot safely boot: TACHI_IMPORT_ENV | Expected any of PROD, DEV, TEST. | Received STAGING [string]."
        );
    }

    #[test]
    fn test_environment_overrides_settings() {
        let env = Environment::from_vars([(ENV_ARC_BASE_URL, "http://localhost:8080")]).unwrap();
        let mut settings = Settings::default();
        settings.apply_environment(&env);
        assert_eq!(settings.arc_base_url, "http://localhost:8080");
    }
}
