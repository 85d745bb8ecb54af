//! Process configuration read from the environment (and `.env`).

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::notify::{TelegramConfig, DEFAULT_TELEGRAM_API_BASE};
use crate::printer::{PrintBackend, PrinterRegistry, DEFAULT_PRINTER_KEY};
use crate::report::{Locale, ValidationMode};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 2020;
const DEFAULT_PRINT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_NOTIFY_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {message}")]
    Invalid { var: &'static str, message: String },
    #[error("DEFAULT_PRINTER '{key}' is not in the printer registry ({available})")]
    UnknownDefaultPrinter { key: String, available: String },
}

impl ConfigError {
    fn invalid(var: &'static str, message: impl ToString) -> Self {
        Self::Invalid {
            var,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub scratch_dir: PathBuf,
    pub default_printer: String,
    pub printers: PrinterRegistry,
    pub validation_mode: ValidationMode,
    pub locale: Locale,
    pub print_backend: PrintBackend,
    pub print_timeout: Duration,
    pub telegram: Option<TelegramConfig>,
    pub retention: Option<Duration>,
    /// Empty means any origin is allowed.
    pub cors_allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            scratch_dir: std::env::temp_dir(),
            default_printer: DEFAULT_PRINTER_KEY.to_string(),
            printers: PrinterRegistry::builtin(),
            validation_mode: ValidationMode::default(),
            locale: Locale::default(),
            print_backend: PrintBackend::default(),
            print_timeout: Duration::from_secs(DEFAULT_PRINT_TIMEOUT_SECS),
            telegram: None,
            retention: None,
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build the configuration from an arbitrary variable source. Blank
    /// values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| {
            lookup(var)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let host = get("HOST").unwrap_or(defaults.host);
        let port = parse_var(&get, "PORT")?.unwrap_or(defaults.port);
        let scratch_dir = get("SCRATCH_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.scratch_dir);

        let printers = match get("PRINTERS") {
            Some(list) => {
                PrinterRegistry::parse(&list).map_err(|e| ConfigError::invalid("PRINTERS", e))?
            }
            None => defaults.printers,
        };
        let default_printer = get("DEFAULT_PRINTER")
            .map(|key| key.to_ascii_lowercase())
            .unwrap_or(defaults.default_printer);
        if !printers.contains(&default_printer) {
            return Err(ConfigError::UnknownDefaultPrinter {
                key: default_printer,
                available: printers.keys().join(", "),
            });
        }

        let validation_mode =
            parse_var(&get, "VALIDATION_MODE")?.unwrap_or(defaults.validation_mode);
        let locale = parse_var(&get, "REPORT_LOCALE")?.unwrap_or(defaults.locale);
        let print_backend = parse_var(&get, "PRINT_BACKEND")?.unwrap_or(defaults.print_backend);
        let print_timeout = parse_var(&get, "PRINT_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.print_timeout);

        let telegram = match (get("TELEGRAM_BOT_TOKEN"), get("TELEGRAM_CHAT_ID")) {
            (Some(bot_token), Some(chat_id)) => Some(TelegramConfig {
                bot_token,
                chat_id,
                api_base: get("TELEGRAM_API_BASE")
                    .unwrap_or_else(|| DEFAULT_TELEGRAM_API_BASE.to_string()),
                timeout: Duration::from_secs(
                    parse_var(&get, "NOTIFY_TIMEOUT_SECS")?.unwrap_or(DEFAULT_NOTIFY_TIMEOUT_SECS),
                ),
            }),
            _ => None,
        };

        let retention = match parse_var::<u64, _>(&get, "ARTIFACT_RETENTION_HOURS")? {
            Some(0) => {
                return Err(ConfigError::invalid(
                    "ARTIFACT_RETENTION_HOURS",
                    "must be greater than zero",
                ))
            }
            Some(hours) => Some(Duration::from_secs(hours * 3600)),
            None => None,
        };

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            host,
            port,
            scratch_dir,
            default_printer,
            printers,
            validation_mode,
            locale,
            print_backend,
            print_timeout,
            telegram,
            retention,
            cors_allowed_origins,
        })
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

fn parse_var<T, G>(get: &G, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
    G: Fn(&str) -> Option<String>,
{
    get(var)
        .map(|raw| raw.parse::<T>().map_err(|e| ConfigError::invalid(var, e)))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 2020);
        assert_eq!(config.default_printer, "p1");
        assert_eq!(config.validation_mode, ValidationMode::Lenient);
        assert_eq!(config.locale, Locale::En);
        assert_eq!(config.print_backend, PrintBackend::System);
        assert_eq!(config.print_timeout, Duration::from_secs(15));
        assert!(config.telegram.is_none());
        assert!(config.retention.is_none());
        assert!(config.cors_allowed_origins.is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("PRINTERS", "kitchen=Kitchen Printer,bar=Bar Printer"),
            ("DEFAULT_PRINTER", "BAR"),
            ("VALIDATION_MODE", "strict"),
            ("REPORT_LOCALE", "uz"),
            ("PRINT_BACKEND", "none"),
            ("ARTIFACT_RETENTION_HOURS", "2"),
            ("CORS_ALLOWED_ORIGINS", "http://a.test, http://b.test"),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.default_printer, "bar");
        assert_eq!(config.printers.get("kitchen"), Some("Kitchen Printer"));
        assert_eq!(config.validation_mode, ValidationMode::Strict);
        assert_eq!(config.locale, Locale::Uz);
        assert_eq!(config.print_backend, PrintBackend::None);
        assert_eq!(config.retention, Some(Duration::from_secs(7200)));
        assert_eq!(
            config.cors_allowed_origins,
            vec!["http://a.test", "http://b.test"]
        );
    }

    #[test]
    fn test_telegram_requires_token_and_chat() {
        let config = config_from(&[("TELEGRAM_BOT_TOKEN", "t")]).unwrap();
        assert!(config.telegram.is_none());

        let config = config_from(&[
            ("TELEGRAM_BOT_TOKEN", "t"),
            ("TELEGRAM_CHAT_ID", "42"),
            ("NOTIFY_TIMEOUT_SECS", "3"),
        ])
        .unwrap();
        let telegram = config.telegram.unwrap();
        assert_eq!(telegram.chat_id, "42");
        assert_eq!(telegram.api_base, DEFAULT_TELEGRAM_API_BASE);
        assert_eq!(telegram.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = config_from(&[("PORT", "  "), ("HOST", "")]).unwrap();
        assert_eq!(config.port, 2020);
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn test_invalid_values() {
        let err = config_from(&[("PORT", "http")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "PORT", .. }));

        let err = config_from(&[("VALIDATION_MODE", "loose")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "VALIDATION_MODE", .. }));

        let err = config_from(&[("ARTIFACT_RETENTION_HOURS", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "ARTIFACT_RETENTION_HOURS", .. }));
    }

    #[test]
    fn test_default_printer_must_exist() {
        let err = config_from(&[("DEFAULT_PRINTER", "p9")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownDefaultPrinter {
                key: "p9".into(),
                available: "p1, p2, p3, p4".into(),
            }
        );
    }
}
