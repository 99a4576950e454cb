//! Application configuration loaded from the environment.
//!
//! Secrets accept a `_FILE` indirection so they can be mounted from the
//! container secret store instead of living in the environment.

use std::env;
use std::time::Duration;

use crate::outbound::persistence::PoolConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const DEFAULT_MAIL_FROM: &str = "Irene & Marco <invitaciones@ireneymarco2026.com>";
const DEFAULT_SITE_URL: &str = "https://ireneymarco2026.com";

/// Configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is absent.
    #[error("missing required environment variable: {name} (or {name}_FILE)")]
    Missing {
        /// Variable name without the `_FILE` suffix.
        name: &'static str,
    },

    /// A variable is present but unusable.
    #[error("invalid value for {name}: {message}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// What was wrong with it.
        message: String,
    },

    /// A `_FILE` secret could not be read.
    #[error("failed to read secret file {path}: {message}")]
    SecretFile {
        /// Path the variable pointed at.
        path: String,
        /// Underlying I/O detail.
        message: String,
    },
}

/// Everything the server needs to start, resolved once at boot.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address and port the HTTP server binds.
    pub bind_addr: String,
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Path to the session cookie key material.
    pub session_key_file: String,
    /// Whether the session cookie carries the `Secure` attribute.
    pub session_cookie_secure: bool,
    /// Shared secret the couple uses to open the dashboard.
    pub admin_access_code: String,
    /// Resend API key.
    pub resend_api_key: String,
    /// Sender shown on confirmation emails.
    pub mail_from: String,
    /// Public site URL linked from emails.
    pub site_url: String,
    /// Bank account printed in the gift section of attending emails.
    pub gift_iban: String,
    /// Maximum database connections.
    pub pool_max_size: u32,
    /// Idle connections to keep warm.
    pub pool_min_idle: Option<u32>,
    /// Connection checkout timeout in seconds.
    pub pool_connection_timeout_secs: u64,
}

impl AppConfig {
    /// Load the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_owned()),
            database_url: required("DATABASE_URL")?,
            session_key_file: env::var("SESSION_KEY_FILE")
                .unwrap_or_else(|_| DEFAULT_SESSION_KEY_FILE.to_owned()),
            session_cookie_secure: flag("SESSION_COOKIE_SECURE", true),
            admin_access_code: secret("ADMIN_ACCESS_CODE")?,
            resend_api_key: secret("RESEND_API_KEY")?,
            mail_from: env::var("MAIL_FROM").unwrap_or_else(|_| DEFAULT_MAIL_FROM.to_owned()),
            site_url: env::var("SITE_URL").unwrap_or_else(|_| DEFAULT_SITE_URL.to_owned()),
            gift_iban: required("GIFT_IBAN")?,
            pool_max_size: parsed("DB_POOL_MAX_SIZE", 10)?,
            pool_min_idle: optional_parsed("DB_POOL_MIN_IDLE")?.or(Some(2)),
            pool_connection_timeout_secs: parsed("DB_POOL_CONNECTION_TIMEOUT_SECS", 30)?,
        })
    }

    /// Derive the database pool configuration.
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::new(self.database_url.clone())
            .with_max_size(self.pool_max_size)
            .with_min_idle(self.pool_min_idle)
            .with_connection_timeout(Duration::from_secs(self.pool_connection_timeout_secs))
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing { name })
}

/// Read `NAME`, falling back to the contents of the file named by
/// `NAME_FILE`, trimmed.
fn secret(name: &'static str) -> Result<String, ConfigError> {
    if let Ok(value) = env::var(name) {
        return Ok(value);
    }
    let file_var = format!("{name}_FILE");
    match env::var(&file_var) {
        Ok(path) => std::fs::read_to_string(&path)
            .map(|contents| contents.trim().to_owned())
            .map_err(|err| ConfigError::SecretFile {
                path,
                message: err.to_string(),
            }),
        Err(_) => Err(ConfigError::Missing { name }),
    }
}

/// Boolean flag: any value other than `0` counts as on.
fn flag(name: &str, default: bool) -> bool {
    env::var(name).map(|v| v != "0").unwrap_or(default)
}

fn parsed<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.parse().map_err(|err: T::Err| ConfigError::Invalid {
            name,
            message: err.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

fn optional_parsed<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|err: T::Err| ConfigError::Invalid {
                name,
                message: err.to_string(),
            }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    // Environment mutation is process-wide, so these tests only exercise
    // the pure helpers and error formatting.

    #[rstest]
    fn missing_variables_name_both_forms() {
        let err = ConfigError::Missing { name: "RESEND_API_KEY" };
        let text = err.to_string();
        assert!(text.contains("RESEND_API_KEY"));
        assert!(text.contains("RESEND_API_KEY_FILE"));
    }

    #[rstest]
    fn pool_config_carries_the_knobs() {
        let config = AppConfig {
            bind_addr: DEFAULT_BIND_ADDR.to_owned(),
            database_url: "postgres://localhost/wedding".to_owned(),
            session_key_file: DEFAULT_SESSION_KEY_FILE.to_owned(),
            session_cookie_secure: true,
            admin_access_code: "code".to_owned(),
            resend_api_key: "re_key".to_owned(),
            mail_from: DEFAULT_MAIL_FROM.to_owned(),
            site_url: DEFAULT_SITE_URL.to_owned(),
            gift_iban: "ES00 0000".to_owned(),
            pool_max_size: 4,
            pool_min_idle: Some(1),
            pool_connection_timeout_secs: 5,
        };

        let pool = config.pool_config();
        assert_eq!(pool.database_url(), "postgres://localhost/wedding");
    }
}
