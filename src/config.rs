//! Process configuration, read once from the environment at startup.
//!
//! - `HOST` / `PORT` - bind address (default `127.0.0.1:3000`)
//! - `JWT_SECRET` - session signing secret (required)
//! - `SESSION_TTL_HOURS` - credential lifetime (default 24, at most one year)
//! - `AUTH_USERNAME` / `AUTH_PASSWORD` / `AUTH_SUBJECT` - the login account
//! - `COOKIE_SECURE` - mark the session cookie `Secure`
//! - `CHAT_API_URL` / `CHAT_TIMEOUT_SECS` - external assistant
//! - `SEED_SAMPLE_TASKS` - populate the login account with sample tasks

use std::str::FromStr;
use std::time::Duration;

use crate::auth::{StaticAccount, SubjectIdentity};

pub const DEFAULT_USERNAME: &str = "admin";
pub const DEFAULT_PASSWORD: &str = "password123";
pub const DEFAULT_SUBJECT: &str = "1";
pub const DEFAULT_CHAT_URL: &str = "http://localhost:5000/chat";

/// Longest accepted `SESSION_TTL_HOURS`.
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

/// The single account accepted at login.
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub username: String,
    pub password: String,
    pub subject: String,
}

impl UserAccount {
    pub fn to_credential_store(&self) -> StaticAccount {
        StaticAccount {
            username: self.username.clone(),
            password: self.password.clone(),
            subject: SubjectIdentity::new(self.subject.clone()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub session_ttl_hours: i64,
    pub account: UserAccount,
    pub cookie_secure: bool,
}

#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub api_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub auth: AuthConfig,
    pub chat: ChatConfig,
    pub seed_sample_tasks: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let password = get("AUTH_PASSWORD").unwrap_or_else(|| {
            tracing::warn!("AUTH_PASSWORD not set, using the built-in default password");
            DEFAULT_PASSWORD.to_string()
        });

        let session_ttl_hours: i64 = parse_or(&get, "SESSION_TTL_HOURS", 24)?;
        if session_ttl_hours > MAX_SESSION_TTL_HOURS {
            return Err(ConfigError::Invalid {
                var: "SESSION_TTL_HOURS",
                value: session_ttl_hours.to_string(),
            });
        }

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&get, "PORT", 3000)?,
            auth: AuthConfig {
                jwt_secret,
                session_ttl_hours: session_ttl_hours.max(1),
                account: UserAccount {
                    username: get("AUTH_USERNAME").unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
                    password,
                    subject: get("AUTH_SUBJECT").unwrap_or_else(|| DEFAULT_SUBJECT.to_string()),
                },
                cookie_secure: parse_bool_or(&get, "COOKIE_SECURE", false)?,
            },
            chat: ChatConfig {
                api_url: get("CHAT_API_URL").unwrap_or_else(|| DEFAULT_CHAT_URL.to_string()),
                timeout: Duration::from_secs(parse_or(&get, "CHAT_TIMEOUT_SECS", 30)?),
            },
            seed_sample_tasks: parse_bool_or(&get, "SEED_SAMPLE_TASKS", true)?,
        })
    }

    /// Config with the default account and the given secret, nothing read from the environment.
    pub fn with_secret(jwt_secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = jwt_secret.into();
        Self::from_lookup(|key| match key {
            "JWT_SECRET" => Some(secret.clone()),
            "AUTH_PASSWORD" => Some(DEFAULT_PASSWORD.to_string()),
            _ => None,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T, G>(get: &G, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
    }
}

fn parse_bool_or<G>(get: &G, var: &'static str, default: bool) -> Result<bool, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    match get(var) {
        None => Ok(default),
        Some(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid { var, value }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[("JWT_SECRET", "s3cret")])).unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
        assert_eq!(config.auth.session_ttl_hours, 24);
        assert_eq!(config.auth.account.username, "admin");
        assert_eq!(config.auth.account.password, "password123");
        assert_eq!(config.auth.account.subject, "1");
        assert!(!config.auth.cookie_secure);
        assert_eq!(config.chat.api_url, DEFAULT_CHAT_URL);
        assert_eq!(config.chat.timeout, Duration::from_secs(30));
        assert!(config.seed_sample_tasks);
    }

    #[test]
    fn test_secret_required() {
        assert_eq!(
            Config::from_lookup(lookup(&[])).unwrap_err(),
            ConfigError::Missing("JWT_SECRET")
        );
        assert_eq!(
            Config::from_lookup(lookup(&[("JWT_SECRET", "  ")])).unwrap_err(),
            ConfigError::Missing("JWT_SECRET")
        );
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("JWT_SECRET", "s3cret"),
            ("PORT", "8080"),
            ("SESSION_TTL_HOURS", "0"),
            ("COOKIE_SECURE", "true"),
            ("SEED_SAMPLE_TASKS", "no"),
            ("AUTH_SUBJECT", "42"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.auth.session_ttl_hours, 1);
        assert!(config.auth.cookie_secure);
        assert!(!config.seed_sample_tasks);
        assert_eq!(config.auth.account.subject, "42");
    }

    #[test]
    fn test_invalid_values() {
        let err = Config::from_lookup(lookup(&[("JWT_SECRET", "s"), ("PORT", "eighty")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                var: "PORT",
                value: "eighty".to_string()
            }
        );
        assert!(
            Config::from_lookup(lookup(&[("JWT_SECRET", "s"), ("COOKIE_SECURE", "maybe")]))
                .is_err()
        );
    }

    #[test]
    fn test_session_ttl_out_of_range() {
        let err = Config::from_lookup(lookup(&[
            ("JWT_SECRET", "s"),
            ("SESSION_TTL_HOURS", "10000000000"),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                var: "SESSION_TTL_HOURS",
                value: "10000000000".to_string()
            }
        );

        let config = Config::from_lookup(lookup(&[
            ("JWT_SECRET", "s"),
            ("SESSION_TTL_HOURS", "8760"),
        ]))
        .unwrap();
        assert_eq!(config.auth.session_ttl_hours, MAX_SESSION_TTL_HOURS);
    }
}
