use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use strum::{Display, EnumString};

/// Which HR accounts receive the notices for new or modified leave requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum HrNotifyPolicy {
    /// the HR account with the lowest id
    First,
    /// every HR account
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum StoreBackend {
    Mysql,
    /// process-local, lost on restart
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub access_token_ttl: usize,
    pub db_max_connections: u32,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_register_per_min: u32,
    pub rate_protected_per_min: u32,

    /// Mount point of the protected routes. The OpenAPI document always lists them under `/api`.
    pub api_prefix: String,
    pub hr_notify_policy: HrNotifyPolicy,
    pub store_backend: StoreBackend,
    pub log_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_addr: required("SERVER_ADDR")?,
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            access_token_ttl: parsed("ACCESS_TOKEN_TTL", 3600)?, // 1h
            db_max_connections: parsed("DB_MAX_CONNECTIONS", 10)?,

            rate_login_per_min: parsed("RATE_LOGIN_PER_MIN", 60)?,
            rate_register_per_min: parsed("RATE_REGISTER_PER_MIN", 30)?,
            rate_protected_per_min: parsed("RATE_PROTECTED_PER_MIN", 1000)?,

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
            hr_notify_policy: parsed("HR_NOTIFY_POLICY", HrNotifyPolicy::First)?,
            store_backend: parsed("STORE_BACKEND", StoreBackend::Mysql)?,
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
        })
    }
}

fn required(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("{key} must be set"))
}

fn parsed<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid value {raw:?} for {key}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hr_policy_parses_lowercase_names() {
        assert_eq!(
            parse_value::<HrNotifyPolicy>("HR_NOTIFY_POLICY", "all").unwrap(),
            HrNotifyPolicy::All
        );
        assert_eq!(
            parse_value::<HrNotifyPolicy>("HR_NOTIFY_POLICY", " first ").unwrap(),
            HrNotifyPolicy::First
        );
    }

    #[test]
    fn bad_values_name_the_variable() {
        let err = parse_value::<u32>("RATE_LOGIN_PER_MIN", "lots").unwrap_err();
        assert!(err.to_string().contains("RATE_LOGIN_PER_MIN"));

        let err = parse_value::<StoreBackend>("STORE_BACKEND", "postgres").unwrap_err();
        assert!(err.to_string().contains("STORE_BACKEND"));
    }
}
