use std::env;
use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

use wordle_core::GameConfig;
use wordle_persistence::DEFAULT_DATABASE_URL;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
    #[error("JWT_SECRET must be set unless AUTH_DEV_MODE=true")]
    MissingJwtSecret,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthSettings {
    /// Unsigned tokens accepted as-is
    Dev,
    Jwt { secret: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub database_url: String,
    pub words_file: String,
    pub daily_limit: u32,
    pub max_attempts: usize,
    pub session_ttl_minutes: u64,
    pub auth: AuthSettings,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let daily_limit: u32 = parse_var(&lookup, "DAILY_LIMIT", 3)?;
        if daily_limit == 0 {
            return Err(invalid("DAILY_LIMIT", "0"));
        }
        let max_attempts: usize = parse_var(&lookup, "MAX_ATTEMPTS", 5)?;
        if max_attempts == 0 {
            return Err(invalid("MAX_ATTEMPTS", "0"));
        }

        let auth = if parse_flag(&lookup, "AUTH_DEV_MODE")? {
            AuthSettings::Dev
        } else {
            let secret = lookup("JWT_SECRET")
                .filter(|secret| !secret.is_empty())
                .ok_or(ConfigError::MissingJwtSecret)?;
            AuthSettings::Jwt { secret }
        };

        Ok(Self {
            host: parse_var(&lookup, "HOST", IpAddr::from([127, 0, 0, 1]))?,
            port: parse_var(&lookup, "PORT", 8080)?,
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            words_file: lookup("WORDS_FILE").unwrap_or_else(|| "./words.txt".to_string()),
            daily_limit,
            max_attempts,
            session_ttl_minutes: parse_var(&lookup, "SESSION_TTL_MINUTES", 720)?,
            auth,
        })
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new(self.daily_limit, self.max_attempts)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_minutes * 60)
    }
}

fn invalid(name: &'static str, value: &str) -> ConfigError {
    ConfigError::Invalid {
        name,
        value: value.to_string(),
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(raw) => raw.trim().parse().map_err(|_| invalid(name, &raw)),
        None => Ok(default),
    }
}

fn parse_flag(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<bool, ConfigError> {
    match lookup(name).as_deref().map(str::trim) {
        None | Some("") | Some("false") | Some("0") => Ok(false),
        Some("true") | Some("1") => Ok(true),
        Some(other) => Err(invalid(name, other)),
    }
}
