use std::net::SocketAddr;
use std::str::FromStr;
use thiserror::Error;

const DEFAULT_JWT_SECRET: &str = "dev-secret-key";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} has an invalid value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Account promoted to, or created as, an admin at startup
#[derive(Clone)]
pub struct AdminCredentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Service configuration, read from the environment at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `None` runs the service on in-memory storage
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_lifetime_hours: i64,
    pub bcrypt_cost: u32,
    pub bind_addr: SocketAddr,
    pub max_upload_bytes: usize,
    /// When false, search returns every match without page metadata
    pub search_pagination: bool,
    /// Set from `ADMIN_EMAIL` and `ADMIN_PASSWORD`, which come as a pair
    pub admin: Option<AdminCredentials>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            database_max_connections: 5,
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            jwt_lifetime_hours: 8,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            max_upload_bytes: 10 * 1024 * 1024,
            search_pagination: true,
            admin: None,
        }
    }
}

fn parse<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value,
    })
}

fn parse_flag(key: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value,
            reason: "expected a boolean".to_string(),
        }),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; unset keys keep defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        config.database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        if let Some(secret) = lookup("JWT_SECRET") {
            config.jwt_secret = secret;
        }
        if let Some(value) = lookup("JWT_LIFETIME_HOURS") {
            config.jwt_lifetime_hours = parse("JWT_LIFETIME_HOURS", value)?;
        }
        if let Some(value) = lookup("BCRYPT_COST") {
            config.bcrypt_cost = parse("BCRYPT_COST", value)?;
        }
        if let Some(value) = lookup("BIND_ADDR") {
            config.bind_addr = parse("BIND_ADDR", value)?;
        }
        if let Some(value) = lookup("DATABASE_MAX_CONNECTIONS") {
            config.database_max_connections = parse("DATABASE_MAX_CONNECTIONS", value)?;
        }
        if let Some(value) = lookup("MAX_UPLOAD_BYTES") {
            config.max_upload_bytes = parse("MAX_UPLOAD_BYTES", value)?;
        }
        if let Some(value) = lookup("SEARCH_PAGINATION") {
            config.search_pagination = parse_flag("SEARCH_PAGINATION", value)?;
        }

        config.admin = match (lookup("ADMIN_EMAIL"), lookup("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminCredentials { email, password }),
            (None, None) => None,
            (Some(value), None) => {
                return Err(ConfigError::Invalid {
                    key: "ADMIN_EMAIL",
                    value,
                    reason: "ADMIN_PASSWORD must be set too".to_string(),
                })
            }
            (None, Some(_)) => {
                return Err(ConfigError::Invalid {
                    key: "ADMIN_PASSWORD",
                    value: "<redacted>".to_string(),
                    reason: "ADMIN_EMAIL must be set too".to_string(),
                })
            }
        };

        Ok(config)
    }

    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}
