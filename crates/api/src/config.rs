use crate::auth::jwt::JwtConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has an invalid value: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Read an optional variable and parse it, falling back to `default`.
pub(crate) fn parse_env_var<T: std::str::FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        Err(_) => Ok(default),
    }
}

pub(crate) fn required_env_var(var: &'static str) -> Result<String, ConfigError> {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(var))
}

/// The single admin account.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub email: String,
    /// Argon2id PHC string; generate with `folio-api hash-password <password>`.
    pub password_hash: String,
}

impl AdminCredentials {
    /// | Env Var               | Required |
    /// |-----------------------|----------|
    /// | `ADMIN_EMAIL`         | **yes**  |
    /// | `ADMIN_PASSWORD_HASH` | **yes**  |
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            email: required_env_var("ADMIN_EMAIL")?,
            password_hash: required_env_var("ADMIN_PASSWORD_HASH")?,
        })
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields except the secrets have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3001`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Time allowed for background tasks to stop after the listener closes
    /// (default: `10`).
    pub shutdown_timeout_secs: u64,
    /// Fill the in-memory store with demo content at startup (default:
    /// `false`). Ignored with `DATABASE_URL`; use `folio-api seed` there.
    pub seed_demo: bool,
    pub jwt: JwtConfig,
    pub admin: AdminCredentials,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                  |
    /// |-------------------------|--------------------------|
    /// | `HOST`                  | `0.0.0.0`                |
    /// | `PORT`                  | `3001`                   |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`  |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                     |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `10`                     |
    /// | `SEED_DEMO`             | `false`                  |
    ///
    /// plus the variables read by [`JwtConfig::from_env`] and
    /// [`AdminCredentials::from_env`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port: parse_env_var("PORT", 3001)?,
            cors_origins,
            request_timeout_secs: parse_env_var("REQUEST_TIMEOUT_SECS", 30)?,
            shutdown_timeout_secs: parse_env_var("SHUTDOWN_TIMEOUT_SECS", 10)?,
            seed_demo: parse_env_var("SEED_DEMO", false)?,
            jwt: JwtConfig::from_env()?,
            admin: AdminCredentials::from_env()?,
        })
    }
}
