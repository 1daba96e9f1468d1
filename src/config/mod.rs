use once_cell::sync::OnceCell;
use std::env;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {var}: {value}")]
    InvalidVar { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
}

impl AppConfig {
    /// Build configuration from the environment.
    ///
    /// Required variables fail hard here rather than falling back to
    /// insecure defaults: a missing JWT_SECRET must abort startup, not
    /// silently sign tokens with a well-known string.
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let url = env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?;

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::MissingVar("JWT_SECRET"))?;
        if jwt_secret.trim().is_empty() {
            return Err(ConfigError::MissingVar("JWT_SECRET"));
        }

        let max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(v) => v
                .parse()
                .map_err(|_| ConfigError::InvalidVar { var: "DATABASE_MAX_CONNECTIONS", value: v })?,
            Err(_) => match environment {
                Environment::Production => 50,
                Environment::Staging => 20,
                Environment::Development => 10,
            },
        };

        let jwt_expiry_hours = match env::var("JWT_EXPIRY_HOURS") {
            Ok(v) => v
                .parse()
                .map_err(|_| ConfigError::InvalidVar { var: "JWT_EXPIRY_HOURS", value: v })?,
            Err(_) => 24,
        };

        Ok(Self {
            environment,
            database: DatabaseConfig { url, max_connections },
            security: SecurityConfig { jwt_secret, jwt_expiry_hours },
        })
    }
}

static CONFIG: OnceCell<AppConfig> = OnceCell::new();

/// Load and validate configuration once, at startup.
pub fn init() -> Result<&'static AppConfig, ConfigError> {
    if let Some(config) = CONFIG.get() {
        return Ok(config);
    }
    let config = AppConfig::from_env()?;
    Ok(CONFIG.get_or_init(|| config))
}

/// Access the initialized configuration.
///
/// Panics if called before `init()` succeeded; `main` initializes the
/// config before anything else runs.
pub fn config() -> &'static AppConfig {
    CONFIG.get().expect("config not initialized - call config::init() at startup")
}
