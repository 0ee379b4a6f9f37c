use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Environment variable naming an alternative configuration file.
pub const CONFIG_PATH_ENV: &str = "CHALLENGES_CONFIG";

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    /// Log every SQL statement through `tracing`.
    pub sqlx_logging: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Lifetime of a password reset token.
    pub reset_token_ttl_secs: i64,
    /// Sessions idle for longer than this are pruned.
    pub session_lifetime_secs: i64,
}

/// Initial administrator account created by `store seed`.
#[derive(Debug, Deserialize, Clone)]
pub struct AdminSeed {
    pub username: String,
    pub email: String,
    pub password: String,
    pub firstname: String,
    pub lastname: String,
    pub date_of_birth: chrono::NaiveDate,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SeedConfig {
    pub admin: Option<AdminSeed>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `info` or `store=debug,sea_orm=warn`.
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub seed: SeedConfig,
    pub log: LogConfig,
}

impl AppConfig {
    /// Load from `config/config.toml` (or the file named by `CHALLENGES_CONFIG`),
    /// then the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config/config".into());
        Self::load_from(path)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_string_lossy().into_owned();
        let s = Config::builder()
            .set_default("database.url", "sqlite://challenges.db?mode=rwc")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("database.connect_timeout_secs", 8)?
            .set_default("database.sqlx_logging", false)?
            .set_default("auth.reset_token_ttl_secs", 3600)?
            .set_default("auth.session_lifetime_secs", 7200)?
            .set_default("log.level", "info")?
            .add_source(File::with_name(&path).required(false))
            // Override from environment (e.g., CHALLENGES__DATABASE__URL)
            .add_source(Environment::with_prefix("CHALLENGES").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
