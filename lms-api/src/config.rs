/// Configuration for the API server
///
/// Values are layered, later sources winning:
///
/// 1. Built-in defaults
/// 2. Optional `lms.toml` in the working directory
/// 3. `LMS__<SECTION>__<KEY>` environment variables (e.g. `LMS__API__PORT`)
/// 4. `DATABASE_URL` and `JWT_SECRET`, when set
///
/// A `.env` file is loaded first, if present.
///
/// # Example
///
/// ```no_run
/// use lms_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::load()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use config::{builder::DefaultState, ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;

/// Minimum JWT secret length in bytes
pub const MIN_JWT_SECRET_LEN: usize = 32;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub pagination: PaginationConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins; empty allows any origin
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// HS256 secret shared with the token issuer
    ///
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Items per page of the course listing
    pub page_size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub format: LogFormat,
}

impl Config {
    /// Loads `.env`, then every configuration layer
    ///
    /// # Errors
    ///
    /// Fails if a value has the wrong type, `database.url` is empty or the
    /// JWT secret is shorter than [`MIN_JWT_SECRET_LEN`].
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let builder = Self::defaults()?
            .add_source(File::with_name("lms").required(false))
            .add_source(
                Environment::with_prefix("LMS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("api.cors_origins"),
            )
            .set_override_option("database.url", env::var("DATABASE_URL").ok())?
            .set_override_option("jwt.secret", env::var("JWT_SECRET").ok())?;

        Self::from_builder(builder)
    }

    /// Builder holding only the built-in defaults
    pub fn defaults() -> anyhow::Result<ConfigBuilder<DefaultState>> {
        Ok(config::Config::builder()
            .set_default("api.host", "0.0.0.0")?
            .set_default("api.port", 8080)?
            .set_default("api.cors_origins", Vec::<String>::new())?
            .set_default("database.url", "")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("database.connect_timeout_seconds", 30)?
            .set_default("jwt.secret", "")?
            .set_default("pagination.page_size", 10)?
            .set_default("log.format", "pretty")?)
    }

    /// Builds and validates the configuration from `builder`
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<Self> {
        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.database.url.trim().is_empty() {
            anyhow::bail!("database.url (or DATABASE_URL) is required");
        }

        if self.jwt.secret.len() < MIN_JWT_SECRET_LEN {
            anyhow::bail!(
                "jwt.secret (or JWT_SECRET) must be at least {} characters long",
                MIN_JWT_SECRET_LEN
            );
        }

        if self.pagination.page_size == 0 {
            anyhow::bail!("pagination.page_size must be positive");
        }

        Ok(())
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn with_required() -> ConfigBuilder<DefaultState> {
        Config::defaults()
            .unwrap()
            .set_override("database.url", "postgresql://localhost/lms_test")
            .unwrap()
            .set_override("jwt.secret", SECRET)
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_builder(with_required()).unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert!(config.api.cors_origins.is_empty());
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.pagination.page_size, 10);
        assert_eq!(config.log.format, LogFormat::Pretty);
    }

    #[test]
    fn test_overrides() {
        let builder = with_required()
            .set_override("api.port", 3000)
            .unwrap()
            .set_override("log.format", "json")
            .unwrap()
            .set_override("pagination.page_size", 25)
            .unwrap();

        let config = Config::from_builder(builder).unwrap();
        assert_eq!(config.api.port, 3000);
        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(config.pagination.page_size, 25);
    }

    #[test]
    fn test_short_secret_rejected() {
        let builder = with_required().set_override("jwt.secret", "short").unwrap();

        let err = Config::from_builder(builder).unwrap_err();
        assert!(err.to_string().contains("at least 32"));
    }

    #[test]
    fn test_missing_database_url_rejected() {
        let builder = Config::defaults()
            .unwrap()
            .set_override("jwt.secret", SECRET)
            .unwrap();

        assert!(Config::from_builder(builder).is_err());
    }
}
