use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderValue;
use watches_db::DbConfig;

/// Invalid or missing configuration. Raised once at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be set")]
    Missing { name: &'static str },

    #[error("{name} has invalid value '{value}': expected {expected}")]
    Invalid {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Deployment environment, from `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "test" => Ok(Self::Test),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(()),
        }
    }
}

/// Log output format, from `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(()),
        }
    }
}

/// Origins allowed by the CORS layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    /// `*`: any origin.
    Any,
    List(Vec<HeaderValue>),
}

/// Server configuration loaded from environment variables.
///
/// All fields except the database URL have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    pub environment: Environment,
    pub cors_origins: CorsOrigins,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Rate-limit window in seconds (default: `60`).
    pub throttle_ttl_secs: u64,
    /// Requests allowed per window per client IP (default: `20`, `0` disables).
    pub throttle_limit: u32,
    /// Optional upper bound on the `limit` query parameter.
    pub max_page_limit: Option<i64>,
    pub log_format: LogFormat,
    /// Directory for `error.log` and `combined.log`. Stdout only when unset.
    pub log_dir: Option<PathBuf>,
    pub db: DbConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default              |
    /// |---------------------------|----------------------|
    /// | `HOST`                    | `0.0.0.0`            |
    /// | `PORT`                    | `3000`               |
    /// | `APP_ENV`                 | `development`        |
    /// | `CORS_ORIGINS`            | `*` (not production) |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                 |
    /// | `THROTTLE_TTL_SECS`       | `60`                 |
    /// | `THROTTLE_LIMIT`          | `20`                 |
    /// | `MAX_PAGE_LIMIT`          | unset                |
    /// | `LOG_FORMAT`              | `pretty`             |
    /// | `LOG_DIR`                 | unset                |
    /// | `DATABASE_URL`            | required             |
    /// | `DB_MAX_CONNECTIONS`      | `20`                 |
    /// | `DB_CONNECT_TIMEOUT_MS`   | `3500`               |
    /// | `DB_STATEMENT_TIMEOUT_MS` | `1200`               |
    /// | `DB_SLOW_QUERY_MS`        | `1200`               |
    ///
    /// In production `CORS_ORIGINS` must be set explicitly.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Self::from_env`], reading values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(&lookup);

        let environment = env.parse_or(
            "APP_ENV",
            Environment::Development,
            "development, test or production",
        )?;

        let cors_origins = match env.get("CORS_ORIGINS") {
            Some(raw) => parse_origins(&raw)?,
            None if environment == Environment::Production => {
                return Err(ConfigError::Missing {
                    name: "CORS_ORIGINS",
                })
            }
            None => CorsOrigins::Any,
        };

        let max_page_limit = match env.get("MAX_PAGE_LIMIT") {
            Some(raw) => Some(
                raw.trim()
                    .parse::<i64>()
                    .ok()
                    .filter(|v| *v > 0)
                    .ok_or(ConfigError::Invalid {
                        name: "MAX_PAGE_LIMIT",
                        value: raw,
                        expected: "a positive integer",
                    })?,
            ),
            None => None,
        };

        let database_url = env.get("DATABASE_URL").ok_or(ConfigError::Missing {
            name: "DATABASE_URL",
        })?;
        let defaults = DbConfig::new(database_url);
        let db = DbConfig {
            max_connections: env.parse_or(
                "DB_MAX_CONNECTIONS",
                defaults.max_connections,
                "a valid u32",
            )?,
            connect_timeout: env.millis_or("DB_CONNECT_TIMEOUT_MS", defaults.connect_timeout)?,
            statement_timeout: env.millis_or(
                "DB_STATEMENT_TIMEOUT_MS",
                defaults.statement_timeout,
            )?,
            slow_query_threshold: env.millis_or(
                "DB_SLOW_QUERY_MS",
                defaults.slow_query_threshold,
            )?,
            ..defaults
        };

        Ok(Self {
            host: env.get("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: env.parse_or("PORT", 3000, "a valid port (0-65535)")?,
            environment,
            cors_origins,
            request_timeout_secs: env.parse_or("REQUEST_TIMEOUT_SECS", 30, "a valid u64")?,
            throttle_ttl_secs: env.parse_or("THROTTLE_TTL_SECS", 60, "a valid u64")?,
            throttle_limit: env.parse_or("THROTTLE_LIMIT", 20, "a valid u32")?,
            max_page_limit,
            log_format: env.parse_or("LOG_FORMAT", LogFormat::Pretty, "pretty or json")?,
            log_dir: env.get("LOG_DIR").map(|dir| PathBuf::from(dir.trim())),
            db,
        })
    }

    pub fn throttle_window(&self) -> Duration {
        Duration::from_secs(self.throttle_ttl_secs)
    }
}

struct Env<'a, F>(&'a F);

impl<F> Env<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Non-blank value of `name`.
    fn get(&self, name: &str) -> Option<String> {
        (self.0)(name).filter(|v| !v.trim().is_empty())
    }

    fn parse_or<T: FromStr>(
        &self,
        name: &'static str,
        default: T,
        expected: &'static str,
    ) -> Result<T, ConfigError> {
        match self.get(name) {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                name,
                value: raw,
                expected,
            }),
            None => Ok(default),
        }
    }

    fn millis_or(&self, name: &'static str, default: Duration) -> Result<Duration, ConfigError> {
        let default_ms = u64::try_from(default.as_millis()).unwrap_or(u64::MAX);
        self.parse_or(name, default_ms, "milliseconds as u64")
            .map(Duration::from_millis)
    }
}

fn parse_origins(raw: &str) -> Result<CorsOrigins, ConfigError> {
    let entries: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if entries.is_empty() || entries.contains(&"*") {
        return Ok(CorsOrigins::Any);
    }
    entries
        .into_iter()
        .map(|origin| {
            origin.parse::<HeaderValue>().map_err(|_| ConfigError::Invalid {
                name: "CORS_ORIGINS",
                value: origin.to_string(),
                expected: "comma-separated origins",
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(CorsOrigins::List)
}
