use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub notifications: NotificationConfig,
    pub throttle: ThrottleConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let database_url =
            env::var("APP_DATABASE_URL").unwrap_or_else(|_| "sqlite://platewise.db".to_string());
        let max_connections = env::var("APP_DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidCount {
                key: "APP_DATABASE_MAX_CONNECTIONS",
            })?;

        let admin_token = optional_var("APP_ADMIN_TOKEN");

        let smtp = smtp_from_env()?;
        let webhook_url = optional_var("APP_LEAD_WEBHOOK_URL");

        let max_requests = env::var("APP_THROTTLE_MAX_REQUESTS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidCount {
                key: "APP_THROTTLE_MAX_REQUESTS",
            })?;
        let window_secs = env::var("APP_THROTTLE_WINDOW_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidCount {
                key: "APP_THROTTLE_WINDOW_SECS",
            })?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            auth: AuthConfig { admin_token },
            notifications: NotificationConfig { smtp, webhook_url },
            throttle: ThrottleConfig {
                max_requests,
                window_secs,
            },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Connection settings for the SQLite store.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Credentials guarding the admin surface. A missing token keeps the
/// admin routes locked rather than open.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub admin_token: Option<String>,
}

/// Outbound channels used to announce captured leads. Either channel
/// may be absent; lead intake never depends on them.
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub smtp: Option<SmtpConfig>,
    pub webhook_url: Option<String>,
}

/// SMTP relay credentials. All fields must be present together.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    pub from_address: String,
    pub to_address: String,
}

/// Fixed-window limits applied to the public lead endpoint.
#[derive(Debug, Clone)]
pub struct ThrottleConfig {
    pub max_requests: u32,
    pub window_secs: u64,
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn smtp_from_env() -> Result<Option<SmtpConfig>, ConfigError> {
    let host = optional_var("APP_SMTP_HOST");
    let username = optional_var("APP_SMTP_USERNAME");
    let password = optional_var("APP_SMTP_PASSWORD");
    let from_address = optional_var("APP_SMTP_FROM");
    let to_address = optional_var("APP_LEADS_INBOX");

    match (host, username, password, from_address, to_address) {
        (None, None, None, None, None) => Ok(None),
        (Some(host), Some(username), Some(password), Some(from_address), Some(to_address)) => {
            Ok(Some(SmtpConfig {
                host,
                username,
                password,
                from_address,
                to_address,
            }))
        }
        (host, username, password, from_address, _) => {
            let missing = if host.is_none() {
                "APP_SMTP_HOST"
            } else if username.is_none() {
                "APP_SMTP_USERNAME"
            } else if password.is_none() {
                "APP_SMTP_PASSWORD"
            } else if from_address.is_none() {
                "APP_SMTP_FROM"
            } else {
                "APP_LEADS_INBOX"
            };
            Err(ConfigError::IncompleteSmtp { missing })
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidCount { key: &'static str },
    IncompleteSmtp { missing: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidCount { key } => {
                write!(f, "{key} must be a non-negative integer")
            }
            ConfigError::IncompleteSmtp { missing } => {
                write!(f, "SMTP settings are incomplete: {missing} is not set")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
