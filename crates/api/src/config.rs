use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
    #[serde(default)]
    pub email: EmailConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Where authenticated requesters are redirected from anonymous-only
    /// endpoints (signup, login, password reset).
    #[serde(default = "default_home_redirect")]
    pub home_redirect: String,

    /// Public base URL used when building password reset links.
    #[serde(default = "default_app_base_url")]
    pub app_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// How long a login session stays valid.
    #[serde(default = "default_session_expiry")]
    pub session_expiry_secs: i64,

    /// How long an emailed password reset token stays valid.
    #[serde(default = "default_reset_token_expiry")]
    pub reset_token_expiry_secs: i64,
}

/// Email service configuration for password reset mail.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Whether email sending is enabled
    #[serde(default)]
    pub enabled: bool,

    /// Email provider: sendgrid, or console (for development)
    #[serde(default = "default_email_provider")]
    pub provider: String,

    /// From address on outgoing mail
    #[serde(default = "default_email_from")]
    pub from_address: String,

    /// SendGrid API key (for sendgrid provider)
    #[serde(default)]
    pub sendgrid_api_key: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: default_email_provider(),
            from_address: default_email_from(),
            sendgrid_api_key: String::new(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_home_redirect() -> String {
    "/".to_string()
}
fn default_app_base_url() -> String {
    "http://localhost:8080".to_string()
}
fn default_max_connections() -> u32 {
    20
}
fn default_min_connections() -> u32 {
    5
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_idle_timeout() -> u64 {
    600
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_session_expiry() -> i64 {
    1_209_600 // 14 days
}
fn default_reset_token_expiry() -> i64 {
    86_400 // 24 hours
}
fn default_email_provider() -> String {
    "console".to_string()
}
fn default_email_from() -> String {
    "no-reply@device-registry.local".to_string()
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with DR__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("DR").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    /// The socket address the server binds to.
    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], self.server.port)))
    }

    /// Pool sizing in the shape the persistence layer expects.
    pub fn pool_settings(&self) -> persistence::db::PoolSettings {
        persistence::db::PoolSettings {
            max_connections: self.database.max_connections,
            min_connections: self.database.min_connections,
            connect_timeout: std::time::Duration::from_secs(self.database.connect_timeout_secs),
            idle_timeout: std::time::Duration::from_secs(self.database.idle_timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_sections() {
        let raw = r#"
            [server]
            port = 9000

            [database]
            url = "postgres://localhost/device_registry"

            [logging]

            [security]
        "#;

        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.security.session_expiry_secs, 1_209_600);
        assert!(!config.email.enabled);
        assert_eq!(config.email.provider, "console");
    }

    #[test]
    fn test_socket_addr() {
        let raw = r#"
            [server]
            host = "127.0.0.1"
            port = 8081

            [database]
            url = "postgres://localhost/device_registry"

            [logging]

            [security]
        "#;

        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8081");
    }

    #[test]
    fn test_pool_settings_conversion() {
        let raw = r#"
            [server]

            [database]
            url = "postgres://localhost/device_registry"
            max_connections = 8
            connect_timeout_secs = 3

            [logging]

            [security]
        "#;

        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        let settings = config.pool_settings();
        assert_eq!(settings.max_connections, 8);
        assert_eq!(settings.min_connections, 5);
        assert_eq!(settings.connect_timeout, std::time::Duration::from_secs(3));
    }
}
