use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Deployment tier. Development mode exposes internal error detail in 500 responses.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    #[default]
    Development,
    Production,
    Test,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    /// Allowed origins. Empty means any origin.
    #[serde(default)]
    pub allow_origins: Vec<String>,
    #[serde(default = "default_cors_max_age")]
    pub max_age: u64,
}

fn default_cors_max_age() -> u64 {
    3600
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origins: Vec::new(),
            max_age: default_cors_max_age(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub environment: RunMode,
    /// Take the client address from `X-Forwarded-For` (set when running behind a reverse proxy).
    #[serde(default)]
    pub trust_proxy: bool,
    #[serde(default)]
    pub cors: CorsConfig,
}

impl ServerConfig {
    pub fn is_development(&self) -> bool {
        self.environment == RunMode::Development
    }

    pub fn is_production(&self) -> bool {
        self.environment == RunMode::Production
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    /// Durability tier. When set, contact submissions fail with 503 while storage
    /// is unreachable and the process refuses to start without a database.
    /// When unset, submissions are accepted without being persisted.
    #[serde(default)]
    pub required: bool,
    /// Allow a loopback database host in production.
    #[serde(default)]
    pub allow_local: bool,
    /// Upper bound for a single storage call, in seconds.
    #[serde(default = "default_db_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_db_max_connections")]
    pub max_connections: u32,
}

fn default_db_timeout_secs() -> u64 {
    5
}
fn default_db_max_connections() -> u32 {
    10
}

impl DatabaseConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn is_loopback(&self) -> bool {
        self.url.contains("localhost") || self.url.contains("127.0.0.1")
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct MailConfig {
    /// Mailgun API key. Email is disabled while this or `domain` is missing.
    pub api_key: Option<String>,
    pub domain: Option<String>,
    pub base_url: String,
    /// Staff inbox receiving new-lead notifications. Also quoted to visitors as a fallback channel.
    pub recipient: String,
    pub from: String,
    #[serde(default = "default_mail_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_mail_timeout_secs() -> u64 {
    10
}

impl MailConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub session_secret: String,
    pub jwt_secret: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RateLimitConfig {
    #[serde(default = "default_rate_limit_enabled")]
    pub enabled: bool,
    /// General API window, per client address.
    pub window_secs: u64,
    pub max_requests: u32,
    /// Contact form window, per client address.
    pub contact_window_secs: u64,
    pub contact_max_requests: u32,
}

fn default_rate_limit_enabled() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AdminConfig {
    /// Mount the lead triage routes. They carry no authentication.
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SeedConfig {
    #[serde(default = "default_seed_enabled")]
    pub enabled: bool,
}

fn default_seed_enabled() -> bool {
    true
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: default_seed_enabled(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub mail: MailConfig,
    pub auth: AuthConfig,
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

/// Minimum secret length accepted in production.
const MIN_PRODUCTION_SECRET_LEN: usize = 32;

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("SITE_CONFIG").unwrap_or_else(|_| "config/config".to_string());

        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.environment", "development")?
            .set_default("database.url", "postgres://localhost/site")?
            .set_default("mail.base_url", "https://api.mailgun.net")?
            .set_default("mail.recipient", "customersupport@example.com")?
            .set_default("mail.from", "Website <noreply@example.com>")?
            .set_default("rate_limit.window_secs", 900_i64)?
            .set_default("rate_limit.max_requests", 100_i64)?
            .set_default("rate_limit.contact_window_secs", 3600_i64)?
            .set_default("rate_limit.contact_max_requests", 5_i64)?
            // Load from config/config.toml
            .add_source(File::with_name(&config_path).required(false))
            // Override from environment (e.g., SITE__MAIL__API_KEY)
            .add_source(Environment::with_prefix("SITE").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    /// Startup checks that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, secret) in [
            ("auth.session_secret", &self.auth.session_secret),
            ("auth.jwt_secret", &self.auth.jwt_secret),
        ] {
            if secret.trim().is_empty() {
                return Err(ConfigError::Message(format!("{name} must be set")));
            }
            if self.server.is_production() && secret.len() < MIN_PRODUCTION_SECRET_LEN {
                return Err(ConfigError::Message(format!(
                    "{name} must be at least {MIN_PRODUCTION_SECRET_LEN} characters in production"
                )));
            }
        }

        if self.auth.session_secret == self.auth.jwt_secret {
            return Err(ConfigError::Message(
                "auth.session_secret and auth.jwt_secret must differ".into(),
            ));
        }

        if self.server.is_production() && self.database.is_loopback() && !self.database.allow_local
        {
            return Err(ConfigError::Message(
                "database.url points at a loopback host in production; set database.allow_local to permit it"
                    .into(),
            ));
        }

        if self.rate_limit.enabled
            && (self.rate_limit.window_secs == 0
                || self.rate_limit.max_requests == 0
                || self.rate_limit.contact_window_secs == 0
                || self.rate_limit.contact_max_requests == 0)
        {
            return Err(ConfigError::Message(
                "rate_limit windows and maximums must be positive".into(),
            ));
        }

        Ok(())
    }
}
