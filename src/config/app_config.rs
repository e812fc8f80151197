use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// SQLite connection settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// sqlx connection URL, e.g. `sqlite:///var/lib/db-data/evaluation.db`
    pub url: String,
    pub max_connections: u32,
}

/// Token signing and maintenance secrets
#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_token_expiration_hours")]
    pub token_expiration_hours: u64,
    /// Shared key guarding the `/reset` endpoints. Unset disables them.
    #[serde(default)]
    pub reset_key: Option<String>,
    /// Password of the built-in `admin` user recreated on user resets
    #[serde(default)]
    pub admin_password: Option<String>,
}

/// Chat completion provider settings
#[derive(Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_max_completion_tokens")]
    pub max_completion_tokens: u32,
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    5
}

fn default_token_expiration_hours() -> u64 {
    24 * 7
}

fn default_llm_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_completion_tokens() -> u32 {
    300
}

fn default_llm_timeout_secs() -> u64 {
    60
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 80,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://evaluation.db".to_string(),
            max_connections: default_max_connections(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_expiration_hours: default_token_expiration_hours(),
            reset_key: None,
            admin_password: None,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            api_key: None,
            model: default_llm_model(),
            max_completion_tokens: default_max_completion_tokens(),
            timeout_secs: default_llm_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[hidden]")
            .field("token_expiration_hours", &self.token_expiration_hours)
            .field("reset_key", &self.reset_key.as_ref().map(|_| "[hidden]"))
            .field("admin_password", &self.admin_password.as_ref().map(|_| "[hidden]"))
            .finish()
    }
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[hidden]"))
            .field("model", &self.model)
            .field("max_completion_tokens", &self.max_completion_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from `config/default`, `config/local`, `APP__*`
    /// variables and the variable names used by `api.env`.
    pub fn load() -> Result<Self, config::ConfigError> {
        let database_url = std::env::var("DATABASE_NAME")
            .ok()
            .map(|name| sqlite_url_for(&name));

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("auth.jwt_secret", std::env::var("JWT_KEY").ok())?
            .set_override_option("auth.reset_key", std::env::var("KEY").ok())?
            .set_override_option("auth.admin_password", std::env::var("ADMIN_PASSWORD").ok())?
            .set_override_option("llm.api_key", std::env::var("OPENAI_KEY").ok())?
            .set_override_option("database.url", database_url)?
            .build()?;

        config.try_deserialize()
    }

    /// Reject configurations the server cannot run with
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "auth.jwt_secret (or JWT_KEY) must be set".to_string(),
            ));
        }

        if self.auth.token_expiration_hours == 0 {
            return Err(config::ConfigError::Message(
                "auth.token_expiration_hours must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Turn a bare SQLite file name into a sqlx connection URL
pub(crate) fn sqlite_url_for(name: &str) -> String {
    if name.starts_with("sqlite:") {
        name.to_string()
    } else {
        format!("sqlite://{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 80);
        assert_eq!(config.auth.token_expiration_hours, 168);
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.max_completion_tokens, 300);
        assert_eq!(config.database.url, "sqlite://evaluation.db");
    }

    #[test]
    fn test_validate_requires_jwt_secret() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_err());

        config.auth.jwt_secret = "secret".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sqlite_url_for() {
        assert_eq!(sqlite_url_for("db.sqlite"), "sqlite://db.sqlite");
        assert_eq!(
            sqlite_url_for("/var/lib/db-data/evaluation.db"),
            "sqlite:///var/lib/db-data/evaluation.db"
        );
        assert_eq!(sqlite_url_for("sqlite::memory:"), "sqlite::memory:");
    }

    #[test]
    fn test_debug_hides_secrets() {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "super-secret".to_string();
        config.llm.api_key = Some("sk-test".to_string());

        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(!debug.contains("sk-test"));
    }

    #[test]
    fn test_partial_deserialize() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "auth": { "jwt_secret": "abc" },
            "llm": { "model": "gpt-4o" }
        }))
        .unwrap();

        assert_eq!(config.auth.jwt_secret, "abc");
        assert_eq!(config.auth.token_expiration_hours, 168);
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.llm.base_url, "https://api.openai.com");
    }
}
