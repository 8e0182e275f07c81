use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use tori_conversation::{DriverConfig, RetryPolicy, SummaryConfig};
use tori_llm::{OpenAIConfig, RunRequest};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub assistant: AssistantConfig,
    pub llm: LlmConfig,
    pub conversation: ConversationConfig,
    #[serde(default)]
    pub firebase: FirebaseConfig,
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(default)]
    pub openai_api_key: String,
    #[serde(default)]
    pub firebase_database_url: String,
    #[serde(default)]
    pub firebase_auth_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for a whole request, polling and retries included
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub enabled: bool,
    pub origins: Vec<String>,
}

/// Fixed assistant every run is started with
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantConfig {
    pub id: String,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

impl From<&AssistantConfig> for RunRequest {
    fn from(config: &AssistantConfig) -> Self {
        Self {
            assistant_id: config.id.clone(),
            instructions: config.instructions.clone(),
            model: config.model.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub summary_model: String,
    #[serde(default)]
    pub summary_temperature: Option<f32>,
    /// Override for the OpenAI base URL (proxies, local mocks)
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConversationConfig {
    pub poll_interval_ms: u64,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub fallback_message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FirebaseConfig {
    #[serde(default = "default_conversations_path")]
    pub conversations_path: String,
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            conversations_path: default_conversations_path(),
        }
    }
}

fn default_conversations_path() -> String {
    tori_persist::DEFAULT_CONVERSATIONS_PATH.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables such as `TORI__SERVER__PORT=8080`
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("TORI")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;

        let mut cfg: Config = config.try_deserialize()?;

        // Load secrets from ENV (not in TOML)
        cfg.openai_api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| ConfigError::Message("OPENAI_API_KEY environment variable is required".to_string()))?;
        cfg.firebase_database_url = std::env::var("FIREBASE_DATABASE_URL")
            .map_err(|_| ConfigError::Message("FIREBASE_DATABASE_URL environment variable is required".to_string()))?;
        cfg.firebase_auth_token = std::env::var("FIREBASE_AUTH_TOKEN")
            .ok()
            .filter(|token| !token.is_empty());

        cfg.validate()?;
        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder()
            .add_source(File::from(path.as_ref()));

        let config = builder.build()?;
        config.try_deserialize()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.assistant.id.trim().is_empty() {
            return Err(ConfigError::Message(
                "assistant.id must be set (TORI__ASSISTANT__ID)".to_string(),
            ));
        }
        if self.conversation.poll_interval_ms == 0 {
            return Err(ConfigError::Message(
                "conversation.poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn openai(&self) -> OpenAIConfig {
        let config = OpenAIConfig::new(self.openai_api_key.clone());
        match &self.llm.base_url {
            Some(url) => config.with_base_url(url),
            None => config,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.conversation.max_retries)
    }

    pub fn driver_config(&self) -> DriverConfig {
        DriverConfig::new(RunRequest::from(&self.assistant))
            .with_poll_interval(Duration::from_millis(self.conversation.poll_interval_ms))
            .with_timeout(Duration::from_secs(self.conversation.timeout_secs))
            .with_retrieval_retry(self.retry_policy())
    }

    pub fn summary_config(&self) -> SummaryConfig {
        let config = SummaryConfig::new(&self.llm.summary_model).with_retry(self.retry_policy());
        match self.llm.summary_temperature {
            Some(temp) => config.with_temperature(temp),
            None => config,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOML: &str = r#"
        [server]
        host = "127.0.0.1"
        port = 8000

        [cors]
        enabled = true
        origins = ["http://localhost:3000"]

        [assistant]
        id = "asst_tori"
        instructions = "반말로 대답해"

        [llm]
        summary_model = "gpt-4o-mini"

        [conversation]
        poll_interval_ms = 500
        timeout_secs = 15
        max_retries = 3
        fallback_message = "잠시 후에 다시 말해줘"

        [logging]
        level = "debug"
        format = "json"
    "#;

    #[test]
    fn test_config_structure() {
        let config: Config = toml::from_str(TOML).unwrap();

        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.request_timeout_secs, 60);
        assert_eq!(config.firebase.conversations_path, "conversations");
        assert!(config.firebase_auth_token.is_none());
    }

    #[test]
    fn test_driver_config_from_settings() {
        let config: Config = toml::from_str(TOML).unwrap();
        let driver = config.driver_config();

        assert_eq!(driver.assistant.assistant_id, "asst_tori");
        assert_eq!(driver.assistant.instructions.as_deref(), Some("반말로 대답해"));
        assert_eq!(driver.poll_interval, Duration::from_millis(500));
        assert_eq!(driver.timeout, Duration::from_secs(15));
        assert_eq!(driver.retrieval_retry.max_attempts(), 4);
    }

    #[test]
    fn test_summary_config_from_settings() {
        let config: Config = toml::from_str(TOML).unwrap();
        let summary = config.summary_config();

        assert_eq!(summary.model, "gpt-4o-mini");
        assert_eq!(summary.temperature, None);
        assert_eq!(summary.retry, RetryPolicy::new(3));
    }

    #[test]
    fn test_validate_rejects_blank_assistant() {
        let mut config: Config = toml::from_str(TOML).unwrap();
        config.assistant.id = " ".to_string();

        assert!(config.validate().is_err());
    }
}
