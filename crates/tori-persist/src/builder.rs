use crate::client::FirebaseClient;
use crate::error::{PersistError, Result};

pub const DEFAULT_CONVERSATIONS_PATH: &str = "conversations";

pub struct FirebaseClientBuilder {
    database_url: Option<String>,
    conversations_path: String,
    auth_token: Option<String>,
    http_client: Option<reqwest::Client>,
}

impl FirebaseClientBuilder {
    pub fn new() -> Self {
        Self {
            database_url: None,
            conversations_path: DEFAULT_CONVERSATIONS_PATH.to_string(),
            auth_token: None,
            http_client: None,
        }
    }

    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    pub fn conversations_path(mut self, path: impl Into<String>) -> Self {
        self.conversations_path = path.into();
        self
    }

    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn build(self) -> Result<FirebaseClient> {
        let database_url = self
            .database_url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| PersistError::Config("database_url is required".to_string()))?;

        let conversations_path = self.conversations_path.trim_matches('/').to_string();
        if conversations_path.is_empty() {
            return Err(PersistError::Config(
                "conversations_path must not be empty".to_string(),
            ));
        }

        Ok(FirebaseClient::new(
            self.http_client.unwrap_or_default(),
            database_url.trim_end_matches('/').to_string(),
            conversations_path,
            self.auth_token.filter(|token| !token.is_empty()),
        ))
    }
}

impl Default for FirebaseClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
