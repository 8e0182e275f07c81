use std::sync::Arc;
use tori_conversation::ConversationService;
use crate::config::Config;

/// Shared application state passed to all handlers
///
/// The service holds only read-only clients, so one instance serves every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub service: Arc<ConversationService>,
}

impl AppState {
    pub fn new(config: Config, service: ConversationService) -> Self {
        Self {
            config: Arc::new(config),
            service: Arc::new(service),
        }
    }
}
