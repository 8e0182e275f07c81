pub mod config;
pub mod openai;
pub mod traits;
pub mod types;

pub use traits::{
    AssistantClient,
    ChatClient,
    LLMClient,
    ChatRequest, ChatResponse, ChatOptions,
    TokenUsage,
};

pub use config::{ClientFactory, OpenAIConfig};
pub use openai::OpenAIClient;
pub use types::{JsonSchemaFormat, Message, ResponseFormat, Run, RunRequest, RunStatus, ThreadMessage};
