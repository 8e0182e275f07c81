pub mod assistants;
pub mod client;

pub use assistants::{MessageList, MessageObject, RunObject, ThreadObject, ASSISTANTS_BETA_HEADER};
pub use client::OpenAIClient;
