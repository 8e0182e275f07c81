pub mod message;
pub mod response_format;
pub mod run;

pub use message::Message;
pub use response_format::{JsonSchemaFormat, ResponseFormat};
pub use run::{Run, RunRequest, RunStatus, ThreadMessage};
