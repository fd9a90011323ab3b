pub mod interests;
pub mod llm;
pub mod responder;

pub use self::interests::extract_interests;
pub use self::llm::{client_from_config, CompletionClient, LlmError};
pub use self::responder::respond;
