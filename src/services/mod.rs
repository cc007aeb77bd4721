pub mod openai_client;

pub use openai_client::{completion_text, ChatCompletionRequest, OpenAiClient};
