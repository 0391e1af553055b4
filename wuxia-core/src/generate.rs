//! Generation invoker seam.
//!
//! The agent talks to the chat backend through [`Generator`] so tests
//! can substitute a scripted implementation. The real implementation
//! wraps the `openai` client; failures are mapped to fixed
//! player-facing fallback strings at the single call site in the agent.

use async_trait::async_trait;
use openai::{Message, Request};

/// A chat-completion backend: one persona turn, one body turn, text out.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, persona: &str, body: &str) -> Result<String, openai::Error>;
}

/// Build the two-turn chat request sent for every generation call.
fn chat_request(persona: &str, body: &str) -> Request {
    Request::new(vec![Message::system(persona), Message::user(body)])
}

#[async_trait]
impl Generator for openai::Client {
    async fn generate(&self, persona: &str, body: &str) -> Result<String, openai::Error> {
        let response = self.complete(chat_request(persona, body)).await?;
        Ok(response.text().to_string())
    }
}

/// Map a backend failure to its fixed player-facing message.
///
/// Each failure kind has a distinct string; nothing here ever
/// propagates to the caller as an error.
pub fn fallback_message(error: &openai::Error) -> &'static str {
    match error {
        openai::Error::Auth(_) => {
            "The AI service rejected the configured API key. Please verify your credentials."
        }
        openai::Error::Connection(_) => {
            "Could not connect to the AI service. Please check your network connection."
        }
        openai::Error::RateLimited(_) => {
            "The AI service rate limit was exceeded. Please try again later."
        }
        openai::Error::Api { .. } => {
            "Sorry, I encountered an error trying to process your request with the AI."
        }
        _ => "An unexpected error occurred while communicating with the AI.",
    }
}
