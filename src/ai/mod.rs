//! Model provider integration
//!
//! The analysis orchestrator talks to the hosted model through
//! [`ModelService`], so tests can swap in [`MockModelClient`].

pub mod gemini;
pub mod mock;

pub use gemini::GeminiModelClient;
pub use mock::MockModelClient;

use crate::attachment::EncodedAttachment;
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ModelService: Send + Sync {
    /// Send one multimodal request (prompt text first, then each attachment
    /// in order) and return the model's text answer.
    async fn generate(&self, prompt: &str, attachments: &[EncodedAttachment]) -> Result<String>;

    /// Model identifier requests are addressed to.
    fn model(&self) -> &str;
}
