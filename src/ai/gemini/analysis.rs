use super::client::GeminiHttpClient;
use super::types::{Content, GenerateContentRequest, GenerateContentResponse, InlineData, Part};
use crate::ai::ModelService;
use crate::attachment::EncodedAttachment;
use crate::models::Config;
use crate::{Error, Result};
use async_trait::async_trait;

/// Multimodal `generateContent` client used for failure analysis.
pub struct GeminiModelClient {
    http: GeminiHttpClient,
}

impl GeminiModelClient {
    pub fn new(http: GeminiHttpClient) -> Self {
        Self { http }
    }

    pub fn from_config(config: &Config, api_key: String) -> Self {
        Self::new(GeminiHttpClient::from_config(config, api_key))
    }

    fn build_request(prompt: &str, attachments: &[EncodedAttachment]) -> GenerateContentRequest {
        let mut parts = Vec::with_capacity(attachments.len() + 1);
        parts.push(Part::Text {
            text: prompt.to_string(),
        });
        parts.extend(attachments.iter().map(|a| Part::InlineData {
            inline_data: InlineData {
                mime_type: a.media_type.clone(),
                data: a.data.clone(),
            },
        }));

        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
        }
    }
}

#[async_trait]
impl ModelService for GeminiModelClient {
    async fn generate(&self, prompt: &str, attachments: &[EncodedAttachment]) -> Result<String> {
        tracing::debug!(
            "Sending analysis request to Gemini model {} ({} prompt chars, {} attachments)",
            self.http.model(),
            prompt.len(),
            attachments.len()
        );

        let request = Self::build_request(prompt, attachments);
        let response: GenerateContentResponse = self.http.generate_content(&request).await?;

        if let Some(text) = response.text() {
            return Ok(text);
        }

        let reason = response
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.clone())
            .map(|r| format!("prompt blocked ({})", r))
            .or_else(|| {
                response
                    .candidates
                    .first()
                    .and_then(|c| c.finish_reason.clone())
                    .map(|r| format!("finish reason {}", r))
            })
            .unwrap_or_else(|| "no candidates".to_string());

        tracing::error!("Gemini returned no text: {}", reason);
        Err(Error::Upstream(format!("No text in Gemini response: {}", reason)))
    }

    fn model(&self) -> &str {
        self.http.model()
    }
}
