//! Failure analysis orchestration.
//!
//! One call checks the credential, encodes attachments, sends a single
//! multimodal request and parses the answer. Success is all-or-nothing.

use crate::ai::{GeminiModelClient, ModelService};
use crate::attachment::{self, AttachmentInput, EncodedAttachment};
use crate::models::{AnalysisResult, Config};
use crate::{parse, prompts, Error, Result};
use std::future::Future;
use tracing::{debug, info, Instrument};
use uuid::Uuid;

/// Inputs for one analysis call after attachments have been encoded.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub log: String,
    pub context: String,
    pub attachments: Vec<EncodedAttachment>,
}

impl AnalysisRequest {
    pub fn prompt(&self) -> String {
        prompts::analysis_prompt(&self.log, &self.context)
    }
}

/// Stage of a single analysis call, used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CheckingCredential,
    EncodingAttachments,
    AwaitingUpstream,
    ParsingResponse,
    Succeeded,
    Failed,
}

/// Stateless entry point for failure analysis.
///
/// Without a configured credential there is no model client, and every call
/// fails with [`Error::MissingCredential`].
pub struct Analyzer {
    model: Option<Box<dyn ModelService>>,
}

impl Analyzer {
    pub fn new(config: &Config) -> Self {
        let model = config.api_key.clone().map(|api_key| {
            info!("Analysis provider: Gemini (model: {})", config.model);
            Box::new(GeminiModelClient::from_config(config, api_key)) as Box<dyn ModelService>
        });

        Self { model }
    }

    /// Build an analyzer around an existing model client.
    ///
    /// This is primarily useful for tests and harnesses that inject mocks.
    pub fn with_service(model: Box<dyn ModelService>) -> Self {
        Self { model: Some(model) }
    }

    pub fn is_configured(&self) -> bool {
        self.model.is_some()
    }

    pub async fn analyze(
        &self,
        log: &str,
        context: &str,
        files: Vec<AttachmentInput>,
    ) -> Result<AnalysisResult> {
        self.analyze_until(log, context, files, std::future::pending())
            .await
    }

    /// Like [`Analyzer::analyze`], but gives up with [`Error::Cancelled`] if
    /// `cancel` completes while the upstream request is in flight. Dropping
    /// the request aborts the HTTP exchange.
    pub async fn analyze_until<C>(
        &self,
        log: &str,
        context: &str,
        files: Vec<AttachmentInput>,
        cancel: C,
    ) -> Result<AnalysisResult>
    where
        C: Future<Output = ()> + Send,
    {
        let analysis_id = Uuid::new_v4();
        let span = tracing::info_span!("analysis", id = %analysis_id);

        let outcome = self
            .run(log, context, files, cancel)
            .instrument(span.clone())
            .await;

        span.in_scope(|| match &outcome {
            Ok(result) => debug!(stage = ?Stage::Succeeded, steps = result.next_steps.len()),
            Err(e) => debug!(stage = ?Stage::Failed, "Analysis failed: {}", e),
        });
        outcome
    }

    async fn run<C>(
        &self,
        log: &str,
        context: &str,
        files: Vec<AttachmentInput>,
        cancel: C,
    ) -> Result<AnalysisResult>
    where
        C: Future<Output = ()> + Send,
    {
        debug!(stage = ?Stage::CheckingCredential);
        let model = self.model.as_deref().ok_or(Error::MissingCredential)?;

        debug!(stage = ?Stage::EncodingAttachments, count = files.len());
        let request = AnalysisRequest {
            log: log.to_string(),
            context: context.to_string(),
            attachments: attachment::encode_all(files).await?,
        };

        debug!(stage = ?Stage::AwaitingUpstream, model = model.model());
        let prompt = request.prompt();
        let text = tokio::select! {
            response = model.generate(&prompt, &request.attachments) => response?,
            _ = cancel => return Err(Error::Cancelled),
        };

        debug!(stage = ?Stage::ParsingResponse, chars = text.len());
        parse::parse_analysis(&text)
    }
}
