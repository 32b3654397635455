use super::ModelService;
use crate::attachment::EncodedAttachment;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const DEFAULT_RESPONSE: &str = r#"{"rootCause":"Mock root cause","explanation":"Mock explanation","nextSteps":["Mock step"]}"#;

/// Request captured by [`MockModelClient`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub prompt: String,
    pub attachments: Vec<EncodedAttachment>,
}

pub struct MockModelClient {
    responses: Arc<Mutex<Vec<String>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    call_count: Arc<Mutex<usize>>,
    failure: Option<String>,
    delay: Option<Duration>,
}

impl MockModelClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            failure: None,
            delay: None,
        }
    }

    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push(response.into());
        self
    }

    /// Fail every call with [`Error::Upstream`] carrying `message`.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Sleep before answering, to exercise cancellation.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Handle that shares this mock's counters after it is boxed.
    pub fn handle(&self) -> Self {
        Self {
            responses: Arc::clone(&self.responses),
            requests: Arc::clone(&self.requests),
            call_count: Arc::clone(&self.call_count),
            failure: self.failure.clone(),
            delay: self.delay,
        }
    }
}

impl Default for MockModelClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelService for MockModelClient {
    async fn generate(&self, prompt: &str, attachments: &[EncodedAttachment]) -> Result<String> {
        let count = {
            let mut count = self.call_count.lock().unwrap();
            *count += 1;
            *count
        };
        self.requests.lock().unwrap().push(RecordedRequest {
            prompt: prompt.to_string(),
            attachments: attachments.to_vec(),
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(message) = &self.failure {
            return Err(Error::Upstream(message.clone()));
        }

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(DEFAULT_RESPONSE.to_string())
        } else {
            let index = (count - 1) % responses.len();
            Ok(responses[index].clone())
        }
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}
