//! Failure explainer - multimodal root-cause analysis for error logs
//!
//! Sends an error log, optional context and screenshot or screen-recording
//! attachments to Gemini in one request, and turns the model's JSON answer
//! into a root cause, an explanation and a list of next steps.

pub mod ai;
pub mod analysis;
pub mod attachment;
pub mod error;
pub mod models;
pub mod parse;
pub mod prompts;
pub mod report;

pub use analysis::Analyzer;
pub use error::{Error, Result};
