pub mod analysis;
pub mod client;
pub mod types;

pub use analysis::GeminiModelClient;
pub use client::GeminiHttpClient;
