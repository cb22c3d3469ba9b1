//! Conversation analysis: embed recent messages, store the vectors, and ask
//! the completion service for a structured summary of everything stored.

pub mod embedder;
pub mod pipeline;
pub mod prompt;
pub mod store;

pub use embedder::Embedder;
pub use pipeline::{AnalysisConfig, AnalysisPipeline, EmbedReceipt};
pub use prompt::AnalysisPrompt;
pub use store::EmbeddingRepository;
