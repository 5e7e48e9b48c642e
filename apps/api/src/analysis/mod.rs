// Senior-rater analysis: prompt, model call, validation and fallback.
// All LLM calls go through llm_client. All rating arithmetic goes through rating.

pub mod analyzer;
pub mod enrich;
pub mod fallback;
pub mod model;
pub mod prompts;

pub use analyzer::{ClaimsAnalyzer, LlmClaimsAnalyzer};
pub use model::ClaimsAnalysis;
