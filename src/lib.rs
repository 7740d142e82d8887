// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod profile;
pub mod types;

// ---- Re-exports for stable public API ----
pub use crate::api::create_router;
pub use crate::config::PipelineConfig;
pub use crate::error::{PipelineError, Result};
