//! Query pipeline (embed, retrieve, generate), configuration loading and secrets.

pub mod config;
pub mod pipeline;
pub mod transcript;
pub mod vault;

pub use pipeline::{PipelineError, QueryPipeline, QueryService, StageError};
pub use transcript::Transcript;
