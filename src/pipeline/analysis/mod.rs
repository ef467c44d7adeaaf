pub mod types;
pub mod roles;
pub mod stages;
pub mod context;
pub mod sections;
pub mod ollama;
pub mod scripted;
pub mod runner;

pub use types::*;
pub use roles::*;
pub use stages::*;
pub use context::*;
pub use sections::*;
pub use ollama::*;
pub use scripted::*;
pub use runner::*;

use thiserror::Error;

/// Failure of the external analysis capability. Distinct from a valid,
/// possibly empty, content string.
#[derive(Error, Debug)]
pub enum CapabilityError {
    #[error("Analysis backend is not reachable at {0}")]
    Connection(String),

    #[error("Analysis backend returned error (status {status}): {body}")]
    Service { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("Model '{0}' is not available")]
    ModelUnavailable(String),

    #[error("Analysis backend error: {0}")]
    Backend(String),
}

/// Why a stage produced no output.
#[derive(Error, Debug)]
pub enum StageFailureCause {
    #[error(transparent)]
    Capability(#[from] CapabilityError),

    #[error("capability returned no usable content")]
    EmptyContent,
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Stage '{stage}' failed: {cause}")]
    StageFailure {
        stage: StageName,
        #[source]
        cause: StageFailureCause,
    },

    #[error("Stage '{stage}' requires output of '{requires}', which has not run")]
    MissingContext { stage: StageName, requires: StageName },

    #[error("Context entry for stage '{0}' already written")]
    ContextOverwrite(StageName),
}

impl PipelineError {
    /// The stage that failed, if the failure is attributable to one.
    pub fn stage(&self) -> Option<StageName> {
        match self {
            Self::StageFailure { stage, .. } | Self::MissingContext { stage, .. } => Some(*stage),
            Self::ContextOverwrite(stage) => Some(*stage),
        }
    }
}
