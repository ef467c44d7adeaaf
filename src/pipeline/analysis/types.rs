use serde::{Deserialize, Serialize};

use super::CapabilityError;

/// Name of a pipeline stage. Also the key of its `PipelineContext` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct StageName(&'static str);

impl StageName {
    pub const INGEST: StageName = StageName("ingest");
    pub const RISK: StageName = StageName("risk");
    pub const STRATEGY: StageName = StageName("strategy");

    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for StageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Static per-stage configuration handed to the capability with every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleConfig {
    pub name: &'static str,
    pub description: &'static str,
    pub instructions: &'static [&'static str],
}

impl RoleConfig {
    /// System prompt: role description followed by instruction bullets.
    pub fn system_prompt(&self) -> String {
        let mut prompt = self.description.trim().to_string();
        if !self.instructions.is_empty() {
            prompt.push_str("\n\nInstructions:");
            for instruction in self.instructions {
                prompt.push_str("\n- ");
                prompt.push_str(instruction);
            }
        }
        prompt
    }
}

/// What the capability hands back on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityResponse {
    pub content: String,
}

impl CapabilityResponse {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// The opaque analysis capability: text and role in, text out.
pub trait AnalysisCapability {
    fn invoke(&self, prompt: &str, role: &RoleConfig)
        -> Result<CapabilityResponse, CapabilityError>;
}

impl<T: AnalysisCapability + ?Sized> AnalysisCapability for std::sync::Arc<T> {
    fn invoke(&self, prompt: &str, role: &RoleConfig)
        -> Result<CapabilityResponse, CapabilityError> {
        (**self).invoke(prompt, role)
    }
}

/// Inputs visible to one stage: the canonical text plus only the prior
/// entries the stage declared in `requires`.
#[derive(Debug, Clone)]
pub struct StageInput<'a> {
    pub source: &'a str,
    pub prior: Vec<(StageName, &'a str)>,
}

impl<'a> StageInput<'a> {
    pub fn prior(&self, stage: StageName) -> Option<&'a str> {
        self.prior
            .iter()
            .find(|(name, _)| *name == stage)
            .map(|(_, text)| *text)
    }
}

/// One step of the sequential pipeline.
pub trait AnalysisStage: Send + Sync {
    fn name(&self) -> StageName;

    fn role(&self) -> &RoleConfig;

    /// Earlier stages whose outputs this stage reads.
    fn requires(&self) -> &[StageName];

    fn build_prompt(&self, input: &StageInput<'_>) -> String;
}
