use indexmap::IndexMap;
use serde::Serialize;

use super::types::StageName;
use super::PipelineError;

/// Accumulated stage outputs, in execution order. Entries are write-once.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PipelineContext {
    entries: IndexMap<StageName, String>,
}

impl PipelineContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, stage: StageName, output: String) -> Result<(), PipelineError> {
        if self.entries.contains_key(&stage) {
            return Err(PipelineError::ContextOverwrite(stage));
        }
        self.entries.insert(stage, output);
        Ok(())
    }

    pub fn get(&self, stage: StageName) -> Option<&str> {
        self.entries.get(&stage).map(String::as_str)
    }

    pub fn contains(&self, stage: StageName) -> bool {
        self.entries.contains_key(&stage)
    }

    pub fn stages(&self) -> impl Iterator<Item = StageName> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
