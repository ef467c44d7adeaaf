use std::path::PathBuf;
use std::time::Instant;

use uuid::Uuid;

use super::context::PipelineContext;
use super::sections::{
    SectionMap, CONCLUSION, EXECUTIVE_SUMMARY, KEY_INDICATORS, RECOMMENDATIONS, RISK_ANALYSIS,
};
use super::stages::default_stages;
use super::types::{AnalysisCapability, AnalysisStage, StageInput, StageName};
use super::{PipelineError, StageFailureCause};
use crate::pipeline::canonical::{truncate_chars, CanonicalDocument};
use crate::pipeline::diagnostic;
use crate::pipeline_config::PipelineConfig;

/// Drives the stage chain over one canonical document.
///
/// Stages run strictly in order. The first failure aborts the run; no
/// section map is produced from a partial context.
pub struct PipelineRunner {
    capability: Box<dyn AnalysisCapability + Send + Sync>,
    stages: Vec<Box<dyn AnalysisStage>>,
    config: PipelineConfig,
}

impl PipelineRunner {
    /// Runner over the built-in ingest, risk, strategy chain.
    pub fn new(capability: Box<dyn AnalysisCapability + Send + Sync>, config: PipelineConfig) -> Self {
        Self::with_stages(capability, default_stages(), config)
    }

    pub fn with_stages(
        capability: Box<dyn AnalysisCapability + Send + Sync>,
        stages: Vec<Box<dyn AnalysisStage>>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            capability,
            stages,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage and assemble the five-section report map.
    pub fn run(&self, document: &CanonicalDocument) -> Result<SectionMap, PipelineError> {
        let run_id = Uuid::new_v4();
        let dump = self.dump_dir(&run_id);

        let context = self.execute(document, dump.as_ref())?;
        let sections = assemble_sections(&context, document, &self.config.conclusion)?;

        if let Some(dir) = &dump {
            diagnostic::dump_json(dir, "sections.json", &sections);
        }
        tracing::info!(%run_id, sections = sections.len(), "Section map assembled");
        Ok(sections)
    }

    /// Run every stage and return the raw context, without assembling sections.
    pub fn run_stages(&self, document: &CanonicalDocument) -> Result<PipelineContext, PipelineError> {
        let run_id = Uuid::new_v4();
        let dump = self.dump_dir(&run_id);
        self.execute(document, dump.as_ref())
    }

    fn dump_dir(&self, run_id: &Uuid) -> Option<PathBuf> {
        self.config
            .dump_dir
            .as_deref()
            .and_then(|base| diagnostic::dump_dir_for(base, run_id))
    }

    fn execute(
        &self,
        document: &CanonicalDocument,
        dump: Option<&PathBuf>,
    ) -> Result<PipelineContext, PipelineError> {
        if let Some(dir) = dump {
            diagnostic::dump_json(dir, "00-canonical.json", document);
        }

        let mut context = PipelineContext::new();

        for (position, stage) in self.stages.iter().enumerate() {
            let name = stage.name();
            let _span = tracing::info_span!("analysis_stage", stage = %name, position).entered();

            let prior = self.gather_prior(stage.as_ref(), &context)?;
            let input = StageInput {
                source: document.stage_input(),
                prior: prior.iter().map(|(n, text)| (*n, text.as_str())).collect(),
            };
            let prompt = stage.build_prompt(&input);

            if let Some(dir) = dump {
                diagnostic::dump_text(dir, &diagnostic::stage_artifact(position, name.as_str(), "prompt"), &prompt);
            }

            let started = Instant::now();
            let response = self.capability.invoke(&prompt, stage.role()).map_err(|e| {
                tracing::error!(error = %e, "Stage call failed");
                PipelineError::StageFailure {
                    stage: name,
                    cause: StageFailureCause::Capability(e),
                }
            })?;

            let content = response.content.trim();
            if content.is_empty() {
                tracing::error!("Stage returned empty content");
                return Err(PipelineError::StageFailure {
                    stage: name,
                    cause: StageFailureCause::EmptyContent,
                });
            }

            tracing::info!(
                prompt_chars = prompt.chars().count(),
                output_chars = content.chars().count(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Stage complete"
            );

            if let Some(dir) = dump {
                diagnostic::dump_text(dir, &diagnostic::stage_artifact(position, name.as_str(), "output"), content);
            }

            context.record(name, content.to_string())?;
        }

        Ok(context)
    }

    /// Prior outputs the stage declared, each capped at `max_context_chars`.
    fn gather_prior(
        &self,
        stage: &dyn AnalysisStage,
        context: &PipelineContext,
    ) -> Result<Vec<(StageName, String)>, PipelineError> {
        stage
            .requires()
            .iter()
            .map(|&required| -> Result<_, PipelineError> {
                let text = context.get(required).ok_or(PipelineError::MissingContext {
                    stage: stage.name(),
                    requires: required,
                })?;
                Ok((required, truncate_chars(text, self.config.max_context_chars)))
            })
            .collect()
    }
}

/// Build the fixed five-section map from a complete context.
pub fn assemble_sections(
    context: &PipelineContext,
    document: &CanonicalDocument,
    conclusion: &str,
) -> Result<SectionMap, PipelineError> {
    let entry = |stage: StageName| {
        context.get(stage).ok_or(PipelineError::MissingContext {
            stage: StageName::new("assemble"),
            requires: stage,
        })
    };

    Ok(SectionMap::new()
        .with(EXECUTIVE_SUMMARY, entry(StageName::INGEST)?)
        .with(KEY_INDICATORS, document.stage_input())
        .with(RISK_ANALYSIS, entry(StageName::RISK)?)
        .with(RECOMMENDATIONS, entry(StageName::STRATEGY)?)
        .with(CONCLUSION, conclusion))
}
