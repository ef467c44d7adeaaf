use super::roles::{INGEST_ROLE, RISK_ROLE, STRATEGY_ROLE};
use super::types::{AnalysisStage, RoleConfig, StageInput, StageName};

/// Summarizes the canonical document.
#[derive(Debug, Default, Clone, Copy)]
pub struct IngestStage;

/// Reads the ingest summary and analyzes risk.
#[derive(Debug, Default, Clone, Copy)]
pub struct RiskStage;

/// Reads both earlier outputs and produces recommendations.
#[derive(Debug, Default, Clone, Copy)]
pub struct StrategyStage;

impl AnalysisStage for IngestStage {
    fn name(&self) -> StageName {
        StageName::INGEST
    }

    fn role(&self) -> &RoleConfig {
        &INGEST_ROLE
    }

    fn requires(&self) -> &[StageName] {
        &[]
    }

    fn build_prompt(&self, input: &StageInput<'_>) -> String {
        format!(
            "Summarize the uploaded financial data for a professional client report:\n{}",
            input.source
        )
    }
}

impl AnalysisStage for RiskStage {
    fn name(&self) -> StageName {
        StageName::RISK
    }

    fn role(&self) -> &RoleConfig {
        &RISK_ROLE
    }

    fn requires(&self) -> &[StageName] {
        &[StageName::INGEST]
    }

    fn build_prompt(&self, input: &StageInput<'_>) -> String {
        format!(
            "Analyze the financial risks in the following data:\n{}\n\
             Provide readable insights for management.",
            input.prior(StageName::INGEST).unwrap_or_default()
        )
    }
}

impl AnalysisStage for StrategyStage {
    fn name(&self) -> StageName {
        StageName::STRATEGY
    }

    fn role(&self) -> &RoleConfig {
        &STRATEGY_ROLE
    }

    fn requires(&self) -> &[StageName] {
        &[StageName::INGEST, StageName::RISK]
    }

    fn build_prompt(&self, input: &StageInput<'_>) -> String {
        format!(
            "Provide strategic recommendations based on the data and its risk analysis.\n\
             Data:\n{}\nRisk insights:\n{}\n\
             Write the answer as readable, client-ready text.",
            input.prior(StageName::INGEST).unwrap_or_default(),
            input.prior(StageName::RISK).unwrap_or_default()
        )
    }
}

/// The fixed ingest, risk, strategy chain.
pub fn default_stages() -> Vec<Box<dyn AnalysisStage>> {
    vec![Box::new(IngestStage), Box::new(RiskStage), Box::new(StrategyStage)]
}
