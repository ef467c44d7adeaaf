//! Report processing orchestrator.
//!
//! Single entry point that drives the full pipeline:
//! load → normalize → analysis stages → render.
//!
//! The analysis capability is injected as a trait object so the whole run
//! is testable offline.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::AnalysisSettings;
use crate::pipeline::analysis::{AnalysisCapability, CapabilityError, OllamaClient, PipelineError, PipelineRunner};
use crate::pipeline::canonical::{CanonicalDocument, Canonicalizer};
use crate::pipeline::import;
use crate::pipeline::report::{RenderError, ReportCompositor};
use crate::pipeline_config::{LayoutConfig, PipelineConfig};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("Analysis pipeline failed: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Report rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("Analysis backend unavailable: {0}")]
    Capability(#[from] CapabilityError),
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Summary of one completed run.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    /// `tabular`, `text`, `structured_record` or `unsupported`.
    pub payload_kind: &'static str,
    /// True when the loader fell back to a diagnostic.
    pub loader_fallback: bool,
    pub sections: usize,
    pub pages: usize,
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

pub struct ReportProcessor {
    canonicalizer: Canonicalizer,
    runner: PipelineRunner,
    compositor: ReportCompositor,
    title: String,
}

impl ReportProcessor {
    pub fn new(
        capability: Box<dyn AnalysisCapability + Send + Sync>,
        config: PipelineConfig,
        layout: LayoutConfig,
    ) -> Self {
        Self::with_compositor(capability, config, ReportCompositor::new(layout))
    }

    pub fn with_compositor(
        capability: Box<dyn AnalysisCapability + Send + Sync>,
        config: PipelineConfig,
        compositor: ReportCompositor,
    ) -> Self {
        let canonicalizer = Canonicalizer::new(config.max_text_chars);
        let title = config.report_title.clone();
        Self {
            canonicalizer,
            runner: PipelineRunner::new(capability, config),
            compositor,
            title,
        }
    }

    /// Load `input`, analyze it and write the report to `output`.
    ///
    /// Unreadable or unsupported input is not an error: its diagnostic
    /// becomes the document text. Nothing is written unless every stage
    /// succeeded.
    pub fn orchestrate(&self, input: &Path, output: &Path) -> Result<ProcessingOutcome, ProcessingError> {
        let payload = import::load(input);
        let payload_kind = payload.kind();
        let loader_fallback = payload.is_unsupported();

        let document = self.canonicalizer.normalize(payload);
        log_document(&document);

        let sections = self.runner.run(&document)?;
        let rendered = self.compositor.render(&sections, &self.title, output)?;

        tracing::info!(
            input = %input.display(),
            output = %rendered.path.display(),
            pages = rendered.pages,
            "Report complete"
        );

        Ok(ProcessingOutcome {
            input: input.to_path_buf(),
            output: rendered.path,
            payload_kind,
            loader_fallback,
            sections: sections.len(),
            pages: rendered.pages,
        })
    }
}

fn log_document(document: &CanonicalDocument) {
    match document {
        CanonicalDocument::Table(table) => {
            let profile = table.profile();
            tracing::info!(
                rows = profile.rows,
                columns = profile.columns,
                kinds = ?profile.column_kinds,
                "Canonical table ready"
            );
        }
        CanonicalDocument::Text { text } => {
            tracing::info!(chars = text.chars().count(), "Canonical text ready");
        }
    }
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// Build a processor backed by Ollama.
///
/// A missing model is logged, not fatal: the first stage call reports it.
pub fn build_processor(
    settings: &AnalysisSettings,
    config: PipelineConfig,
    layout: LayoutConfig,
) -> Result<ReportProcessor, ProcessingError> {
    let ollama = OllamaClient::from_settings(settings)?;
    match ollama.ensure_model() {
        Ok(()) => tracing::info!(model = %ollama.model(), "Analysis model available"),
        Err(CapabilityError::ModelUnavailable(model)) => tracing::warn!(
            model = %model,
            "Analysis model not found on backend; pull it before running"
        ),
        Err(e) => tracing::warn!(error = %e, "Analysis backend preflight failed"),
    }

    Ok(ReportProcessor::new(Box::new(ollama), config, layout))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::analysis::{ScriptedCapability, StageName, INGEST_ROLE, RISK_ROLE, STRATEGY_ROLE};
    use crate::pipeline::report::{PageKind, ReportLayout};
    use std::sync::Arc;

    fn scripted() -> ScriptedCapability {
        ScriptedCapability::new("unused")
            .with_reply(INGEST_ROLE.name, "Revenue grew while cost stayed flat.")
            .with_reply(RISK_ROLE.name, "Concentration risk is moderate.")
            .with_reply(STRATEGY_ROLE.name, "Diversify the customer base.")
    }

    fn processor(capability: Arc<ScriptedCapability>) -> ReportProcessor {
        ReportProcessor::new(
            Box::new(capability),
            PipelineConfig::default(),
            LayoutConfig::default(),
        )
    }

    fn section_pages(layout: &ReportLayout) -> Vec<&str> {
        layout
            .pages
            .iter()
            .filter_map(|p| match &p.kind {
                PageKind::Section { title, .. } => Some(title.as_str()),
                PageKind::Cover => None,
            })
            .collect()
    }

    #[test]
    fn csv_happy_path_writes_cover_plus_five_sections() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("figures.csv");
        std::fs::write(&input, "Revenue,Cost\n1000,400\n1100,420\n1200,450\n").unwrap();
        let output = tmp.path().join("report.pdf");

        let capability = Arc::new(scripted());
        let outcome = processor(Arc::clone(&capability)).orchestrate(&input, &output).unwrap();

        assert_eq!(outcome.payload_kind, "tabular");
        assert!(!outcome.loader_fallback);
        assert_eq!(outcome.sections, 5);
        assert_eq!(outcome.pages, 6);
        assert!(output.exists());

        let calls = capability.calls();
        assert_eq!(calls.len(), 3);
        assert!(calls[0].prompt.ends_with("- Revenue: 1000\n- Cost: 400"));

        let doc = lopdf::Document::load(&output).unwrap();
        assert_eq!(doc.get_pages().len(), 6);
    }

    #[test]
    fn unsupported_input_still_runs_stages_on_diagnostic() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("blob.bin");
        std::fs::write(&input, [0u8, 1, 2, 3]).unwrap();
        let output = tmp.path().join("report.pdf");

        let capability = Arc::new(scripted());
        let outcome = processor(Arc::clone(&capability)).orchestrate(&input, &output).unwrap();

        assert_eq!(outcome.payload_kind, "unsupported");
        assert!(outcome.loader_fallback);
        let first_prompt = &capability.calls()[0].prompt;
        assert!(first_prompt.contains("Unsupported file format"));
        assert!(output.exists());
    }

    #[test]
    fn risk_failure_writes_no_report() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("notes.txt");
        std::fs::write(&input, "Quarterly revenue 1.2M").unwrap();
        let output = tmp.path().join("report.pdf");

        let capability = Arc::new(scripted().with_failure(RISK_ROLE.name, "model crashed"));
        let err = processor(Arc::clone(&capability)).orchestrate(&input, &output).unwrap_err();

        match err {
            ProcessingError::Pipeline(e) => assert_eq!(e.stage(), Some(StageName::RISK)),
            other => panic!("unexpected error: {other}"),
        }
        assert!(!output.exists());
        assert_eq!(capability.call_count(), 2);
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[test]
    fn unwritable_output_is_a_render_error() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("notes.txt");
        std::fs::write(&input, "Cash on hand 300k").unwrap();
        let output = tmp.path().join("missing-dir").join("report.pdf");

        let err = processor(Arc::new(scripted())).orchestrate(&input, &output).unwrap_err();
        assert!(matches!(err, ProcessingError::Render(RenderError::Io { .. })));
        assert!(err.to_string().starts_with("Report rendering failed"));
    }

    #[test]
    fn long_text_is_truncated_before_ingest() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("long.txt");
        std::fs::write(&input, "a".repeat(10_000)).unwrap();
        let output = tmp.path().join("report.pdf");

        let capability = Arc::new(scripted());
        processor(Arc::clone(&capability)).orchestrate(&input, &output).unwrap();

        let prompt = &capability.calls()[0].prompt;
        assert!(prompt.contains(&"a".repeat(5000)));
        assert!(!prompt.contains(&"a".repeat(5001)));
    }

    #[test]
    fn section_pages_follow_fixed_order() {
        let capability = Arc::new(scripted());
        let processor = processor(Arc::clone(&capability));
        let document = CanonicalDocument::Text {
            text: "- Revenue: 1000".into(),
        };
        let sections = processor.runner.run(&document).unwrap();
        let layout = processor.compositor.compose(&sections, "T");
        assert_eq!(
            section_pages(&layout),
            vec![
                "Executive Summary",
                "Key Financial Indicators",
                "Risk Analysis",
                "Strategic Recommendations",
                "Conclusion"
            ]
        );
    }

    #[test]
    fn build_processor_tolerates_unreachable_backend() {
        let settings = AnalysisSettings {
            base_url: "http://127.0.0.1:9".into(),
            model: "llama3.1".into(),
            timeout_secs: 2,
            dump_dir: None,
        };
        let built = build_processor(&settings, PipelineConfig::default(), LayoutConfig::default());
        assert!(built.is_ok());
    }

    #[test]
    fn processing_error_wraps_stage_name() {
        let err: ProcessingError = PipelineError::ContextOverwrite(StageName::INGEST).into();
        assert!(err.to_string().contains("ingest"));
    }
}
