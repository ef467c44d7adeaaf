//! Finsight CLI: one financial file in, one PDF analysis report out.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use finsight_lib::config::{self, AnalysisSettings};
use finsight_lib::pipeline::processor::build_processor;
use finsight_lib::pipeline_config::{LayoutConfig, PipelineConfig};

#[derive(Parser)]
#[command(
    name = "finsight",
    about = "Finsight: multi-stage financial analysis report generator",
    version
)]
struct Cli {
    /// Source file (csv, xls, xlsx, json, pdf, docx, txt)
    input: PathBuf,

    /// Report destination [default: <input stem>-report.pdf next to the input]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Cover page title
    #[arg(short, long)]
    title: Option<String>,

    /// Analysis model (overrides FINSIGHT_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Ollama base URL (overrides FINSIGHT_OLLAMA_URL)
    #[arg(long)]
    ollama_url: Option<String>,

    /// Write stage prompts and outputs under this directory (overrides FINSIGHT_DUMP_DIR)
    #[arg(long)]
    dump_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    finsight_lib::init_tracing();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = AnalysisSettings::from_env();
    if let Some(model) = cli.model {
        settings.model = model;
    }
    if let Some(url) = cli.ollama_url {
        settings.base_url = url;
    }
    if let Some(dir) = cli.dump_dir {
        settings.dump_dir = Some(dir);
    }

    let mut pipeline = PipelineConfig {
        dump_dir: settings.dump_dir.clone(),
        ..PipelineConfig::default()
    };
    if let Some(title) = cli.title {
        pipeline.report_title = title;
    }

    let output = cli.output.unwrap_or_else(|| default_output_path(&cli.input));

    let processor = build_processor(&settings, pipeline, LayoutConfig::default())?;
    let outcome = processor.orchestrate(&cli.input, &output)?;

    println!(
        "Report written to {} ({} pages)",
        outcome.output.display(),
        outcome.pages
    );
    Ok(())
}

/// `<dir>/<stem>-report.pdf` beside the input.
fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "finsight".to_string());
    input.with_file_name(format!("{stem}-report.pdf"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_sits_beside_input() {
        assert_eq!(
            default_output_path(Path::new("/data/q3/figures.xlsx")),
            PathBuf::from("/data/q3/figures-report.pdf")
        );
    }

    #[test]
    fn cli_parses_overrides() {
        let cli = Cli::parse_from([
            "finsight",
            "figures.csv",
            "--output",
            "out.pdf",
            "--model",
            "mistral",
            "--title",
            "Q3 Review",
        ]);
        assert_eq!(cli.input, PathBuf::from("figures.csv"));
        assert_eq!(cli.output, Some(PathBuf::from("out.pdf")));
        assert_eq!(cli.model.as_deref(), Some("mistral"));
        assert_eq!(cli.title.as_deref(), Some("Q3 Review"));
        assert!(cli.ollama_url.is_none());
    }
}
