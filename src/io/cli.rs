//! Command-line interface for the conversion and classification pipelines

use crate::classify::client::{ChatOptions, OpenAiClient};
use crate::classify::layout::{ExperimentLayout, ImageVariant};
use crate::classify::prompt::Detail;
use crate::classify::runner::{ClassificationRunner, ClassifyConfig};
use crate::io::configuration::{
    API_KEY_ENV, DEFAULT_BATCH_SIZE, DEFAULT_DATA_ROOT, DEFAULT_EXAMPLE_COUNT, DEFAULT_MAX_TOKENS,
    DEFAULT_MODEL, DEFAULT_OUTPUT_ROOT, DEFAULT_REPETITION, DEFAULT_SEVERITY, DEFAULT_TEMPERATURE,
};
use crate::io::error::Result;
use crate::simulate::runner::{ConvertConfig, ConvertRunner};
use crate::simulate::simulator::{Deficiency, SimulatorKind, validate_severity};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for the dermalens toolkit
#[derive(Parser)]
#[command(name = "dermalens")]
#[command(
    author,
    version,
    about = "Simulate color vision deficiency and classify lesion images few-shot"
)]
pub struct Cli {
    /// Pipeline to run
    #[command(subcommand)]
    pub command: Commands,

    /// Suppress progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// The two one-shot pipelines
#[derive(Subcommand)]
pub enum Commands {
    /// Convert image directories into simulated CVD variants
    Convert(ConvertArgs),
    /// Classify query images with a few-shot multimodal prompt
    Classify(ClassifyArgs),
}

/// Arguments for the conversion pipeline
#[derive(Args)]
pub struct ConvertArgs {
    /// Source directories containing images to convert
    #[arg(value_name = "SOURCE", required = true, num_args = 1..)]
    pub sources: Vec<PathBuf>,

    /// Simulation algorithm
    #[arg(short, long, value_enum, default_value_t = SimulatorKind::Brettel)]
    pub sim: SimulatorKind,

    /// Deficiency types to render, one output directory each
    #[arg(
        short,
        long,
        value_enum,
        num_args = 1..,
        default_values_t = [Deficiency::Protan, Deficiency::Deutan, Deficiency::Tritan]
    )]
    pub deficiency: Vec<Deficiency>,

    /// Simulation severity in 0.0..=1.0
    #[arg(long, default_value_t = DEFAULT_SEVERITY)]
    pub severity: f32,
}

/// Arguments for the classification pipeline
#[derive(Args)]
pub struct ClassifyArgs {
    /// Chat model identifier
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Maximum response token budget
    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,

    /// Sampling temperature
    #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
    pub temperature: f32,

    /// Image quality hint sent with every embedded image
    #[arg(long, value_enum, default_value_t = Detail::High)]
    pub detail: Detail,

    /// Number of classifications accumulated before a CSV flush
    #[arg(short, long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch: usize,

    /// Number of reference examples drawn per label
    #[arg(short, long, default_value_t = DEFAULT_EXAMPLE_COUNT)]
    pub k: usize,

    /// Repetition identifier, kept in the result directory name
    #[arg(long, default_value_t = DEFAULT_REPETITION)]
    pub rep: u32,

    /// Classify a CVD-converted image variant; omit for original images
    #[arg(long, value_enum)]
    pub sim: Option<SimulatorKind>,

    /// Deficiency type of the variant, required when --sim is given
    #[arg(long, value_enum)]
    pub cvd: Option<Deficiency>,

    /// Severity of the variant, required when --sim is given
    #[arg(long)]
    pub severity: Option<f32>,

    /// Classify the held-out test split instead of the full set
    #[arg(long)]
    pub test: bool,

    /// Sampler seed for reproducible example draws
    #[arg(long)]
    pub seed: Option<u64>,

    /// Root directory of the experiment input data
    #[arg(long, default_value = DEFAULT_DATA_ROOT)]
    pub data_root: PathBuf,

    /// Root directory receiving classification results
    #[arg(long, default_value = DEFAULT_OUTPUT_ROOT)]
    pub output_root: PathBuf,
}

impl ClassifyArgs {
    /// Resolve the image variant this run classifies
    ///
    /// # Errors
    ///
    /// Returns an error if `--sim` is given without `--cvd` or `--severity`,
    /// or the severity is out of range
    pub fn variant(&self) -> Result<ImageVariant> {
        let Some(simulator) = self.sim else {
            return Ok(ImageVariant::Original);
        };

        let deficiency = self.cvd.ok_or_else(|| {
            crate::io::error::invalid_parameter(
                "cvd",
                &"none",
                &"--cvd must be specified when --sim is given",
            )
        })?;
        let severity = self.severity.ok_or_else(|| {
            crate::io::error::invalid_parameter(
                "severity",
                &"none",
                &"--severity must be specified when --sim is given",
            )
        })?;
        validate_severity(severity)?;

        Ok(ImageVariant::Simulated {
            simulator,
            deficiency,
            severity,
        })
    }
}

impl Cli {
    /// Dispatch the selected pipeline
    ///
    /// # Errors
    ///
    /// Returns an error if argument validation or pipeline processing fails
    pub fn run(self) -> Result<()> {
        let show_progress = !self.quiet;
        match self.command {
            Commands::Convert(args) => run_convert(args, show_progress),
            Commands::Classify(args) => run_classify(args, show_progress),
        }
    }
}

fn run_convert(args: ConvertArgs, show_progress: bool) -> Result<()> {
    let config = ConvertConfig {
        simulator: args.sim,
        deficiencies: args.deficiency,
        severity: args.severity,
        sources: args.sources,
    };
    ConvertRunner::new(config, show_progress)?.run()?;
    Ok(())
}

fn run_classify(args: ClassifyArgs, show_progress: bool) -> Result<()> {
    let variant = args.variant()?;
    let api_key = std::env::var(API_KEY_ENV).ok().ok_or_else(|| {
        crate::io::error::invalid_parameter(
            "api key",
            &API_KEY_ENV,
            &format!("set the {API_KEY_ENV} environment variable"),
        )
    })?;

    let layout = ExperimentLayout::new(
        &args.data_root,
        &args.output_root,
        &variant,
        args.k,
        args.rep,
        args.test,
    );
    let client = OpenAiClient::new(
        api_key,
        ChatOptions {
            model: args.model,
            max_tokens: args.max_tokens,
            temperature: args.temperature,
        },
    )?;
    let config = ClassifyConfig {
        k: args.k,
        batch_size: args.batch,
        detail: args.detail,
        seed: args.seed,
    };

    ClassificationRunner::new(client, layout, config, show_progress)?.run()?;
    Ok(())
}
