//! Adforge - brand-safe marketing video generation CLI.
//!
//! ## Commands
//!
//! - `run`: full generation-critique loop from brand/campaign brief files
//! - `generate`: one-shot generation, no critique
//! - `critique`: score an existing video without generating
//!
//! Credentials come from `GEMINI_API_KEY` (and optionally `VEO_API_KEY`);
//! loop tunables from the `ADFORGE_*` variables.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::Level;

use adforge_core::{
    default_specialists, extended_specialists, init_tracing, BrandKit, CampaignBrief,
    FfmpegSampler, GeminiCritic, GenerationOrchestrator, GoogleAiConfig, GoogleVideoClient,
    LoopSettings, LoopVerdict, RunRequest, Scorecard, SpecialistConfig,
};

#[derive(Parser)]
#[command(name = "adforge")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Brand-safe marketing video generation", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full generation-critique loop for a campaign
    Run {
        /// Path to a brand kit JSON file
        #[arg(long)]
        brand: PathBuf,

        /// Path to a campaign brief JSON file
        #[arg(long)]
        campaign: PathBuf,

        /// Creative direction honored alongside brand constraints
        #[arg(long)]
        caption: Option<String>,

        /// Override the campaign's regeneration limit
        #[arg(long)]
        regen_limit: Option<u32>,

        /// Override the score threshold (0.0-1.0)
        #[arg(long)]
        threshold: Option<f64>,

        /// Scorecard JSON whose feedback seeds the first prompt
        #[arg(long)]
        resume_from: Option<PathBuf>,

        /// Also run the TextAccuracy and ProductPresence evaluators
        #[arg(long)]
        extended: bool,

        /// Write the outcome JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate one video without critique
    Generate {
        /// Path to a brand kit JSON file
        #[arg(long)]
        brand: PathBuf,

        /// Path to a campaign brief JSON file
        #[arg(long)]
        campaign: PathBuf,

        /// Creative direction honored alongside brand constraints
        #[arg(long)]
        caption: Option<String>,

        /// Write the attempt JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Score an existing video against a brand and campaign
    Critique {
        /// Path to the video file to evaluate
        video: PathBuf,

        /// Path to a brand kit JSON file
        #[arg(long)]
        brand: PathBuf,

        /// Path to a campaign brief JSON file
        #[arg(long)]
        campaign: PathBuf,

        /// Caption/transcript shown to the evaluators
        #[arg(long)]
        caption: Option<String>,

        /// Override the score threshold (0.0-1.0)
        #[arg(long)]
        threshold: Option<f64>,

        /// Also run the TextAccuracy and ProductPresence evaluators
        #[arg(long)]
        extended: bool,

        /// Write the scorecard JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn load_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {what} from {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {what} from {}", path.display()))
}

fn emit<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serializing result")?;
    match output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("writing result to {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn specialists(extended: bool) -> Vec<SpecialistConfig> {
    if extended {
        extended_specialists()
    } else {
        default_specialists()
    }
}

fn build_orchestrator() -> Result<GenerationOrchestrator> {
    let settings = LoopSettings::from_env().context("loading loop settings")?;
    let google = GoogleAiConfig::from_env().context("loading Google AI credentials")?;

    GenerationOrchestrator::new(
        Arc::new(GoogleVideoClient::new(google.clone())),
        Arc::new(GeminiCritic::new(google)),
        Arc::new(FfmpegSampler::default()),
        settings,
    )
    .context("building orchestrator")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(cli.json, level);

    match cli.command {
        Commands::Run {
            brand,
            campaign,
            caption,
            regen_limit,
            threshold,
            resume_from,
            extended,
            output,
        } => {
            let brand: BrandKit = load_json(&brand, "brand kit")?;
            let campaign: CampaignBrief = load_json(&campaign, "campaign brief")?;
            let previous_scorecard: Option<Scorecard> = match resume_from {
                Some(path) => Some(load_json(&path, "scorecard")?),
                None => None,
            };

            let orchestrator = build_orchestrator()?;
            let request = RunRequest {
                brand,
                campaign,
                caption,
                regen_limit,
                score_threshold: threshold,
                previous_scorecard,
                specialists: Some(specialists(extended)),
            };
            let outcome = orchestrator.run(request).await?;

            match outcome.verdict {
                LoopVerdict::Passed => {
                    println!("Passed on attempt {}", outcome.final_attempt.iteration)
                }
                LoopVerdict::Exhausted => println!(
                    "Quality bar not met after {} attempts; returning best effort",
                    outcome.history.len(),
                ),
            }
            emit(&outcome, output.as_deref())?;
        }

        Commands::Generate {
            brand,
            campaign,
            caption,
            output,
        } => {
            let brand: BrandKit = load_json(&brand, "brand kit")?;
            let campaign: CampaignBrief = load_json(&campaign, "campaign brief")?;

            let orchestrator = build_orchestrator()?;
            let attempt = orchestrator
                .generate_only(&brand, &campaign, caption.as_deref())
                .await?;
            println!("Generated {}", attempt.video_ref);
            emit(&attempt, output.as_deref())?;
        }

        Commands::Critique {
            video,
            brand,
            campaign,
            caption,
            threshold,
            extended,
            output,
        } => {
            let brand: BrandKit = load_json(&brand, "brand kit")?;
            let campaign: CampaignBrief = load_json(&campaign, "campaign brief")?;

            let orchestrator = build_orchestrator()?;
            let scorecard = orchestrator
                .critique_only(
                    &video,
                    &brand,
                    &campaign,
                    caption.as_deref(),
                    threshold,
                    Some(specialists(extended)),
                )
                .await?;

            if scorecard.passed() {
                println!("Scorecard: pass");
            } else {
                let failing: Vec<String> = scorecard
                    .failing()
                    .iter()
                    .map(|s| s.dimension.to_string())
                    .collect();
                println!("Scorecard: fail ({})", failing.join(", "));
            }
            emit(&scorecard, output.as_deref())?;
        }
    }

    Ok(())
}
