//! SoulCanvas CLI entry point.
//!
//! Provides `chart`, `prompt`, and `paint` subcommands for computing a BaZi
//! chart offline, inspecting the synthesized prompt, or running the full
//! two-stage reading against the remote service.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use tracing::{error, info};

use soulcanvas::calendar::HourBoundary;
use soulcanvas::config::Config;
use soulcanvas::credentials::{load_default_credentials, resolve_api_key};
use soulcanvas::logging;
use soulcanvas::pipeline::{compute_chart, prepare, Pipeline, PipelineOptions};
use soulcanvas::prompt::ImageBrief;
use soulcanvas::providers::gemini::GeminiClient;
use soulcanvas::providers::{ImageGenerator, TextGenerator};
use soulcanvas::types::{Gender, UserInput};

/// SoulCanvas: BaZi soul-landscape portraits.
#[derive(Parser)]
#[command(name = "soulcanvas", version, about)]
struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Birth moment and calendar overrides.
#[derive(Args)]
struct BirthArgs {
    /// Local birth date-time, `YYYY-MM-DDTHH:mm`.
    #[arg(long)]
    birth: String,
    /// Day-pillar rollover convention: `midnight` or `late-rat`.
    #[arg(long)]
    hour_boundary: Option<HourBoundary>,
    /// UTC offset of the birth time in minutes (default from config, 480).
    #[arg(long, allow_hyphen_values = true)]
    utc_offset_minutes: Option<i32>,
}

/// Everything the text prompt needs.
#[derive(Args)]
struct SubjectArgs {
    /// Birth moment.
    #[command(flatten)]
    birth: BirthArgs,
    /// Birth place, free text.
    #[arg(long)]
    location: String,
    /// `male` or `female`.
    #[arg(long)]
    gender: Gender,
}

impl SubjectArgs {
    fn user_input(&self) -> UserInput {
        UserInput {
            birth_date: self.birth.birth.clone(),
            location: self.location.clone(),
            gender: self.gender,
        }
    }
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Command {
    /// Compute the four pillars and element counts; prints JSON.
    Chart(BirthArgs),
    /// Print the synthesized text prompt and image brief.
    Prompt(SubjectArgs),
    /// Run the full reading and write the portrait to a file.
    Paint {
        /// Subject of the reading.
        #[command(flatten)]
        subject: SubjectArgs,
        /// Where to write the image bytes.
        #[arg(long)]
        out: PathBuf,
        /// Include the image as a `data:` URI in the JSON output.
        #[arg(long)]
        data_uri: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().context("failed to load configuration")?;
    let _logging_guard = match &config.logging.dir {
        Some(dir) => Some(logging::init_file(dir, &config.logging.level)?),
        None => {
            logging::init_cli(&config.logging.level);
            None
        }
    };

    match cli.command {
        Command::Chart(birth) => {
            apply_birth_overrides(&mut config, &birth);
            handle_chart(&config, &birth)
        }
        Command::Prompt(subject) => {
            apply_birth_overrides(&mut config, &subject.birth);
            handle_prompt(&config, &subject)
        }
        Command::Paint {
            subject,
            out,
            data_uri,
        } => {
            apply_birth_overrides(&mut config, &subject.birth);
            handle_paint(&config, &subject, out, data_uri).await
        }
    }
}

fn apply_birth_overrides(config: &mut Config, birth: &BirthArgs) {
    if let Some(boundary) = birth.hour_boundary {
        config.calendar.hour_boundary = boundary;
    }
    if let Some(offset) = birth.utc_offset_minutes {
        config.calendar.utc_offset_minutes = offset;
    }
}

/// Print the chart as JSON.
fn handle_chart(config: &Config, birth: &BirthArgs) -> anyhow::Result<()> {
    let calendar = config.calendar.calendar();
    let (chart, counts) = compute_chart(&calendar, &birth.birth)
        .with_context(|| format!("failed to compute chart for {:?}", birth.birth))?;

    let output = json!({
        "hourBoundary": config.calendar.hour_boundary,
        "utcOffsetMinutes": config.calendar.utc_offset_minutes,
        "chart": chart,
        "elementCounts": counts,
        "dayMaster": chart.day_master_image(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Print the text prompt and image brief.
fn handle_prompt(config: &Config, subject: &SubjectArgs) -> anyhow::Result<()> {
    let calendar = config.calendar.calendar();
    let prepared = prepare(&calendar, &subject.user_input())
        .with_context(|| format!("failed to compute chart for {:?}", subject.birth.birth))?;
    let brief = ImageBrief::from_chart(&prepared.chart, &prepared.counts);

    println!("{}", prepared.request.prompt);
    println!();
    println!("--- image brief ---");
    println!("{}", brief.render());
    Ok(())
}

/// Run both stages and write the portrait.
async fn handle_paint(
    config: &Config,
    subject: &SubjectArgs,
    out: PathBuf,
    data_uri: bool,
) -> anyhow::Result<()> {
    let credentials = load_default_credentials().context("failed to load credentials")?;
    let api_key = resolve_api_key(&config.gemini.api_key_env, &credentials, |key| {
        std::env::var(key).ok()
    })
    .ok_or_else(|| {
        anyhow::anyhow!(
            "no API key found; set {} (or API_KEY)",
            config.gemini.api_key_env
        )
    })?;

    let client = Arc::new(GeminiClient::from_config(&config.gemini, api_key));
    info!(?client, "remote client ready");
    let text: Arc<dyn TextGenerator> = client.clone();
    let image: Arc<dyn ImageGenerator> = client;

    let pipeline = Pipeline::new(
        Arc::new(config.calendar.calendar()),
        text,
        image,
        PipelineOptions {
            append_constraints: config.image.append_constraints,
        },
    );

    // Presentation: narrate loading-state transitions.
    let mut states = pipeline.subscribe();
    let narrator = tokio::spawn(async move {
        while states.changed().await.is_ok() {
            let state = *states.borrow_and_update();
            info!(?state, "{}", state.headline());
        }
    });

    let input = subject.user_input();
    let result = tokio::select! {
        result = pipeline.run(&input) => result,
        _ = tokio::signal::ctrl_c() => {
            pipeline.reset();
            anyhow::bail!("reading interrupted");
        }
    };
    drop(pipeline);
    narrator.abort();

    let reading = match result {
        Ok(reading) => reading,
        Err(e) => {
            error!(error = %e, "reading failed");
            anyhow::bail!("{}", e.user_message());
        }
    };

    std::fs::write(&out, &reading.image.bytes)
        .with_context(|| format!("failed to write image to {}", out.display()))?;
    info!(path = %out.display(), bytes = reading.image.bytes.len(), "portrait written");

    let mut output = serde_json::to_value(&reading.analysis)?;
    output["imageFile"] = json!(out.display().to_string());
    if data_uri {
        output["imageDataUri"] = json!(reading.image.data_uri());
    }
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
