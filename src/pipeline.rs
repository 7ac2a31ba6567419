//! Two-stage reading pipeline.
//!
//! Stage 1 converts the birth moment, builds the chart, tallies elements,
//! synthesizes the prompt and awaits the structured text call. Stage 2 runs
//! only on stage 1's success and awaits the image call. Either both stages
//! succeed and a complete [`Reading`] is returned, or nothing is.
//!
//! Every run claims a new session generation. [`Pipeline::reset`] (or a newer
//! run) invalidates older generations; a run that finds itself stale after a
//! remote call discards the response and returns [`PipelineError::Abandoned`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::analysis::{merge, AnalysisResult, MergeError, RemoteAnalysis};
use crate::calendar::{parse_birth_date, CalendarAdapter, CalendarError};
use crate::elements::ElementCounts;
use crate::pillar::BaZiChart;
use crate::prompt::{build_text_request, negative_constraints, reinforce_image_prompt, TextRequest};
use crate::providers::{GeneratedImage, ImageGenerator, ImageRequest, ProviderError, TextGenerator};
use crate::types::{LoadingState, UserInput};

/// The single message shown to the user for any failure.
pub const TURBULENCE_MESSAGE: &str = "The cosmic energies are turbulent. Please try again later.";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Reasons a reading did not complete.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The birth date-time could not be converted.
    #[error("invalid birth input: {0}")]
    InvalidInput(#[from] CalendarError),
    /// A remote call failed.
    #[error("remote call failed: {0}")]
    Remote(#[from] ProviderError),
    /// The text response did not match the analysis schema.
    #[error("schema violation: {0}")]
    SchemaViolation(#[from] MergeError),
    /// The session was reset or superseded while a call was in flight.
    #[error("reading was abandoned")]
    Abandoned,
}

impl PipelineError {
    /// User-facing message; every failure collapses to the same text.
    pub fn user_message(&self) -> &'static str {
        TURBULENCE_MESSAGE
    }
}

// ---------------------------------------------------------------------------
// Local derivation
// ---------------------------------------------------------------------------

/// Everything stage 1 derives locally before the text call.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedReading {
    /// Authoritative chart.
    pub chart: BaZiChart,
    /// Element tally of the chart.
    pub counts: ElementCounts,
    /// Negative-constraint string for the image.
    pub constraints: String,
    /// Text-generation request.
    pub request: TextRequest,
}

/// Convert a birth date-time string and build the chart and its tally.
///
/// # Errors
///
/// Returns [`CalendarError`] when the input cannot be parsed or converted.
pub fn compute_chart(
    calendar: &dyn CalendarAdapter,
    birth_date: &str,
) -> Result<(BaZiChart, ElementCounts), CalendarError> {
    let moment = parse_birth_date(birth_date)?;
    let codes = calendar.convert(moment)?;
    let chart = BaZiChart::from_codes(&codes.year, &codes.month, &codes.day, &codes.hour);
    let counts = ElementCounts::from_chart(&chart);
    Ok((chart, counts))
}

/// Run the synchronous part of stage 1.
///
/// # Errors
///
/// Returns [`CalendarError`] when the birth date-time is invalid.
pub fn prepare(
    calendar: &dyn CalendarAdapter,
    input: &UserInput,
) -> Result<PreparedReading, CalendarError> {
    let (chart, counts) = compute_chart(calendar, &input.birth_date)?;
    let request = build_text_request(input, &chart, &counts);
    Ok(PreparedReading {
        constraints: negative_constraints(&counts),
        chart,
        counts,
        request,
    })
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Pipeline behaviour switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Append the local negative constraints to the model-authored image prompt.
    pub append_constraints: bool,
}

/// A completed reading: merged analysis plus the generated portrait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reading {
    /// Chart and narrative.
    pub analysis: AnalysisResult,
    /// Portrait.
    pub image: GeneratedImage,
    /// Prompt actually sent to the image generator.
    pub image_prompt_sent: String,
}

/// Orchestrates the two stages against injected collaborators.
pub struct Pipeline {
    calendar: Arc<dyn CalendarAdapter>,
    text: Arc<dyn TextGenerator>,
    image: Arc<dyn ImageGenerator>,
    options: PipelineOptions,
    generation: AtomicU64,
    state: watch::Sender<LoadingState>,
}

impl Pipeline {
    /// Create a pipeline in the `idle` state.
    pub fn new(
        calendar: Arc<dyn CalendarAdapter>,
        text: Arc<dyn TextGenerator>,
        image: Arc<dyn ImageGenerator>,
        options: PipelineOptions,
    ) -> Self {
        let (state, _) = watch::channel(LoadingState::Idle);
        Self {
            calendar,
            text,
            image,
            options,
            generation: AtomicU64::new(0),
            state,
        }
    }

    /// Subscribe to loading-state changes.
    pub fn subscribe(&self) -> watch::Receiver<LoadingState> {
        self.state.subscribe()
    }

    /// Current loading state.
    pub fn state(&self) -> LoadingState {
        *self.state.borrow()
    }

    /// Abandon any outstanding run and return to `idle`.
    ///
    /// In-flight HTTP calls are left to finish; their results are discarded.
    pub fn reset(&self) {
        let previous = self.generation.fetch_add(1, Ordering::SeqCst);
        debug!(abandoned_generation = previous, "pipeline reset");
        self.state.send_replace(LoadingState::Idle);
    }

    /// Run both stages for one input.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] when any step fails or the run is abandoned.
    pub async fn run(&self, input: &UserInput) -> Result<Reading, PipelineError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst).wrapping_add(1);
        let session_id = Uuid::new_v4();
        let span = info_span!("reading", %session_id, generation);

        let result = self.run_stages(generation, input).instrument(span.clone()).await;

        span.in_scope(|| match &result {
            Ok(_) => info!("reading complete"),
            Err(PipelineError::Abandoned) => info!("stale reading discarded"),
            Err(e) => {
                warn!(error = %e, "reading failed");
                self.publish(generation, LoadingState::Error);
            }
        });
        result
    }

    async fn run_stages(&self, generation: u64, input: &UserInput) -> Result<Reading, PipelineError> {
        self.publish(generation, LoadingState::Analyzing);
        let analysis = self.analyze(generation, input).await?;

        self.publish(generation, LoadingState::Painting);
        let (image, image_prompt_sent) = self.paint(generation, &analysis).await?;

        self.publish(generation, LoadingState::Complete);
        Ok(Reading {
            analysis: analysis.result,
            image,
            image_prompt_sent,
        })
    }

    async fn analyze(&self, generation: u64, input: &UserInput) -> Result<Analyzed, PipelineError> {
        let prepared = prepare(self.calendar.as_ref(), input)?;
        info!(
            year = %prepared.chart.year.code(),
            month = %prepared.chart.month.code(),
            day = %prepared.chart.day.code(),
            hour = %prepared.chart.hour.code(),
            boundary = %self.calendar.hour_boundary(),
            "chart computed"
        );

        let body = self.text.generate_json(&prepared.request).await;
        self.ensure_current(generation)?;
        let body = body?;

        let remote = RemoteAnalysis::parse(&body)?;
        Ok(Analyzed {
            result: merge(remote, prepared.chart, prepared.counts),
            constraints: prepared.constraints,
        })
    }

    async fn paint(
        &self,
        generation: u64,
        analyzed: &Analyzed,
    ) -> Result<(GeneratedImage, String), PipelineError> {
        let prompt = if self.options.append_constraints {
            reinforce_image_prompt(&analyzed.result.image_prompt, &analyzed.constraints)
        } else {
            analyzed.result.image_prompt.clone()
        };

        let image = self
            .image
            .generate_image(&ImageRequest::portrait(prompt.clone()))
            .await;
        self.ensure_current(generation)?;
        let image = image?;
        debug!(bytes = image.bytes.len(), mime = %image.mime_type, "image received");
        Ok((image, prompt))
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn ensure_current(&self, generation: u64) -> Result<(), PipelineError> {
        if self.is_current(generation) {
            Ok(())
        } else {
            Err(PipelineError::Abandoned)
        }
    }

    fn publish(&self, generation: u64, state: LoadingState) {
        if self.is_current(generation) {
            self.state.send_replace(state);
        }
    }
}

struct Analyzed {
    result: AnalysisResult,
    constraints: String,
}
