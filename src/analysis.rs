//! Validation of the remote text payload and merge with the local chart.
//!
//! The remote service echoes pillar data back, but calendrical results are
//! never taken from it: [`merge`] keeps only the narrative fields and attaches
//! the locally computed [`BaZiChart`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::elements::ElementCounts;
use crate::pillar::{BaZiChart, Pillar};

/// Errors raised when the remote payload does not match the schema.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// Body is not valid JSON or lacks a required narrative field.
    #[error("response does not match the analysis schema: {0}")]
    Schema(String),
    /// A required field is present but blank.
    #[error("response field '{0}' is empty")]
    EmptyField(&'static str),
}

/// The structured payload returned by the text-generation call.
///
/// Echoed pillars are kept as raw JSON: whatever shape they have, they are
/// dropped by [`merge`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteAnalysis {
    /// Echoed year pillar.
    #[serde(default)]
    pub year: Option<Value>,
    /// Echoed month pillar.
    #[serde(default)]
    pub month: Option<Value>,
    /// Echoed day pillar.
    #[serde(default)]
    pub day: Option<Value>,
    /// Echoed hour pillar.
    #[serde(default)]
    pub hour: Option<Value>,
    /// Image-generation prompt authored by the model.
    pub image_prompt: String,
    /// Poetic interpretation.
    pub interpretation: String,
    /// Summary of the elemental balance.
    pub elemental_analysis: String,
}

impl RemoteAnalysis {
    /// Parse and validate a response body.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::Schema`] when the body is not JSON or a narrative
    /// field is missing, and [`MergeError::EmptyField`] when the image prompt
    /// is blank.
    pub fn parse(body: &str) -> Result<Self, MergeError> {
        let parsed: Self =
            serde_json::from_str(body.trim()).map_err(|e| MergeError::Schema(e.to_string()))?;
        if parsed.image_prompt.trim().is_empty() {
            return Err(MergeError::EmptyField("imagePrompt"));
        }
        Ok(parsed)
    }
}

/// Locally authoritative chart plus the remote narrative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Year pillar.
    pub year: Pillar,
    /// Month pillar.
    pub month: Pillar,
    /// Day pillar.
    pub day: Pillar,
    /// Hour pillar.
    pub hour: Pillar,
    /// Local element tally.
    pub element_counts: ElementCounts,
    /// Image prompt authored by the model.
    pub image_prompt: String,
    /// Poetic interpretation.
    pub interpretation: String,
    /// Summary of the elemental balance.
    pub elemental_analysis: String,
}

impl AnalysisResult {
    /// The chart part of the result.
    pub fn chart(&self) -> BaZiChart {
        BaZiChart {
            year: self.year.clone(),
            month: self.month.clone(),
            day: self.day.clone(),
            hour: self.hour.clone(),
        }
    }
}

/// Combine the remote narrative with the local chart, discarding echoed pillars.
pub fn merge(remote: RemoteAnalysis, chart: BaZiChart, counts: ElementCounts) -> AnalysisResult {
    let RemoteAnalysis {
        image_prompt,
        interpretation,
        elemental_analysis,
        ..
    } = remote;
    let BaZiChart {
        year,
        month,
        day,
        hour,
    } = chart;
    AnalysisResult {
        year,
        month,
        day,
        hour,
        element_counts: counts,
        image_prompt,
        interpretation,
        elemental_analysis,
    }
}
