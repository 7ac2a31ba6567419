//! Request-level types shared by the pipeline and the CLI.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Gender of the subject. Only frames the narrative; never affects the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Male.
    Male,
    /// Female.
    Female,
}

impl Gender {
    /// Lowercase spelling used in prompts.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Self::Male),
            "female" | "f" => Ok(Self::Female),
            other => Err(format!("unknown gender {other:?}, expected 'male' or 'female'")),
        }
    }
}

/// What the user submits for a reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    /// Local birth date-time, `YYYY-MM-DDTHH:mm`.
    pub birth_date: String,
    /// Free-text birth place.
    pub location: String,
    /// Subject gender.
    pub gender: Gender,
}

/// Progress of a reading, as seen by the presentation layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadingState {
    /// Waiting for input.
    #[default]
    Idle,
    /// Stage 1: chart and text interpretation.
    Analyzing,
    /// Stage 2: image generation.
    Painting,
    /// Both stages succeeded.
    Complete,
    /// The run failed; no partial result is shown.
    Error,
}

impl LoadingState {
    /// Status line shown while the state is active.
    pub fn headline(self) -> &'static str {
        match self {
            Self::Idle => "Awaiting the birth moment",
            Self::Analyzing => "Reading the Roots...",
            Self::Painting => "Manifesting Vision...",
            Self::Complete => "The landscape is revealed",
            Self::Error => "Flow Interrupted",
        }
    }
}
