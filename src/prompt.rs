//! Deterministic prompt synthesis from a chart and its element tally.
//!
//! Two artefacts are produced:
//! - an [`ImageBrief`]: subject, surroundings and negative constraints for the
//!   landscape portrait;
//! - a [`TextRequest`]: the text-generation prompt (which embeds the brief)
//!   together with the JSON response schema.
//!
//! Everything here is a pure function of its inputs.

use serde_json::{json, Value};

use crate::elements::ElementCounts;
use crate::pillar::{BaZiChart, PillarRole};
use crate::symbols::Element;
use crate::types::UserInput;

/// Constraints present in every image prompt.
pub const BASELINE_CONSTRAINTS: &str =
    "NO HUMANS. NO CHARACTERS. NO FACES. NO FIGURES. NO ANIMALS. NO TEXT. LANDSCAPE ONLY.";

/// Fixed style directive.
pub const STYLE_DIRECTIVE: &str = "\"Mystical Oriental Landscape\" with \"Dunhuang\" color palette. \
Keywords: Mineral pigments (malachite green, cinnabar red, ochre), gold leaf details, \
atmospheric depth, ethereal, dreamlike.";

/// Fixed composition directive.
pub const COMPOSITION_DIRECTIVE: &str =
    "Panoramic view, no central character. The \"Self\" is the landscape itself.";

/// Order in which absent-element clauses are appended.
const EXCLUSION_ORDER: [Element; 5] = [
    Element::Wood,
    Element::Water,
    Element::Fire,
    Element::Metal,
    Element::Earth,
];

/// Exclusion clause for an element that does not occur in the chart.
pub fn exclusion_clause(element: Element) -> &'static str {
    match element {
        Element::Wood => {
            "NO TREES, NO PLANTS, NO FLOWERS, NO GREEN COLORS. The landscape must be barren or rocky."
        }
        Element::Water => {
            "NO OCEANS, NO LAKES, NO RIVERS, NO RAIN, NO BLUE LIQUIDS. Dry environment."
        }
        Element::Fire => "NO FIRE, NO FLAMES, NO SUN, NO RED/ORANGE GLOW. Cold lighting.",
        Element::Metal => "NO WEAPONS, NO GOLD, NO SILVER, NO METALLIC TEXTURES.",
        Element::Earth => "NO MOUNTAINS, NO ROCKS, NO GROUND. Floating or ethereal setting.",
    }
}

/// Baseline constraints followed by one clause per zero-count element.
pub fn negative_constraints(counts: &ElementCounts) -> String {
    let mut out = String::from(BASELINE_CONSTRAINTS);
    for element in EXCLUSION_ORDER {
        if counts.get(element) == 0 {
            out.push(' ');
            out.push_str(exclusion_clause(element));
        }
    }
    out
}

/// Element tally as compact JSON in Wood, Fire, Earth, Metal, Water order.
pub fn tally_json(counts: &ElementCounts) -> String {
    format!(
        r#"{{"Wood":{},"Fire":{},"Earth":{},"Metal":{},"Water":{}}}"#,
        counts.wood, counts.fire, counts.earth, counts.metal, counts.water
    )
}

// ---------------------------------------------------------------------------
// Image brief
// ---------------------------------------------------------------------------

/// Structured description of the landscape portrait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBrief {
    /// Day Master nature image.
    pub subject: String,
    /// Month branch terrain description.
    pub surroundings: String,
    /// Accumulated negative constraints.
    pub constraints: String,
}

impl ImageBrief {
    /// Build a brief from its three inputs.
    pub fn new(day_master_image: &str, month_description: &str, counts: &ElementCounts) -> Self {
        Self {
            subject: day_master_image.to_owned(),
            surroundings: month_description.to_owned(),
            constraints: negative_constraints(counts),
        }
    }

    /// Build a brief from a chart and its tally.
    pub fn from_chart(chart: &BaZiChart, counts: &ElementCounts) -> Self {
        Self::new(
            chart.day_master_image(),
            chart.month.branch_description(),
            counts,
        )
    }

    /// Standalone image-generation prompt.
    pub fn render(&self) -> String {
        format!(
            "A conceptual landscape representing {subject}. \
Style: {STYLE_DIRECTIVE} \
Surroundings: {surroundings}. \
Composition: {COMPOSITION_DIRECTIVE} \
CRITICAL CONSTRAINTS: {constraints}",
            subject = self.subject,
            surroundings = self.surroundings,
            constraints = self.constraints,
        )
    }
}

/// Append the local constraints to a remotely authored image prompt.
///
/// Returns the prompt unchanged when it already carries them verbatim.
pub fn reinforce_image_prompt(remote_prompt: &str, constraints: &str) -> String {
    if remote_prompt.contains(constraints) {
        return remote_prompt.to_owned();
    }
    format!("{} CRITICAL CONSTRAINTS: {constraints}", remote_prompt.trim_end())
}

// ---------------------------------------------------------------------------
// Text request
// ---------------------------------------------------------------------------

/// Prompt and response schema for the structured text-generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRequest {
    /// Prompt text.
    pub prompt: String,
    /// JSON schema the response must conform to.
    pub response_schema: Value,
}

/// Synthesize the text-generation request for a chart.
pub fn build_text_request(input: &UserInput, chart: &BaZiChart, counts: &ElementCounts) -> TextRequest {
    TextRequest {
        prompt: build_text_prompt(input, chart, counts),
        response_schema: response_schema(),
    }
}

/// The text-generation prompt.
pub fn build_text_prompt(input: &UserInput, chart: &BaZiChart, counts: &ElementCounts) -> String {
    let brief = ImageBrief::from_chart(chart, counts);

    let mut lines: Vec<String> = vec![
        "You are a master of Chinese Metaphysics and Art History.".to_owned(),
        String::new(),
        format!(
            "I have calculated the BaZi chart for a {} user born in {}.",
            input.gender,
            input.location.trim()
        ),
        String::new(),
        "Chart:".to_owned(),
    ];
    for (role, pillar) in chart.pillars() {
        let element = match role {
            PillarRole::Day => format!("Day Master: {}", pillar.stem_element_name()),
            _ => pillar.stem_element_name().to_owned(),
        };
        lines.push(format!("{}: {} ({element})", role.label(), pillar.code()));
    }
    lines.extend([
        String::new(),
        format!("Element Counts: {}", tally_json(counts)),
        String::new(),
        "Task 1: Imagery Description (Prompt Engineering)".to_owned(),
        "Create a prompt for an AI image generator (Imagen).".to_owned(),
        format!(
            "- **Subject**: A conceptual landscape representing the Day Master: {}.",
            brief.subject
        ),
        format!("- **Style**: {STYLE_DIRECTIVE}"),
        format!(
            "- **Surroundings**: Depict the environment terrain based on the Month Branch ({}) \
and the specific Earth branches present (Chen=Wet/Swamp, Xu=Dry/Fire, Chou=Frozen, Wei=Hot/Desert).",
            brief.surroundings
        ),
        format!("- **Composition**: {COMPOSITION_DIRECTIVE}"),
        format!("- **CRITICAL CONSTRAINTS**: {}", brief.constraints),
        String::new(),
        "Task 2: Interpretation".to_owned(),
        "Provide a poetic interpretation of this \"Soul Landscape\" and the energy it holds."
            .to_owned(),
        String::new(),
        "Task 3: Elemental Analysis".to_owned(),
        "Summarize the balance of the five elements, naming the dominant and the missing ones."
            .to_owned(),
        String::new(),
        "Return JSON.".to_owned(),
    ]);
    lines.join("\n")
}

/// Response schema for the text-generation call.
///
/// Property types use the upper-case names of the Gemini schema dialect.
pub fn response_schema() -> Value {
    let pillar = json!({
        "type": "OBJECT",
        "properties": {
            "stem": {"type": "STRING"},
            "branch": {"type": "STRING"},
            "stemElement": {"type": "STRING"},
            "branchElement": {"type": "STRING"},
            "animal": {"type": "STRING"}
        },
        "required": ["stem", "branch", "stemElement", "branchElement", "animal"]
    });
    json!({
        "type": "OBJECT",
        "properties": {
            "year": pillar,
            "month": pillar,
            "day": pillar,
            "hour": pillar,
            "imagePrompt": {"type": "STRING"},
            "interpretation": {"type": "STRING"},
            "elementalAnalysis": {"type": "STRING"}
        },
        "required": [
            "year", "month", "day", "hour",
            "imagePrompt", "interpretation", "elementalAnalysis"
        ]
    })
}
