//! Pillar construction and the four-pillar chart.
//!
//! A [`Pillar`] is derived entirely from its two-character stem-branch code.
//! Slots whose glyph is not in the symbol tables hold `None` and serialize as
//! `"Unknown"`.

use serde::{Deserialize, Serialize, Serializer};

use crate::symbols::{branch_info, stem_info, BranchInfo, Element, StemInfo, ZodiacAnimal};

/// Label used for unresolved element/animal slots.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// One of the four chart positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PillarRole {
    /// Year pillar (ancestry).
    Year,
    /// Month pillar (environment).
    Month,
    /// Day pillar; its stem is the Day Master.
    Day,
    /// Hour pillar.
    Hour,
}

impl PillarRole {
    /// Roles in chart order.
    pub const ALL: [PillarRole; 4] = [
        PillarRole::Year,
        PillarRole::Month,
        PillarRole::Day,
        PillarRole::Hour,
    ];

    /// Capitalized label used in prompts.
    pub fn label(self) -> &'static str {
        match self {
            Self::Year => "Year",
            Self::Month => "Month",
            Self::Day => "Day",
            Self::Hour => "Hour",
        }
    }
}

/// A stem-branch pair annotated with its symbol-table classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pillar {
    /// Raw stem glyph as produced by the calendar.
    pub stem: String,
    /// Raw branch glyph as produced by the calendar.
    pub branch: String,
    /// Element of the stem.
    #[serde(serialize_with = "serialize_element")]
    pub stem_element: Option<Element>,
    /// Element of the branch.
    #[serde(serialize_with = "serialize_element")]
    pub branch_element: Option<Element>,
    /// Zodiac animal of the branch.
    #[serde(serialize_with = "serialize_animal")]
    pub animal: Option<ZodiacAnimal>,
}

impl Pillar {
    /// Build a pillar from a stem-branch code such as `"甲子"`.
    ///
    /// The first character is read as the stem and the second as the branch.
    /// Missing or unrecognized glyphs resolve to the Unknown sentinel; this
    /// never fails.
    pub fn from_code(code: &str) -> Self {
        let mut chars = code.chars();
        let stem = chars.next();
        let branch = chars.next();

        let stem_info = stem.map(stem_info).unwrap_or(StemInfo::UNKNOWN);
        let branch_info = branch.map(branch_info).unwrap_or(BranchInfo::UNKNOWN);

        Self {
            stem: stem.map(String::from).unwrap_or_default(),
            branch: branch.map(String::from).unwrap_or_default(),
            stem_element: stem_info.element,
            branch_element: branch_info.element,
            animal: branch_info.animal,
        }
    }

    /// The two-character code this pillar was built from.
    pub fn code(&self) -> String {
        format!("{}{}", self.stem, self.branch)
    }

    /// Stem element name, or `"Unknown"`.
    pub fn stem_element_name(&self) -> &'static str {
        self.stem_element.map(Element::name).unwrap_or(UNKNOWN_LABEL)
    }

    /// Branch element name, or `"Unknown"`.
    pub fn branch_element_name(&self) -> &'static str {
        self.branch_element
            .map(Element::name)
            .unwrap_or(UNKNOWN_LABEL)
    }

    /// Zodiac animal name, or `"Unknown"`.
    pub fn animal_name(&self) -> &'static str {
        self.animal.map(ZodiacAnimal::name).unwrap_or(UNKNOWN_LABEL)
    }

    /// Stem-table nature image for this pillar's stem (empty when unknown).
    pub fn nature_image(&self) -> &'static str {
        self.stem
            .chars()
            .next()
            .map(|g| stem_info(g).nature_image)
            .unwrap_or("")
    }

    /// Branch-table description for this pillar's branch (empty when unknown).
    pub fn branch_description(&self) -> &'static str {
        self.branch
            .chars()
            .next()
            .map(|g| branch_info(g).description)
            .unwrap_or("")
    }
}

fn serialize_element<S: Serializer>(value: &Option<Element>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(value.map(Element::name).unwrap_or(UNKNOWN_LABEL))
}

fn serialize_animal<S: Serializer>(value: &Option<ZodiacAnimal>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(value.map(ZodiacAnimal::name).unwrap_or(UNKNOWN_LABEL))
}

/// The four pillars of a birth moment, addressed by role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BaZiChart {
    /// Year pillar.
    pub year: Pillar,
    /// Month pillar.
    pub month: Pillar,
    /// Day pillar.
    pub day: Pillar,
    /// Hour pillar.
    pub hour: Pillar,
}

impl BaZiChart {
    /// Build a chart from four raw codes in year, month, day, hour order.
    pub fn from_codes(year: &str, month: &str, day: &str, hour: &str) -> Self {
        Self {
            year: Pillar::from_code(year),
            month: Pillar::from_code(month),
            day: Pillar::from_code(day),
            hour: Pillar::from_code(hour),
        }
    }

    /// Pillar for a role.
    pub fn pillar(&self, role: PillarRole) -> &Pillar {
        match role {
            PillarRole::Year => &self.year,
            PillarRole::Month => &self.month,
            PillarRole::Day => &self.day,
            PillarRole::Hour => &self.hour,
        }
    }

    /// Pillars paired with their roles, in chart order.
    pub fn pillars(&self) -> [(PillarRole, &Pillar); 4] {
        PillarRole::ALL.map(|role| (role, self.pillar(role)))
    }

    /// The Day Master's archetypal nature image.
    pub fn day_master_image(&self) -> &'static str {
        self.day.nature_image()
    }
}
