//! Static symbol tables for the ten Heavenly Stems and twelve Earthly Branches.
//!
//! Lookups are total: an unrecognized glyph never fails, it resolves to the
//! Unknown sentinel ([`StemInfo::UNKNOWN`] / [`BranchInfo::UNKNOWN`]) so that a
//! malformed calendar code only reduces narrative fidelity.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Classification enums
// ---------------------------------------------------------------------------

/// One of the five elements (Wu Xing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    /// Wood.
    Wood,
    /// Fire.
    Fire,
    /// Earth.
    Earth,
    /// Metal.
    Metal,
    /// Water.
    Water,
}

impl Element {
    /// All five elements in tally order.
    pub const ALL: [Element; 5] = [
        Element::Wood,
        Element::Fire,
        Element::Earth,
        Element::Metal,
        Element::Water,
    ];

    /// English name, as used in prompts and JSON output.
    pub fn name(self) -> &'static str {
        match self {
            Self::Wood => "Wood",
            Self::Fire => "Fire",
            Self::Earth => "Earth",
            Self::Metal => "Metal",
            Self::Water => "Water",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Yin or Yang polarity of a stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    /// Receptive.
    Yin,
    /// Active.
    Yang,
}

impl Polarity {
    /// English name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Yin => "Yin",
            Self::Yang => "Yang",
        }
    }
}

/// Zodiac animal carried by an Earthly Branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum ZodiacAnimal {
    Rat,
    Ox,
    Tiger,
    Rabbit,
    Dragon,
    Snake,
    Horse,
    Goat,
    Monkey,
    Rooster,
    Dog,
    Pig,
}

impl ZodiacAnimal {
    /// English name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Rat => "Rat",
            Self::Ox => "Ox",
            Self::Tiger => "Tiger",
            Self::Rabbit => "Rabbit",
            Self::Dragon => "Dragon",
            Self::Snake => "Snake",
            Self::Horse => "Horse",
            Self::Goat => "Goat",
            Self::Monkey => "Monkey",
            Self::Rooster => "Rooster",
            Self::Dog => "Dog",
            Self::Pig => "Pig",
        }
    }
}

// ---------------------------------------------------------------------------
// Stems
// ---------------------------------------------------------------------------

/// The ten Heavenly Stems, in cycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Stem {
    Jia,
    Yi,
    Bing,
    Ding,
    Wu,
    Ji,
    Geng,
    Xin,
    Ren,
    Gui,
}

impl Stem {
    /// All stems in cycle order (index 0 = 甲).
    pub const ALL: [Stem; 10] = [
        Stem::Jia,
        Stem::Yi,
        Stem::Bing,
        Stem::Ding,
        Stem::Wu,
        Stem::Ji,
        Stem::Geng,
        Stem::Xin,
        Stem::Ren,
        Stem::Gui,
    ];

    /// The Chinese glyph for this stem.
    pub fn glyph(self) -> char {
        STEM_GLYPHS[self.index()]
    }

    /// Position in the ten-stem cycle.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Stem at a cycle position; wraps modulo 10.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 10]
    }

    /// Parse a stem glyph.
    pub fn from_glyph(glyph: char) -> Option<Self> {
        STEM_GLYPHS
            .iter()
            .position(|g| *g == glyph)
            .map(Self::from_index)
    }

    /// Symbol-table entry for this stem.
    pub fn info(self) -> StemInfo {
        STEMS[self.index()]
    }
}

const STEM_GLYPHS: [char; 10] = ['甲', '乙', '丙', '丁', '戊', '己', '庚', '辛', '壬', '癸'];

/// Symbol-table entry for a stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StemInfo {
    /// Element, or `None` for the Unknown sentinel.
    pub element: Option<Element>,
    /// Polarity, or `None` for the Unknown sentinel.
    pub polarity: Option<Polarity>,
    /// Archetypal nature image used as the portrait subject.
    pub nature_image: &'static str,
}

impl StemInfo {
    /// Sentinel for glyphs outside the table.
    pub const UNKNOWN: StemInfo = StemInfo {
        element: None,
        polarity: None,
        nature_image: "",
    };

    /// Polarity name, empty for the sentinel.
    pub fn polarity_name(&self) -> &'static str {
        self.polarity.map(Polarity::name).unwrap_or("")
    }
}

const fn stem(element: Element, polarity: Polarity, nature_image: &'static str) -> StemInfo {
    StemInfo {
        element: Some(element),
        polarity: Some(polarity),
        nature_image,
    }
}

static STEMS: [StemInfo; 10] = [
    stem(
        Element::Wood,
        Polarity::Yang,
        "a single, massive Ancient Tree towering into the clouds, representing strength and growth",
    ),
    stem(
        Element::Wood,
        Polarity::Yin,
        "a lush garden of winding vines, flowers, and soft grass, representing flexibility and grace",
    ),
    stem(
        Element::Fire,
        Polarity::Yang,
        "the brilliant Sun shining high in the sky, illuminating a vast landscape",
    ),
    stem(
        Element::Fire,
        Polarity::Yin,
        "a mystical starlight night or a warm lantern glow in the darkness",
    ),
    stem(
        Element::Earth,
        Polarity::Yang,
        "a majestic, immovable Mountain peak touching the sky",
    ),
    stem(
        Element::Earth,
        Polarity::Yin,
        "fertile soil, a flat plain or a nurtured garden bed",
    ),
    stem(
        Element::Metal,
        Polarity::Yang,
        "massive raw iron rocks, sharp cliffs, or a metallic weapon forged by nature",
    ),
    stem(
        Element::Metal,
        Polarity::Yin,
        "glittering gemstones embedded in rock, frost on leaves, or fine precious metal",
    ),
    stem(
        Element::Water,
        Polarity::Yang,
        "a wide, powerful rushing river or the deep ocean",
    ),
    stem(
        Element::Water,
        Polarity::Yin,
        "morning mist, dew drops on leaves, or a gentle rain shower",
    ),
];

/// Look up a stem glyph, degrading to [`StemInfo::UNKNOWN`] on a miss.
pub fn stem_info(glyph: char) -> StemInfo {
    Stem::from_glyph(glyph)
        .map(Stem::info)
        .unwrap_or(StemInfo::UNKNOWN)
}

// ---------------------------------------------------------------------------
// Branches
// ---------------------------------------------------------------------------

/// The twelve Earthly Branches, in cycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Branch {
    Zi,
    Chou,
    Yin,
    Mao,
    Chen,
    Si,
    Wu,
    Wei,
    Shen,
    You,
    Xu,
    Hai,
}

impl Branch {
    /// All branches in cycle order (index 0 = 子).
    pub const ALL: [Branch; 12] = [
        Branch::Zi,
        Branch::Chou,
        Branch::Yin,
        Branch::Mao,
        Branch::Chen,
        Branch::Si,
        Branch::Wu,
        Branch::Wei,
        Branch::Shen,
        Branch::You,
        Branch::Xu,
        Branch::Hai,
    ];

    /// The Chinese glyph for this branch.
    pub fn glyph(self) -> char {
        BRANCH_GLYPHS[self.index()]
    }

    /// Position in the twelve-branch cycle.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Branch at a cycle position; wraps modulo 12.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 12]
    }

    /// Parse a branch glyph.
    pub fn from_glyph(glyph: char) -> Option<Self> {
        BRANCH_GLYPHS
            .iter()
            .position(|g| *g == glyph)
            .map(Self::from_index)
    }

    /// Symbol-table entry for this branch.
    pub fn info(self) -> BranchInfo {
        BRANCHES[self.index()]
    }
}

const BRANCH_GLYPHS: [char; 12] = [
    '子', '丑', '寅', '卯', '辰', '巳', '午', '未', '申', '酉', '戌', '亥',
];

/// Symbol-table entry for a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BranchInfo {
    /// Element, or `None` for the Unknown sentinel.
    pub element: Option<Element>,
    /// Zodiac animal, or `None` for the Unknown sentinel.
    pub animal: Option<ZodiacAnimal>,
    /// Seasonal/terrain phrase used as environmental context.
    pub description: &'static str,
}

impl BranchInfo {
    /// Sentinel for glyphs outside the table.
    pub const UNKNOWN: BranchInfo = BranchInfo {
        element: None,
        animal: None,
        description: "",
    };
}

const fn branch(element: Element, animal: ZodiacAnimal, description: &'static str) -> BranchInfo {
    BranchInfo {
        element: Some(element),
        animal: Some(animal),
        description,
    }
}

static BRANCHES: [BranchInfo; 12] = [
    branch(Element::Water, ZodiacAnimal::Rat, "Midnight, cold water"),
    branch(Element::Earth, ZodiacAnimal::Ox, "Frozen earth, icy tundra"),
    branch(Element::Wood, ZodiacAnimal::Tiger, "Early spring forest"),
    branch(Element::Wood, ZodiacAnimal::Rabbit, "Lush flowering grass"),
    branch(Element::Earth, ZodiacAnimal::Dragon, "Wet swampy earth, reservoir"),
    branch(Element::Fire, ZodiacAnimal::Snake, "Early summer heat"),
    branch(Element::Fire, ZodiacAnimal::Horse, "Peak noon fire"),
    branch(Element::Earth, ZodiacAnimal::Goat, "Hot dry earth, desert"),
    branch(Element::Metal, ZodiacAnimal::Monkey, "Hard metal ore"),
    branch(Element::Metal, ZodiacAnimal::Rooster, "Refined jewelry metal"),
    branch(Element::Earth, ZodiacAnimal::Dog, "Dry volcanic earth, sunset"),
    branch(Element::Water, ZodiacAnimal::Pig, "Deep lake water"),
];

/// Look up a branch glyph, degrading to [`BranchInfo::UNKNOWN`] on a miss.
pub fn branch_info(glyph: char) -> BranchInfo {
    Branch::from_glyph(glyph)
        .map(Branch::info)
        .unwrap_or(BranchInfo::UNKNOWN)
}
