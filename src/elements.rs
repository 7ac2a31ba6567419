//! Five-element tally over the eight symbol slots of a chart.

use serde::Serialize;

use crate::pillar::BaZiChart;
use crate::symbols::Element;

/// Per-element occurrence counts.
///
/// Every element is always present; zero is a meaningful value. Serializes in
/// the fixed order Wood, Fire, Earth, Metal, Water.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ElementCounts {
    /// Wood occurrences.
    pub wood: u8,
    /// Fire occurrences.
    pub fire: u8,
    /// Earth occurrences.
    pub earth: u8,
    /// Metal occurrences.
    pub metal: u8,
    /// Water occurrences.
    pub water: u8,
}

impl ElementCounts {
    /// Tally the stem and branch elements of all four pillars.
    ///
    /// Unknown slots are skipped, so the total is 8 only when every glyph
    /// resolved.
    pub fn from_chart(chart: &BaZiChart) -> Self {
        let mut counts = Self::default();
        for (_, pillar) in chart.pillars() {
            for element in [pillar.stem_element, pillar.branch_element]
                .into_iter()
                .flatten()
            {
                counts.increment(element);
            }
        }
        counts
    }

    /// Count for a single element.
    pub fn get(&self, element: Element) -> u8 {
        match element {
            Element::Wood => self.wood,
            Element::Fire => self.fire,
            Element::Earth => self.earth,
            Element::Metal => self.metal,
            Element::Water => self.water,
        }
    }

    /// Sum over the five named buckets.
    pub fn total(&self) -> u8 {
        Element::ALL
            .iter()
            .fold(0_u8, |acc, e| acc.saturating_add(self.get(*e)))
    }

    /// Elements with a zero count, in tally order.
    pub fn missing(&self) -> Vec<Element> {
        Element::ALL
            .into_iter()
            .filter(|e| self.get(*e) == 0)
            .collect()
    }

    /// Elements with the highest count (ties included), in tally order.
    pub fn dominant(&self) -> Vec<Element> {
        let max = Element::ALL
            .iter()
            .map(|e| self.get(*e))
            .max()
            .unwrap_or(0);
        if max == 0 {
            return Vec::new();
        }
        Element::ALL
            .into_iter()
            .filter(|e| self.get(*e) == max)
            .collect()
    }

    fn increment(&mut self, element: Element) {
        let slot = match element {
            Element::Wood => &mut self.wood,
            Element::Fire => &mut self.fire,
            Element::Earth => &mut self.earth,
            Element::Metal => &mut self.metal,
            Element::Water => &mut self.water,
        };
        *slot = slot.saturating_add(1);
    }
}
