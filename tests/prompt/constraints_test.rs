//! Negative-constraint and image-brief tests.

use soulcanvas::elements::ElementCounts;
use soulcanvas::pillar::BaZiChart;
use soulcanvas::prompt::{
    exclusion_clause, negative_constraints, reinforce_image_prompt, ImageBrief,
    BASELINE_CONSTRAINTS,
};
use soulcanvas::symbols::Element;

fn golden_chart() -> BaZiChart {
    BaZiChart::from_codes("庚午", "辛巳", "庚辰", "癸未")
}

#[test]
fn golden_chart_excludes_only_wood() {
    let counts = ElementCounts::from_chart(&golden_chart());
    let constraints = negative_constraints(&counts);
    assert_eq!(
        constraints,
        format!("{BASELINE_CONSTRAINTS} {}", exclusion_clause(Element::Wood))
    );
    assert!(constraints.contains("NO TREES"));
    assert!(!constraints.contains("NO OCEANS"));
    assert!(!constraints.contains("NO FLAMES"));
    assert!(!constraints.contains("NO WEAPONS"));
    assert!(!constraints.contains("NO MOUNTAINS"));
}

#[test]
fn balanced_chart_has_baseline_only() {
    let counts = ElementCounts {
        wood: 1,
        fire: 2,
        earth: 2,
        metal: 2,
        water: 1,
    };
    assert_eq!(negative_constraints(&counts), BASELINE_CONSTRAINTS);
}

#[test]
fn clauses_follow_fixed_order() {
    let constraints = negative_constraints(&ElementCounts::default());
    let positions: Vec<usize> = [
        Element::Wood,
        Element::Water,
        Element::Fire,
        Element::Metal,
        Element::Earth,
    ]
    .into_iter()
    .map(|e| match constraints.find(exclusion_clause(e)) {
        Some(pos) => pos,
        None => panic!("{e} clause missing"),
    })
    .collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted);
    assert!(constraints.starts_with(BASELINE_CONSTRAINTS));
}

#[test]
fn every_constraint_set_forbids_figures() {
    let counts = ElementCounts {
        wood: 8,
        ..ElementCounts::default()
    };
    let constraints = negative_constraints(&counts);
    for phrase in ["NO HUMANS", "NO FACES", "NO TEXT", "LANDSCAPE ONLY"] {
        assert!(constraints.contains(phrase), "missing {phrase}");
    }
}

#[test]
fn brief_draws_from_day_master_and_month_branch() {
    let chart = golden_chart();
    let counts = ElementCounts::from_chart(&chart);
    let brief = ImageBrief::from_chart(&chart, &counts);
    assert_eq!(brief.subject, chart.day.nature_image());
    assert_eq!(brief.surroundings, chart.month.branch_description());

    let rendered = brief.render();
    assert!(rendered.contains(&brief.subject));
    assert!(rendered.contains(&brief.surroundings));
    assert!(rendered.ends_with(&brief.constraints));
}

#[test]
fn reinforcement_appends_once() {
    let constraints = "NO HUMANS. NO TREES.";
    let once = reinforce_image_prompt("Misty peaks at dawn. ", constraints);
    assert_eq!(once, "Misty peaks at dawn. CRITICAL CONSTRAINTS: NO HUMANS. NO TREES.");
    let twice = reinforce_image_prompt(&once, constraints);
    assert_eq!(once, twice);
}
