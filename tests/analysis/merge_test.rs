//! Remote payload parsing and merge tests.

use serde_json::json;
use soulcanvas::analysis::{merge, MergeError, RemoteAnalysis};
use soulcanvas::elements::ElementCounts;
use soulcanvas::pillar::BaZiChart;

fn golden_chart() -> BaZiChart {
    BaZiChart::from_codes("庚午", "辛巳", "庚辰", "癸未")
}

fn parse(body: &str) -> RemoteAnalysis {
    match RemoteAnalysis::parse(body) {
        Ok(remote) => remote,
        Err(err) => panic!("body should parse: {err}"),
    }
}

#[test]
fn local_chart_wins_over_echoed_pillars() {
    let tampered = json!({"stem": "甲", "branch": "子", "stemElement": "Wood",
        "branchElement": "Water", "animal": "Rat"});
    let body = json!({
        "year": tampered, "month": tampered, "day": tampered, "hour": tampered,
        "imagePrompt": "A rocky plateau under a pale moon.",
        "interpretation": "Metal tempered by fire.",
        "elementalAnalysis": "Metal dominates; Wood is absent."
    })
    .to_string();

    let chart = golden_chart();
    let counts = ElementCounts::from_chart(&chart);
    let result = merge(parse(&body), chart.clone(), counts);

    assert_eq!(result.chart(), chart);
    assert_eq!(result.day.code(), "庚辰");
    assert_eq!(result.element_counts, counts);
    assert_eq!(result.image_prompt, "A rocky plateau under a pale moon.");
    assert_eq!(result.interpretation, "Metal tempered by fire.");
    assert_eq!(result.elemental_analysis, "Metal dominates; Wood is absent.");
}

#[test]
fn malformed_echoed_pillars_are_ignored() {
    let body = json!({
        "year": "garbage", "month": 7, "day": null, "hour": [],
        "imagePrompt": "Desert dunes.",
        "interpretation": "Dry heat.",
        "elementalAnalysis": "Fire and Earth."
    })
    .to_string();
    let result = merge(parse(&body), golden_chart(), ElementCounts::default());
    assert_eq!(result.year.code(), "庚午");
}

#[test]
fn missing_interpretation_is_a_schema_violation() {
    let body = json!({
        "imagePrompt": "Desert dunes.",
        "elementalAnalysis": "Fire and Earth."
    })
    .to_string();
    assert!(matches!(
        RemoteAnalysis::parse(&body),
        Err(MergeError::Schema(_))
    ));
}

#[test]
fn blank_image_prompt_is_rejected() {
    let body = json!({
        "imagePrompt": "   ",
        "interpretation": "x",
        "elementalAnalysis": "y"
    })
    .to_string();
    assert!(matches!(
        RemoteAnalysis::parse(&body),
        Err(MergeError::EmptyField("imagePrompt"))
    ));
}

#[test]
fn non_json_body_is_a_schema_violation() {
    assert!(matches!(
        RemoteAnalysis::parse("The stars say hello."),
        Err(MergeError::Schema(_))
    ));
}

#[test]
fn result_serializes_in_camel_case() {
    let body = json!({
        "imagePrompt": "Cliffs.",
        "interpretation": "Strong.",
        "elementalAnalysis": "Metal."
    })
    .to_string();
    let chart = golden_chart();
    let counts = ElementCounts::from_chart(&chart);
    let result = merge(parse(&body), chart, counts);
    let value = match serde_json::to_value(&result) {
        Ok(value) => value,
        Err(err) => panic!("result should serialize: {err}"),
    };
    assert_eq!(value["imagePrompt"], "Cliffs.");
    assert_eq!(value["elementalAnalysis"], "Metal.");
    assert_eq!(value["elementCounts"]["Metal"], 3);
    assert_eq!(value["hour"]["stem"], "癸");
}
