//! Thesis text analysis: criteria, sentiment and derived signals.
//!
//! Everything in here is pure and synchronous; handlers run it on the
//! blocking pool.

pub mod criteria;
pub mod sentiment;
pub mod signals;
pub mod text;
pub mod vocabulary;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use criteria::{extract_criteria, RevenueBand, ThesisCriteria};
pub use sentiment::{analyze_sentiment, Sentiment, SentimentLabel};
pub use signals::{Indicator, RiskAssessment, RiskLevel};

use text::{split_sentences, truncate_chars};

const SUMMARY_MAX_CHARS: usize = 200;
const TITLE_MAX_CHARS: usize = 80;

/// Full analysis payload stored with a thesis and returned by analyze-thesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ThesisAnalysis {
    pub criteria: ThesisCriteria,
    pub sentiment: Sentiment,
    pub summary: String,
    pub risk: RiskAssessment,
    pub market_timing: Vec<Indicator>,
    pub competitive_landscape: Vec<Indicator>,
    pub confidence_score: f64,
    pub recommendations: Vec<String>,
}

pub fn analyze_thesis(text: &str) -> ThesisAnalysis {
    let criteria = extract_criteria(text);
    let sentiment = analyze_sentiment(text);
    let risk = signals::assess_risk(text);
    let confidence_score = confidence_score(&criteria, &sentiment);
    let recommendations = recommendations(&criteria, &risk);

    ThesisAnalysis {
        summary: summarize(text),
        market_timing: signals::market_timing(text),
        competitive_landscape: signals::competitive_landscape(text),
        criteria,
        sentiment,
        risk,
        confidence_score,
        recommendations,
    }
}

/// First and last sentence, or the truncated text when there is only one.
pub fn summarize(text: &str) -> String {
    let sentences = split_sentences(text);
    match sentences.as_slice() {
        [] => String::new(),
        [only] => truncate_chars(only, SUMMARY_MAX_CHARS),
        [first, .., last] => format!("{first}. {last}."),
    }
}

/// Mean of the per-facet confidences that apply; 0.5 when none do.
pub fn confidence_score(criteria: &ThesisCriteria, sentiment: &Sentiment) -> f64 {
    let mut facets = Vec::with_capacity(4);
    if !criteria.industries.is_empty() {
        facets.push(0.8);
    }
    if !criteria.revenue_ranges.is_empty() {
        facets.push(0.7);
    }
    if !criteria.funding_stages.is_empty() {
        facets.push(0.7);
    }
    if sentiment.confidence > 0.0 {
        facets.push(sentiment.confidence);
    }

    if facets.is_empty() {
        0.5
    } else {
        facets.iter().sum::<f64>() / facets.len() as f64
    }
}

pub fn recommendations(criteria: &ThesisCriteria, risk: &RiskAssessment) -> Vec<String> {
    let mut out = Vec::new();

    if let Some(top) = criteria
        .industries
        .iter()
        .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
    {
        out.push(format!("Focus on {} sector opportunities", top.industry.label()));
    }

    let stages: Vec<&str> = criteria.funding_stages.iter().map(|m| m.stage.label()).collect();
    if !stages.is_empty() {
        out.push(format!("Target companies at {} stage", stages.join(", ")));
    }

    let ranges: Vec<&str> = criteria.revenue_ranges.iter().map(|m| m.range.label()).collect();
    if !ranges.is_empty() {
        out.push(format!("Screen for revenue in {}", ranges.join(", ")));
    }

    match risk.level {
        RiskLevel::High => out.push("High-risk profile: run enhanced due diligence".to_string()),
        RiskLevel::Medium => out.push("Moderate risk: validate key assumptions early".to_string()),
        RiskLevel::Low => {}
    }

    if criteria.is_empty() {
        out.push("Add industry, stage or revenue details to sharpen matching".to_string());
    }

    out
}

/// Title for a thesis submitted without one.
pub fn suggest_title(text: &str, criteria: &ThesisCriteria) -> String {
    let industry = criteria
        .industries
        .iter()
        .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
        .map(|m| m.industry.label());
    let stage = criteria.funding_stages.first().map(|m| m.stage.label());

    match (industry, stage) {
        (Some(industry), Some(stage)) => format!("{industry} {stage} thesis"),
        (Some(industry), None) => format!("{industry} thesis"),
        _ => split_sentences(text)
            .first()
            .map(|s| truncate_chars(s, TITLE_MAX_CHARS))
            .unwrap_or_else(|| "Untitled thesis".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_uses_first_and_last_sentence() {
        let summary = summarize("First point. Middle point. Last point.");
        assert_eq!(summary, "First point. Last point.");
    }

    #[test]
    fn single_sentence_summary_is_truncated() {
        let long = "word ".repeat(100);
        let summary = summarize(&long);
        assert!(summary.ends_with("..."));
        assert!(summary.chars().count() <= SUMMARY_MAX_CHARS + 3);
    }

    #[test]
    fn confidence_defaults_to_half() {
        let analysis = analyze_thesis("Nothing to see");
        assert_eq!(analysis.confidence_score, 0.5);
        assert!(analysis.criteria.is_empty());
    }

    #[test]
    fn confidence_averages_facets() {
        // industry 0.8, stage 0.7, sentiment 0.1 ("strong")
        let analysis = analyze_thesis("Strong fintech companies at Series A.");
        assert!((analysis.confidence_score - (0.8 + 0.7 + 0.1) / 3.0).abs() < 1e-9);
    }

    #[test]
    fn suggested_title_prefers_criteria() {
        let criteria = extract_criteria("Healthcare seed rounds.");
        assert_eq!(suggest_title("Healthcare seed rounds.", &criteria), "Healthcare Seed thesis");
        assert_eq!(suggest_title("", &ThesisCriteria::default()), "Untitled thesis");
    }
}
