//! Risk, market-timing and competitive-landscape indicators.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::text::{compile_keywords, KeywordPattern};
use super::vocabulary::{COMPETITIVE_LANDSCAPE, MARKET_TIMING, RISK_PHRASES};

const RISK_STEP: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score > 0.7 {
            RiskLevel::High
        } else if score > 0.3 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RiskAssessment {
    pub score: f64,
    pub level: RiskLevel,
    pub factors: Vec<String>,
}

/// One indicator group, e.g. `growth_phase`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Indicator {
    pub name: String,
    pub indicated: bool,
    pub confidence: f64,
    pub keywords_found: Vec<String>,
}

static RISK_PATTERNS: Lazy<Vec<KeywordPattern>> = Lazy::new(|| compile_keywords(RISK_PHRASES));

static MARKET_TIMING_PATTERNS: Lazy<Vec<(&'static str, Vec<KeywordPattern>)>> =
    Lazy::new(|| compile_groups(MARKET_TIMING));

static COMPETITIVE_PATTERNS: Lazy<Vec<(&'static str, Vec<KeywordPattern>)>> =
    Lazy::new(|| compile_groups(COMPETITIVE_LANDSCAPE));

fn compile_groups(
    groups: &'static [(&'static str, &'static [&'static str])],
) -> Vec<(&'static str, Vec<KeywordPattern>)> {
    groups
        .iter()
        .map(|(name, keywords)| (*name, compile_keywords(keywords)))
        .collect()
}

pub fn assess_risk(text: &str) -> RiskAssessment {
    let factors: Vec<String> = RISK_PATTERNS
        .iter()
        .filter(|p| p.is_match(text))
        .map(|p| p.keyword.to_string())
        .collect();
    let score = (factors.len() as f64 * RISK_STEP).min(1.0);

    RiskAssessment {
        score,
        level: RiskLevel::from_score(score),
        factors,
    }
}

pub fn market_timing(text: &str) -> Vec<Indicator> {
    indicators(&MARKET_TIMING_PATTERNS, text)
}

pub fn competitive_landscape(text: &str) -> Vec<Indicator> {
    indicators(&COMPETITIVE_PATTERNS, text)
}

fn indicators(groups: &[(&'static str, Vec<KeywordPattern>)], text: &str) -> Vec<Indicator> {
    groups
        .iter()
        .map(|(name, patterns)| {
            let keywords_found: Vec<String> = patterns
                .iter()
                .filter(|p| p.is_match(text))
                .map(|p| p.keyword.to_string())
                .collect();
            Indicator {
                name: name.to_string(),
                indicated: !keywords_found.is_empty(),
                confidence: (keywords_found.len() as f64 / patterns.len() as f64).min(1.0),
                keywords_found,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_accumulates_per_phrase() {
        let risk = assess_risk("An unproven, experimental and volatile early-stage bet.");
        assert_eq!(risk.factors.len(), 4);
        assert!((risk.score - 0.4).abs() < 1e-9);
        assert_eq!(risk.level, RiskLevel::Medium);
    }

    #[test]
    fn no_risk_phrases_is_low() {
        let risk = assess_risk("Profitable logistics businesses.");
        assert_eq!(risk.score, 0.0);
        assert_eq!(risk.level, RiskLevel::Low);
    }

    #[test]
    fn indicators_report_every_group() {
        let timing = market_timing("Scaling companies with growth momentum.");
        assert_eq!(timing.len(), 4);
        let growth = timing.iter().find(|i| i.name == "growth_phase").unwrap();
        assert!(growth.indicated);
        assert!((growth.confidence - 0.75).abs() < 1e-9);
        assert!(!timing.iter().find(|i| i.name == "mature_market").unwrap().indicated);
    }
}
