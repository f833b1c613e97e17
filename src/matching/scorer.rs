use std::collections::BTreeSet;

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::embedding::{cosine_similarity, TextEmbedder};
use crate::analysis::ThesisCriteria;
use crate::config::MAX_TOP_N;
use crate::entities::{company, FundingStage, Industry, RevenueRange};

const TEXT_WEIGHT: f64 = 0.40;
const INDUSTRY_WEIGHT: f64 = 0.30;
const STAGE_WEIGHT: f64 = 0.15;
const REVENUE_WEIGHT: f64 = 0.15;

/// Ranking knobs for one request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchOptions {
    pub top_n: usize,
    pub min_score: f64,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self { top_n: 10, min_score: 0.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Recommendation {
    #[serde(rename = "Strong Buy")]
    StrongBuy,
    Buy,
    Hold,
    Review,
    Pass,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::StrongBuy => "Strong Buy",
            Recommendation::Buy => "Buy",
            Recommendation::Hold => "Hold",
            Recommendation::Review => "Review",
            Recommendation::Pass => "Pass",
        }
    }
}

pub fn recommendation_for(score: f64) -> Recommendation {
    if score > 0.8 {
        Recommendation::StrongBuy
    } else if score > 0.6 {
        Recommendation::Buy
    } else if score > 0.4 {
        Recommendation::Hold
    } else if score > 0.2 {
        Recommendation::Review
    } else {
        Recommendation::Pass
    }
}

/// A ranked catalog entry.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CompanyMatch {
    pub company: company::Model,
    /// Bounded match score in [0, 1]
    pub score: f64,
    /// Cosine similarity between thesis and company profile, floored at 0
    pub text_similarity: f64,
    pub match_reasons: Vec<String>,
    pub recommendation: Recommendation,
    pub risk_score: f64,
}

/// Criteria flattened to sets once per request.
#[derive(Debug, Default)]
struct CriteriaSets {
    industries: BTreeSet<Industry>,
    stages: BTreeSet<FundingStage>,
    revenues: BTreeSet<RevenueRange>,
}

impl From<&ThesisCriteria> for CriteriaSets {
    fn from(criteria: &ThesisCriteria) -> Self {
        Self {
            industries: criteria.industry_set(),
            stages: criteria.stage_set(),
            revenues: criteria.revenue_set(),
        }
    }
}

/// Scores every company, drops those under `min_score`, and returns the best
/// `top_n` by score descending, ties broken by ascending company id.
pub fn rank_companies<E>(
    embedder: &E,
    thesis_text: &str,
    criteria: &ThesisCriteria,
    catalog: &[company::Model],
    options: MatchOptions,
) -> Vec<CompanyMatch>
where
    E: TextEmbedder + ?Sized,
{
    let thesis_embedding = embedder.embed(thesis_text);
    let sets = CriteriaSets::from(criteria);
    let top_n = options.top_n.clamp(1, MAX_TOP_N);

    let mut matches: Vec<CompanyMatch> = catalog
        .iter()
        .map(|company| score_with_sets(embedder, &thesis_embedding, &sets, company))
        .filter(|m| m.score >= options.min_score)
        .collect();

    matches.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.company.id.cmp(&b.company.id))
    });
    matches.truncate(top_n);
    matches
}

/// Scores a single company against a thesis.
pub fn score_company<E>(
    embedder: &E,
    thesis_text: &str,
    criteria: &ThesisCriteria,
    company: &company::Model,
) -> CompanyMatch
where
    E: TextEmbedder + ?Sized,
{
    let thesis_embedding = embedder.embed(thesis_text);
    score_with_sets(embedder, &thesis_embedding, &CriteriaSets::from(criteria), company)
}

fn score_with_sets<E>(
    embedder: &E,
    thesis_embedding: &[f32],
    sets: &CriteriaSets,
    company: &company::Model,
) -> CompanyMatch
where
    E: TextEmbedder + ?Sized,
{
    let company_embedding = company
        .embedding()
        .filter(|v| v.len() == embedder.dimension())
        .unwrap_or_else(|| embedder.embed(&company.profile_text()));
    let text_similarity = cosine_similarity(thesis_embedding, &company_embedding).max(0.0);

    let mut reasons = Vec::new();
    let industry_hit = sets.industries.contains(&company.industry);
    let stage_hit = sets.stages.contains(&company.funding_stage);
    let revenue_hit = sets.revenues.contains(&company.revenue_range);

    if industry_hit {
        reasons.push(format!("Industry match: {}", company.industry.label()));
    }
    if stage_hit {
        reasons.push(format!("Funding stage match: {}", company.funding_stage.label()));
    }
    if revenue_hit {
        reasons.push(format!("Revenue range match: {}", company.revenue_range.label()));
    }
    if text_similarity > 0.1 {
        reasons.push(format!("Description similarity: {:.0}%", text_similarity * 100.0));
    }

    let score = (TEXT_WEIGHT * text_similarity
        + INDUSTRY_WEIGHT * hit(industry_hit)
        + STAGE_WEIGHT * hit(stage_hit)
        + REVENUE_WEIGHT * hit(revenue_hit))
    .clamp(0.0, 1.0);

    CompanyMatch {
        company: company.clone(),
        score,
        text_similarity,
        match_reasons: reasons,
        recommendation: recommendation_for(score),
        risk_score: company_risk_score(company),
    }
}

fn hit(matched: bool) -> f64 {
    if matched {
        1.0
    } else {
        0.0
    }
}

/// Heuristic deal risk from company maturity, in [0, 1].
pub fn company_risk_score(company: &company::Model) -> f64 {
    let mut risk: f64 = 0.5;
    if company.funding_stage.is_early() {
        risk += 0.2;
    }
    if matches!(company.revenue_range, RevenueRange::Under1M | RevenueRange::From1To5M) {
        risk += 0.15;
    }
    if company
        .founding_year
        .is_some_and(|year| year > 2020 && year <= Utc::now().year())
    {
        risk += 0.1;
    }
    risk.clamp(0.0, 1.0)
}
