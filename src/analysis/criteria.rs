//! Keyword/regex criteria extraction.

use std::collections::{BTreeSet, HashMap};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::text::{compile_keywords, content_tokens, split_sentences, KeywordPattern};
use super::vocabulary::{
    BUSINESS_MODELS, INDUSTRY_VOCABULARY, REGIONS, REVENUE_CONTEXT, REVENUE_VOCABULARY,
    STAGE_VOCABULARY,
};
use crate::entities::{FundingStage, Industry, RevenueRange};

const STAGE_KEYWORD_CONFIDENCE: f64 = 0.9;
const REVENUE_PHRASE_CONFIDENCE: f64 = 0.8;
const REVENUE_AMOUNT_CONFIDENCE: f64 = 0.9;
const MAX_KEYWORDS: usize = 10;

/// Structured criteria extracted from a thesis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ThesisCriteria {
    pub industries: Vec<IndustryMatch>,
    pub funding_stages: Vec<StageMatch>,
    pub revenue_ranges: Vec<RevenueMatch>,
    /// Numeric revenue bands, in USD millions, as written in the text
    pub revenue_bands: Vec<RevenueBand>,
    pub business_models: Vec<String>,
    pub regions: Vec<String>,
    /// Most frequent content words
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct IndustryMatch {
    pub industry: Industry,
    pub confidence: f64,
    pub keywords_found: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StageMatch {
    pub stage: FundingStage,
    pub confidence: f64,
    pub keywords_found: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RevenueMatch {
    pub range: RevenueRange,
    pub confidence: f64,
    pub keywords_found: Vec<String>,
}

/// A revenue band in USD millions. `max_millions: None` means open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RevenueBand {
    pub min_millions: f64,
    pub max_millions: Option<f64>,
}

impl RevenueBand {
    /// Whether the band overlaps a bucket `[lo, hi)`. A point band falls in exactly one bucket.
    pub fn overlaps(&self, range: RevenueRange) -> bool {
        let (lo, hi) = range.bounds();
        match self.max_millions {
            Some(max) if max <= self.min_millions => lo <= self.min_millions && self.min_millions < hi,
            Some(max) => lo < max && self.min_millions < hi,
            None => self.min_millions < hi,
        }
    }

    pub fn ranges(&self) -> Vec<RevenueRange> {
        use sea_orm::Iterable;
        RevenueRange::iter().filter(|r| self.overlaps(*r)).collect()
    }
}

impl ThesisCriteria {
    /// True when no industry, stage or revenue criterion was found.
    pub fn is_empty(&self) -> bool {
        self.industries.is_empty() && self.funding_stages.is_empty() && self.revenue_ranges.is_empty()
    }

    pub fn industry_set(&self) -> BTreeSet<Industry> {
        self.industries.iter().map(|m| m.industry).collect()
    }

    pub fn stage_set(&self) -> BTreeSet<FundingStage> {
        self.funding_stages.iter().map(|m| m.stage).collect()
    }

    pub fn revenue_set(&self) -> BTreeSet<RevenueRange> {
        self.revenue_ranges.iter().map(|m| m.range).collect()
    }
}

struct CompiledIndustry {
    industry: Industry,
    base_confidence: f64,
    patterns: Vec<KeywordPattern>,
}

static INDUSTRY_PATTERNS: Lazy<Vec<CompiledIndustry>> = Lazy::new(|| {
    INDUSTRY_VOCABULARY
        .iter()
        .map(|v| CompiledIndustry {
            industry: v.industry,
            base_confidence: v.base_confidence,
            patterns: compile_keywords(v.keywords),
        })
        .collect()
});

static STAGE_PATTERNS: Lazy<Vec<(FundingStage, Vec<KeywordPattern>)>> = Lazy::new(|| {
    STAGE_VOCABULARY
        .iter()
        .map(|v| (v.stage, compile_keywords(v.keywords)))
        .collect()
});

static REVENUE_PATTERNS: Lazy<Vec<(RevenueRange, Vec<KeywordPattern>)>> = Lazy::new(|| {
    REVENUE_VOCABULARY
        .iter()
        .map(|v| (v.range, compile_keywords(v.keywords)))
        .collect()
});

static REVENUE_CONTEXT_PATTERNS: Lazy<Vec<KeywordPattern>> =
    Lazy::new(|| compile_keywords(REVENUE_CONTEXT));

static BUSINESS_MODEL_PATTERNS: Lazy<Vec<(&'static str, Vec<KeywordPattern>)>> = Lazy::new(|| {
    BUSINESS_MODELS
        .iter()
        .map(|(label, keywords)| (*label, compile_keywords(keywords)))
        .collect()
});

static REGION_PATTERNS: Lazy<Vec<(&'static str, Vec<KeywordPattern>)>> = Lazy::new(|| {
    REGIONS
        .iter()
        .map(|(label, keywords)| (*label, compile_keywords(keywords)))
        .collect()
});

// "Series A-C", "series b to d", "Series A through Series C"
static STAGE_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bseries[\s\-]+([a-d])\s*(?:-|–|to|through)\s*(?:series[\s\-]+)?([a-d])\b")
        .expect("valid stage range regex")
});

// "Series A and D", "Series B/C", "Series A, B or C": each letter, nothing in between
static STAGE_LIST_RE: Lazy<Regex> = Lazy::new(|| {
    // a bare trailing letter must be a capital so "and a strong team" is not Series A
    Regex::new(r"(?i)\bseries[\s\-]+([a-d])((?:\s*(?:,|/|&|and|or)\s*(?:series[\s\-]+[a-d]|(?-i:[A-D]))\b)+)")
        .expect("valid stage list regex")
});

static SERIES_LETTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b([a-d])\b").expect("valid series letter regex"));

// "$5M-$50M", "$10M to $100M", "between $1M and $5M", "under $1M", "$100M+", "$500,000", "$2.5 million"
static MONEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ix)
        (?:\b(?P<qual>between|under|below|less\s+than|up\s+to|over|above|more\s+than|at\s+least)\s+)?
        \$\s?(?P<lo>\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?)\s*(?P<lo_unit>million|billion|mm|mn|bn|k|m|b)?\b
        (?:\s*(?:-|–|to|(?P<and>and))\s*\$?\s?(?P<hi>\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?)\s*(?P<hi_unit>million|billion|mm|mn|bn|k|m|b)?\b)?
        (?P<plus>\+)?",
    )
    .expect("valid money regex")
});

/// Extracts industries, funding stages and revenue ranges from free text.
///
/// Never fails: text with no recognizable criteria (including empty text)
/// yields `ThesisCriteria::default()`.
pub fn extract_criteria(text: &str) -> ThesisCriteria {
    if text.trim().is_empty() {
        return ThesisCriteria::default();
    }

    ThesisCriteria {
        industries: extract_industries(text),
        funding_stages: extract_stages(text),
        revenue_ranges: extract_revenue_ranges(text),
        revenue_bands: extract_revenue_bands(text),
        business_models: labels_found(&BUSINESS_MODEL_PATTERNS, text),
        regions: labels_found(&REGION_PATTERNS, text),
        keywords: top_keywords(text, MAX_KEYWORDS),
    }
}

fn extract_industries(text: &str) -> Vec<IndustryMatch> {
    INDUSTRY_PATTERNS
        .iter()
        .filter_map(|compiled| {
            let found: Vec<String> = compiled
                .patterns
                .iter()
                .filter(|p| p.is_match(text))
                .map(|p| p.keyword.to_string())
                .collect();
            if found.is_empty() {
                return None;
            }
            let coverage = (found.len() as f64 / compiled.patterns.len() as f64).min(1.0);
            Some(IndustryMatch {
                industry: compiled.industry,
                confidence: coverage * compiled.base_confidence,
                keywords_found: found,
            })
        })
        .collect()
}

fn extract_stages(text: &str) -> Vec<StageMatch> {
    let mut found: HashMap<FundingStage, Vec<String>> = HashMap::new();

    for (stage, patterns) in STAGE_PATTERNS.iter() {
        for pattern in patterns {
            if pattern.is_match(text) {
                found.entry(*stage).or_default().push(pattern.keyword.to_string());
            }
        }
    }

    for caps in STAGE_RANGE_RE.captures_iter(text) {
        let (Some(from), Some(to)) = (series_letter(&caps, 1), series_letter(&caps, 2)) else {
            continue;
        };
        let (from, to) = if from <= to { (from, to) } else { (to, from) };
        let phrase = caps.get(0).map(|m| m.as_str().to_string()).unwrap_or_default();
        for letter in from..=to {
            add_stage_phrase(&mut found, letter, &phrase);
        }
    }

    for caps in STAGE_LIST_RE.captures_iter(text) {
        let phrase = caps.get(0).map(|m| m.as_str().to_string()).unwrap_or_default();
        let first = series_letter(&caps, 1);
        let rest: Vec<char> = caps
            .get(2)
            .map(|m| {
                SERIES_LETTER_RE
                    .captures_iter(m.as_str())
                    .filter_map(|c| series_letter(&c, 1))
                    .collect()
            })
            .unwrap_or_default();
        for letter in first.into_iter().chain(rest) {
            add_stage_phrase(&mut found, letter, &phrase);
        }
    }

    // Vocabulary order is the canonical order
    STAGE_VOCABULARY
        .iter()
        .filter_map(|v| {
            found.remove(&v.stage).map(|keywords_found| StageMatch {
                stage: v.stage,
                confidence: STAGE_KEYWORD_CONFIDENCE,
                keywords_found,
            })
        })
        .collect()
}

fn add_stage_phrase(found: &mut HashMap<FundingStage, Vec<String>>, letter: char, phrase: &str) {
    if let Some(stage) = FundingStage::from_series_letter(letter) {
        let keywords = found.entry(stage).or_default();
        if !keywords.iter().any(|k| k == phrase) {
            keywords.push(phrase.to_string());
        }
    }
}

fn series_letter(caps: &Captures<'_>, group: usize) -> Option<char> {
    caps.get(group)
        .and_then(|m| m.as_str().chars().next())
        .map(|c| c.to_ascii_lowercase())
}

fn extract_revenue_ranges(text: &str) -> Vec<RevenueMatch> {
    let mut found: HashMap<RevenueRange, (f64, Vec<String>)> = HashMap::new();

    for (range, patterns) in REVENUE_PATTERNS.iter() {
        for pattern in patterns {
            if let Some(hit) = pattern.find(text) {
                let entry = found
                    .entry(*range)
                    .or_insert((REVENUE_PHRASE_CONFIDENCE, Vec::new()));
                entry.1.push(hit.to_lowercase());
            }
        }
    }

    for (band, phrase) in revenue_bands_with_phrases(text) {
        for range in band.ranges() {
            let entry = found
                .entry(range)
                .or_insert((REVENUE_AMOUNT_CONFIDENCE, Vec::new()));
            entry.0 = entry.0.max(REVENUE_AMOUNT_CONFIDENCE);
            if !entry.1.contains(&phrase) {
                entry.1.push(phrase.clone());
            }
        }
    }

    use sea_orm::Iterable;
    RevenueRange::iter()
        .filter_map(|range| {
            found.remove(&range).map(|(confidence, keywords_found)| RevenueMatch {
                range,
                confidence,
                keywords_found,
            })
        })
        .collect()
}

fn extract_revenue_bands(text: &str) -> Vec<RevenueBand> {
    revenue_bands_with_phrases(text)
        .into_iter()
        .map(|(band, _)| band)
        .collect()
}

/// Money amounts found in sentences that talk about revenue.
fn revenue_bands_with_phrases(text: &str) -> Vec<(RevenueBand, String)> {
    split_sentences(text)
        .into_iter()
        .filter(|sentence| REVENUE_CONTEXT_PATTERNS.iter().any(|p| p.is_match(sentence)))
        .flat_map(|sentence| {
            MONEY_RE
                .captures_iter(sentence)
                .flat_map(|caps| {
                    let phrase = caps[0].trim().to_string();
                    parse_bands(&caps).into_iter().map(move |band| (band, phrase.clone()))
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// One band per amount; "$1M and $5M" without a leading "between" is two points.
fn parse_bands(caps: &Captures<'_>) -> Vec<RevenueBand> {
    let between = caps
        .name("qual")
        .is_some_and(|m| m.as_str().eq_ignore_ascii_case("between"));
    if caps.name("and").is_none() || between {
        return parse_band(caps).into_iter().collect();
    }

    let lo = caps
        .name("lo")
        .and_then(|m| parse_number(m.as_str()))
        .map(|v| to_millions(v, caps.name("lo_unit").map(|m| m.as_str())));
    let hi = caps
        .name("hi")
        .and_then(|m| parse_number(m.as_str()))
        .map(|v| to_millions(v, caps.name("hi_unit").map(|m| m.as_str())));
    [lo, hi]
        .into_iter()
        .flatten()
        .map(|v| RevenueBand { min_millions: v, max_millions: Some(v) })
        .collect()
}

fn parse_band(caps: &Captures<'_>) -> Option<RevenueBand> {
    let lo_raw = parse_number(caps.name("lo")?.as_str())?;
    let lo_unit = caps.name("lo_unit").map(|m| m.as_str());
    let hi_unit = caps.name("hi_unit").map(|m| m.as_str());

    // "$5-50M": the low end borrows the high end's unit
    let lo = to_millions(lo_raw, lo_unit.or(hi_unit));

    if let Some(hi) = caps.name("hi") {
        let hi = to_millions(parse_number(hi.as_str())?, hi_unit.or(lo_unit));
        let (min, max) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        return Some(RevenueBand { min_millions: min, max_millions: Some(max) });
    }

    if caps.name("plus").is_some() {
        return Some(RevenueBand { min_millions: lo, max_millions: None });
    }

    let qualifier = caps
        .name("qual")
        .map(|m| m.as_str().to_lowercase().split_whitespace().collect::<Vec<_>>().join(" "));

    let band = match qualifier.as_deref() {
        Some("under" | "below" | "less than" | "up to") => RevenueBand { min_millions: 0.0, max_millions: Some(lo) },
        Some("over" | "above" | "more than" | "at least") => RevenueBand { min_millions: lo, max_millions: None },
        _ => RevenueBand { min_millions: lo, max_millions: Some(lo) },
    };
    // "under $1M" is [0, 1): make sure a zero-width band never results
    if band.max_millions == Some(0.0) {
        return None;
    }
    Some(band)
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.replace(',', "").parse().ok()
}

fn to_millions(value: f64, unit: Option<&str>) -> f64 {
    match unit.map(|u| u.to_ascii_lowercase()).as_deref() {
        Some("k") => value / 1_000.0,
        Some("m" | "mm" | "mn" | "million") => value,
        Some("b" | "bn" | "billion") => value * 1_000.0,
        // a bare dollar figure
        _ => value / 1_000_000.0,
    }
}

fn labels_found(patterns: &[(&'static str, Vec<KeywordPattern>)], text: &str) -> Vec<String> {
    patterns
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|p| p.is_match(text)))
        .map(|(label, _)| label.to_string())
        .collect()
}

/// The `limit` most frequent content words; ties are alphabetical.
pub fn top_keywords(text: &str, limit: usize) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for token in content_tokens(text) {
        if token.chars().count() < 3 || token.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        *counts.entry(token).or_insert(0) += 1;
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.into_iter().take(limit).map(|(word, _)| word).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges(text: &str) -> Vec<RevenueRange> {
        extract_criteria(text).revenue_ranges.iter().map(|m| m.range).collect()
    }

    #[test]
    fn arr_band_maps_to_overlapping_buckets() {
        let text = "Target companies should be in the $5M-$50M ARR range with strong retention.";
        assert_eq!(ranges(text), vec![RevenueRange::From5To20M, RevenueRange::From20To100M]);
    }

    #[test]
    fn upper_bound_is_exclusive() {
        let text = "Target companies in Series A-C stages with $10M-$100M revenue.";
        assert_eq!(ranges(text), vec![RevenueRange::From5To20M, RevenueRange::From20To100M]);
    }

    #[test]
    fn qualifiers_and_plus_open_the_band() {
        assert_eq!(ranges("Companies with under $1M in revenue."), vec![RevenueRange::Under1M]);
        assert_eq!(ranges("Businesses doing $100M+ in annual sales."), vec![RevenueRange::Over100M]);
        assert_eq!(
            ranges("Revenue over $20 million is a must."),
            vec![RevenueRange::From20To100M, RevenueRange::Over100M]
        );
    }

    #[test]
    fn unit_is_borrowed_from_the_high_end() {
        assert_eq!(ranges("ARR between $1-5M."), vec![RevenueRange::From1To5M]);
    }

    #[test]
    fn bare_dollar_amounts_are_dollars() {
        assert_eq!(ranges("Revenue of $500,000 last year."), vec![RevenueRange::Under1M]);
    }

    #[test]
    fn amounts_outside_revenue_sentences_are_ignored() {
        let criteria = extract_criteria("We write $2M checks. We like logistics.");
        assert!(criteria.revenue_ranges.is_empty());
        assert!(criteria.revenue_bands.is_empty());
    }

    #[test]
    fn stage_ranges_expand() {
        let stages: Vec<FundingStage> = extract_criteria("Series B to D growth rounds")
            .funding_stages
            .iter()
            .map(|m| m.stage)
            .collect();
        assert_eq!(
            stages,
            vec![FundingStage::SeriesB, FundingStage::SeriesC, FundingStage::SeriesD]
        );
    }

    #[test]
    fn between_and_reads_as_one_band() {
        assert_eq!(ranges("Revenue between $1M and $5M."), vec![RevenueRange::From1To5M]);
        assert_eq!(
            ranges("ARR between $5M and $50M."),
            vec![RevenueRange::From5To20M, RevenueRange::From20To100M]
        );
    }

    #[test]
    fn amounts_joined_by_and_stay_separate_points() {
        assert_eq!(
            ranges("Revenue of $2M and $30M across the two funds."),
            vec![RevenueRange::From1To5M, RevenueRange::From20To100M]
        );
    }

    #[test]
    fn stage_lists_do_not_expand() {
        let stages = |text: &str| extract_criteria(text).stage_set().into_iter().collect::<Vec<_>>();
        assert_eq!(
            stages("We lead Series A and Series D rounds."),
            vec![FundingStage::SeriesA, FundingStage::SeriesD]
        );
        assert_eq!(stages("Series B/D follow-ons"), vec![FundingStage::SeriesB, FundingStage::SeriesD]);
        assert_eq!(
            stages("Series A, C or D"),
            vec![FundingStage::SeriesA, FundingStage::SeriesC, FundingStage::SeriesD]
        );
        assert_eq!(stages("Series B and a strong team"), vec![FundingStage::SeriesB]);
        assert_eq!(
            stages("Series A through Series C"),
            vec![FundingStage::SeriesA, FundingStage::SeriesB, FundingStage::SeriesC]
        );
    }

    #[test]
    fn keywords_are_ranked_by_frequency() {
        let keywords = top_keywords("payments payments banking banking banking apis", 2);
        assert_eq!(keywords, vec!["banking".to_string(), "payments".to_string()]);
    }
}
