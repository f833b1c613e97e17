//! Rule-based Q&A over the dashboard numbers.

use serde::{Deserialize, Serialize};
use textdistance::str::sorensen_dice;
use utoipa::ToSchema;

use crate::analysis::text::tokenize;
use crate::routes::dashboard::DashboardStats;

/// Below this, a fuzzy match against the example phrases is not trusted.
const FUZZY_THRESHOLD: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    Help,
    CompanyCount,
    IndustryBreakdown,
    DealPipeline,
    ThesisStats,
    TopCompanies,
    Unknown,
}

struct IntentRule {
    intent: Intent,
    keywords: &'static [&'static str],
    examples: &'static [&'static str],
}

// Checked in order; the first keyword hit wins.
const RULES: &[IntentRule] = &[
    IntentRule {
        intent: Intent::Help,
        keywords: &["help", "usage", "explain", "commands"],
        examples: &["what can you do", "how do i use this"],
    },
    IntentRule {
        intent: Intent::TopCompanies,
        keywords: &["top", "best", "highest"],
        examples: &["show me the best matches", "which companies matched best"],
    },
    IntentRule {
        intent: Intent::IndustryBreakdown,
        keywords: &["industry", "industries", "sector", "sectors", "breakdown"],
        examples: &["companies by sector", "what industries are covered"],
    },
    IntentRule {
        intent: Intent::DealPipeline,
        keywords: &["deal", "deals", "pipeline", "status"],
        examples: &["how is the pipeline looking", "open deal count"],
    },
    IntentRule {
        intent: Intent::ThesisStats,
        keywords: &["thesis", "theses", "analysis", "analyses"],
        examples: &["how many theses were analyzed", "recent thesis activity"],
    },
    IntentRule {
        intent: Intent::CompanyCount,
        keywords: &["companies", "company", "catalog", "startups"],
        examples: &["how many companies are there", "catalog size"],
    },
    IntentRule {
        intent: Intent::Greeting,
        keywords: &["hello", "hi", "hey", "greetings"],
        examples: &["good morning", "good afternoon"],
    },
];

/// Keyword rules first, then the closest example phrase by Sørensen–Dice.
pub fn detect_intent(message: &str) -> Intent {
    let tokens = tokenize(message);
    for rule in RULES {
        if tokens.iter().any(|t| rule.keywords.contains(&t.as_str())) {
            return rule.intent;
        }
    }

    let normalized = tokens.join(" ");
    let normalized = normalized.as_str();
    RULES
        .iter()
        .flat_map(|rule| rule.examples.iter().map(move |e| (rule.intent, sorensen_dice(normalized, e))))
        .filter(|(_, similarity)| *similarity >= FUZZY_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(intent, _)| intent)
        .unwrap_or(Intent::Unknown)
}

pub fn compose_reply(intent: Intent, stats: &DashboardStats) -> String {
    match intent {
        Intent::Greeting => "Hello! Ask me about the company catalog, deals or analyzed theses.".to_string(),
        Intent::Help => "Submit a thesis to /api/analyze-thesis to extract criteria and rank matching \
             companies. You can ask me how many companies, deals or theses there are, the industry \
             breakdown, or which companies matched best."
            .to_string(),
        Intent::CompanyCount => format!("The catalog has {} active companies.", stats.total_companies),
        Intent::IndustryBreakdown => {
            if stats.industry_breakdown.is_empty() {
                return "The catalog is empty.".to_string();
            }
            let parts: Vec<String> = stats
                .industry_breakdown
                .iter()
                .map(|c| format!("{} {}", c.industry.label(), c.count))
                .collect();
            format!("Companies by industry: {}.", parts.join(", "))
        }
        Intent::DealPipeline => {
            if stats.total_deals == 0 {
                return "There are no deals yet. Create one from a thesis match.".to_string();
            }
            let parts: Vec<String> = stats
                .deal_statuses
                .iter()
                .map(|s| format!("{} {}", status_label(s.status), s.count))
                .collect();
            format!("There are {} deals: {}.", stats.total_deals, parts.join(", "))
        }
        Intent::ThesisStats => format!(
            "{} theses analyzed, {} in the last 7 days. Average deal match score is {:.2}.",
            stats.thesis_summary.total_analyses,
            stats.thesis_summary.recent_analyses,
            stats.thesis_summary.avg_match_score
        ),
        Intent::TopCompanies => {
            let matched: Vec<String> = stats
                .top_companies
                .iter()
                .filter(|c| c.similarity_score > 0.0)
                .map(|c| format!("{} ({:.2})", c.name, c.similarity_score))
                .collect();
            if matched.is_empty() {
                "No companies have been matched yet. Analyze a thesis first.".to_string()
            } else {
                format!("Top matched companies: {}.", matched.join(", "))
            }
        }
        Intent::Unknown => "Sorry, I didn't understand that. Try asking about companies, deals, \
             theses or industries."
            .to_string(),
    }
}

fn status_label(status: crate::entities::DealStatus) -> &'static str {
    use crate::entities::DealStatus::*;
    match status {
        Prospecting => "prospecting",
        Qualification => "qualification",
        Proposal => "proposal",
        Negotiation => "negotiation",
        DueDiligence => "due diligence",
        ClosedWon => "closed won",
        ClosedLost => "closed lost",
    }
}
