use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::text::{normalize_token, tokenize};
use super::vocabulary::{NEGATIVE_WORDS, POSITIVE_WORDS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Sentiment {
    /// `positive / (positive + negative)`, 0.5 with no lexicon hits
    pub score: f64,
    pub label: SentimentLabel,
    pub confidence: f64,
    pub positive_count: usize,
    pub negative_count: usize,
}

/// Lexicon polarity over whole words.
pub fn analyze_sentiment(text: &str) -> Sentiment {
    let mut positive_count = 0;
    let mut negative_count = 0;

    for token in tokenize(text) {
        if in_lexicon(POSITIVE_WORDS, &token) {
            positive_count += 1;
        } else if in_lexicon(NEGATIVE_WORDS, &token) {
            negative_count += 1;
        }
    }

    let total = positive_count + negative_count;
    let score = if total == 0 {
        0.5
    } else {
        positive_count as f64 / total as f64
    };

    let label = if score > 0.6 {
        SentimentLabel::Positive
    } else if score < 0.4 {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    };

    Sentiment {
        score,
        label,
        confidence: (total as f64 / 10.0).min(1.0),
        positive_count,
        negative_count,
    }
}

fn in_lexicon(lexicon: &[&str], token: &str) -> bool {
    lexicon.contains(&token) || lexicon.contains(&normalize_token(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_without_hits() {
        let s = analyze_sentiment("We invest in logistics.");
        assert_eq!(s.score, 0.5);
        assert_eq!(s.label, SentimentLabel::Neutral);
        assert_eq!(s.confidence, 0.0);
    }

    #[test]
    fn counts_whole_words_only() {
        // "growths" folds to "growth"; "riskless" is not "risk"
        let s = analyze_sentiment("Strong growths, riskless.");
        assert_eq!(s.positive_count, 2);
        assert_eq!(s.negative_count, 0);
        assert_eq!(s.label, SentimentLabel::Positive);
    }

    #[test]
    fn negative_text() {
        let s = analyze_sentiment("Volatile, uncertain and risky market with losses but growth.");
        assert_eq!(s.negative_count, 4);
        assert_eq!(s.positive_count, 1);
        assert_eq!(s.label, SentimentLabel::Negative);
        assert!((s.confidence - 0.5).abs() < 1e-9);
    }
}
