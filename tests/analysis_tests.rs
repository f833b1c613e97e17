use dealflow::analysis::{
    analyze_sentiment, analyze_thesis, extract_criteria,
    vocabulary::{INDUSTRY_VOCABULARY, STAGE_VOCABULARY},
    SentimentLabel,
};
use dealflow::entities::{FundingStage, Industry, RevenueRange};

#[test]
fn test_every_industry_keyword_is_detected() {
    for vocab in INDUSTRY_VOCABULARY {
        for keyword in vocab.keywords {
            let text = format!("We back {keyword} companies with ambitious founders.");
            let criteria = extract_criteria(&text);
            assert!(
                criteria.industry_set().contains(&vocab.industry),
                "'{keyword}' did not map to {:?}",
                vocab.industry
            );
        }
    }
}

#[test]
fn test_every_stage_keyword_is_detected() {
    for vocab in STAGE_VOCABULARY {
        for keyword in vocab.keywords {
            let text = format!("Focused on {keyword} rounds.");
            let criteria = extract_criteria(&text);
            assert!(
                criteria.stage_set().contains(&vocab.stage),
                "'{keyword}' did not map to {:?}",
                vocab.stage
            );
        }
    }
}

#[test]
fn test_empty_and_unrelated_text_yield_empty_criteria() {
    for text in ["", "   \n\t", "The weather was pleasant on Tuesday."] {
        let criteria = extract_criteria(text);
        assert!(criteria.industries.is_empty(), "industries for {text:?}");
        assert!(criteria.funding_stages.is_empty());
        assert!(criteria.revenue_ranges.is_empty());
    }
    assert!(extract_criteria("").is_empty());
}

#[test]
fn test_keywords_do_not_match_inside_words() {
    // "ai" inside "said"/"maintain", "ml" inside "html"
    let criteria = extract_criteria("She said we maintain html templates.");
    assert!(!criteria.industry_set().contains(&Industry::AiMl));
}

#[test]
fn test_multi_criteria_thesis() {
    let text = "Target AI and machine learning companies in Series A-C stages \
                with $10M-$100M revenue. Strong focus on enterprise SaaS.";
    let criteria = extract_criteria(text);

    assert!(criteria.industry_set().contains(&Industry::AiMl));
    assert!(criteria.industry_set().contains(&Industry::Software));
    assert_eq!(
        criteria.stage_set().into_iter().collect::<Vec<_>>(),
        vec![FundingStage::SeriesA, FundingStage::SeriesB, FundingStage::SeriesC]
    );
    assert_eq!(
        criteria.revenue_set().into_iter().collect::<Vec<_>>(),
        vec![RevenueRange::From5To20M, RevenueRange::From20To100M]
    );
    assert!(criteria.business_models.contains(&"SaaS".to_string()));

    for m in &criteria.industries {
        assert!(m.confidence > 0.0 && m.confidence <= 1.0);
        assert!(!m.keywords_found.is_empty());
    }
}

#[test]
fn test_sentiment_bounds_and_labels() {
    let positive = analyze_sentiment("Strong growth, proven and profitable leaders.");
    assert_eq!(positive.label, SentimentLabel::Positive);

    let negative = analyze_sentiment("Volatile, declining and risky markets with weak demand.");
    assert_eq!(negative.label, SentimentLabel::Negative);

    let neutral = analyze_sentiment("Companies that sell software.");
    assert_eq!(neutral.label, SentimentLabel::Neutral);
    assert_eq!(neutral.score, 0.5);
    assert_eq!(neutral.confidence, 0.0);

    for s in [positive, negative, neutral] {
        assert!((0.0..=1.0).contains(&s.score));
        assert!((0.0..=1.0).contains(&s.confidence));
    }
}

#[test]
fn test_full_analysis_is_bounded() {
    let analysis = analyze_thesis(
        "High risk but strong opportunity in healthcare. Competitive market with \
         established players. Seed and Series A, pre-revenue companies.",
    );
    assert!((0.0..=1.0).contains(&analysis.confidence_score));
    assert!((0.0..=1.0).contains(&analysis.risk.score));
    assert!(analysis.risk.factors.iter().any(|f| f == "high risk"));
    assert!(analysis.criteria.revenue_set().contains(&RevenueRange::Under1M));
    assert!(!analysis.summary.is_empty());
    assert!(!analysis.recommendations.is_empty());
}

#[test]
fn test_analysis_of_empty_text() {
    let analysis = analyze_thesis("");
    assert!(analysis.criteria.is_empty());
    assert_eq!(analysis.confidence_score, 0.5);
    assert_eq!(analysis.summary, "");
}
