use chrono::Utc;
use dealflow::analysis::extract_criteria;
use dealflow::entities::{company, FundingStage, Industry, RevenueRange};
use dealflow::matching::{
    cosine_similarity, rank_companies, recommendation_for, score_company, HashingEmbedder,
    MatchOptions, Recommendation, TextEmbedder,
};
use dealflow::seed::generate_catalog;

fn company(id: i32, name: &str, description: &str, industry: Industry, stage: FundingStage, revenue: RevenueRange) -> company::Model {
    let now = Utc::now();
    company::Model {
        id,
        name: name.to_string(),
        description: description.to_string(),
        industry,
        funding_stage: stage,
        revenue_range: revenue,
        website: None,
        founding_year: Some(2018),
        employee_count: Some(40),
        headquarters: None,
        total_funding: None,
        embedding_vector: None,
        similarity_score: 0.0,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

/// Generated catalog turned into models with sequential ids.
fn catalog(count: usize) -> Vec<company::Model> {
    generate_catalog(count)
        .into_iter()
        .enumerate()
        .map(|(i, c)| {
            company(
                i as i32 + 1,
                &c.name,
                &c.description,
                c.industry,
                c.funding_stage,
                c.revenue_range,
            )
        })
        .collect()
}

const THESIS: &str = "Healthcare and biotech companies at Series B with $20M-$50M revenue.";

#[test]
fn test_ranking_is_bounded_sorted_and_deterministic() {
    let embedder = HashingEmbedder::default();
    let criteria = extract_criteria(THESIS);
    let companies = catalog(80);

    let first = rank_companies(&embedder, THESIS, &criteria, &companies, MatchOptions::default());
    let second = rank_companies(&embedder, THESIS, &criteria, &companies, MatchOptions::default());

    assert_eq!(first.len(), 10);
    let ids = |ms: &[dealflow::matching::CompanyMatch]| ms.iter().map(|m| m.company.id).collect::<Vec<_>>();
    assert_eq!(ids(&first), ids(&second));

    for pair in first.windows(2) {
        assert!(pair[0].score >= pair[1].score);
        if pair[0].score == pair[1].score {
            assert!(pair[0].company.id < pair[1].company.id);
        }
    }
    for m in &first {
        assert!((0.0..=1.0).contains(&m.score));
        assert!((0.0..=1.0).contains(&m.text_similarity));
        assert!((0.0..=1.0).contains(&m.risk_score));
        assert_eq!(m.recommendation, recommendation_for(m.score));
    }
}

#[test]
fn test_top_n_is_clamped() {
    let embedder = HashingEmbedder::default();
    let criteria = extract_criteria(THESIS);
    let companies = catalog(120);

    let none = MatchOptions { top_n: 0, min_score: 0.0 };
    assert_eq!(rank_companies(&embedder, THESIS, &criteria, &companies, none).len(), 1);

    let huge = MatchOptions { top_n: 1000, min_score: 0.0 };
    assert_eq!(rank_companies(&embedder, THESIS, &criteria, &companies, huge).len(), 50);

    let small = catalog(4);
    let options = MatchOptions { top_n: 10, min_score: 0.0 };
    assert_eq!(rank_companies(&embedder, THESIS, &criteria, &small, options).len(), 4);
}

#[test]
fn test_min_score_filters() {
    let embedder = HashingEmbedder::default();
    let criteria = extract_criteria(THESIS);
    let companies = catalog(60);

    let options = MatchOptions { top_n: 50, min_score: 0.45 };
    let matches = rank_companies(&embedder, THESIS, &criteria, &companies, options);
    assert!(matches.iter().all(|m| m.score >= 0.45));

    let impossible = MatchOptions { top_n: 50, min_score: 1.0 };
    assert!(rank_companies(&embedder, THESIS, &criteria, &companies, impossible).is_empty());
}

#[test]
fn test_full_criteria_match_outranks_partial() {
    let embedder = HashingEmbedder::default();
    let criteria = extract_criteria(THESIS);

    let full = company(
        1,
        "Helix Bio",
        "Biotech platform for clinical trials",
        Industry::Healthcare,
        FundingStage::SeriesB,
        RevenueRange::From20To100M,
    );
    let partial = company(
        2,
        "Helix Care",
        "Biotech platform for clinical trials",
        Industry::Healthcare,
        FundingStage::Seed,
        RevenueRange::Under1M,
    );
    let unrelated = company(
        3,
        "Freightly",
        "Last mile freight routing",
        Industry::Logistics,
        FundingStage::Seed,
        RevenueRange::Under1M,
    );

    let full_match = score_company(&embedder, THESIS, &criteria, &full);
    let partial_match = score_company(&embedder, THESIS, &criteria, &partial);
    let unrelated_match = score_company(&embedder, THESIS, &criteria, &unrelated);

    assert!(full_match.score > partial_match.score);
    assert!(partial_match.score > unrelated_match.score);
    assert!(full_match.match_reasons.contains(&"Industry match: Healthcare".to_string()));
    assert!(full_match.match_reasons.contains(&"Funding stage match: Series B".to_string()));
    assert!(full_match.match_reasons.contains(&"Revenue range match: $20M - $100M".to_string()));
    assert!(!unrelated_match
        .match_reasons
        .iter()
        .any(|r| r.starts_with("Industry match")));
}

#[test]
fn test_stored_embedding_is_used_when_dimension_matches() {
    let embedder = HashingEmbedder::default();
    let criteria = extract_criteria(THESIS);
    let mut target = company(
        1,
        "Quiet Co",
        "Nothing in common",
        Industry::Other,
        FundingStage::Private,
        RevenueRange::Under1M,
    );

    // store the thesis vector itself; similarity becomes 1
    let thesis_vector = embedder.embed(THESIS);
    target.embedding_vector = Some(serde_json::to_string(&thesis_vector).unwrap());
    let stored = score_company(&embedder, THESIS, &criteria, &target);
    assert!((stored.text_similarity - 1.0).abs() < 1e-6);

    // wrong dimension falls back to embedding the profile
    target.embedding_vector = Some("[1.0, 0.0, 0.0]".to_string());
    let fallback = score_company(&embedder, THESIS, &criteria, &target);
    assert!(fallback.text_similarity < 1.0);
}

#[test]
fn test_cosine_similarity_properties() {
    let embedder = HashingEmbedder::default();
    let a = embedder.embed("fintech payments infrastructure");
    let b = embedder.embed("payments infrastructure for fintech banks");
    let c = embedder.embed("solar farms and wind energy");

    assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-6);
    assert!((cosine_similarity(&a, &b) - cosine_similarity(&b, &a)).abs() < 1e-12);
    assert!(cosine_similarity(&a, &b) > cosine_similarity(&a, &c));
    assert_eq!(cosine_similarity(&a, &[]), 0.0);
}

#[test]
fn test_recommendation_thresholds() {
    assert_eq!(recommendation_for(0.95), Recommendation::StrongBuy);
    assert_eq!(recommendation_for(0.7), Recommendation::Buy);
    assert_eq!(recommendation_for(0.5), Recommendation::Hold);
    assert_eq!(recommendation_for(0.3), Recommendation::Review);
    assert_eq!(recommendation_for(0.1), Recommendation::Pass);
    assert_eq!(
        serde_json::to_value(Recommendation::StrongBuy).unwrap(),
        serde_json::json!("Strong Buy")
    );
}
