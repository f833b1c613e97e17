mod common;

use dealflow::create_app;
use dealflow::entities::{company, deal, investment_thesis};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::json;

use common::{post, test_state};

const THESIS: &str = "Healthcare and biotech companies at Series B with $20M-$50M revenue.";

/// Creates a thesis with three deals and returns `(thesis_id, company_ids)`.
async fn thesis_with_deals(app: &axum::Router) -> (i32, Vec<i32>) {
    let (status, body) = post(
        app,
        "/api/analyze-thesis",
        json!({ "thesis_text": THESIS, "top_n": 3, "create_deals": true }),
    )
    .await;
    assert!(status.is_success(), "{body}");
    let thesis_id = body["thesis_id"].as_i64().unwrap() as i32;
    let company_ids = body["matching_companies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["company"]["id"].as_i64().unwrap() as i32)
        .collect();
    (thesis_id, company_ids)
}

#[tokio::test]
async fn test_deleting_company_row_cascades_to_its_deals() {
    let state = test_state().await;
    let app = create_app(state.clone());
    let (thesis_id, company_ids) = thesis_with_deals(&app).await;
    assert_eq!(company_ids.len(), 3);

    let removed = company_ids[0];
    company::Entity::delete_by_id(removed).exec(&state.db).await.unwrap();

    let orphaned = deal::Entity::find()
        .filter(deal::Column::CompanyId.eq(removed))
        .count(&state.db)
        .await
        .unwrap();
    assert_eq!(orphaned, 0);

    let remaining = deal::Entity::find()
        .filter(deal::Column::ThesisId.eq(thesis_id))
        .count(&state.db)
        .await
        .unwrap();
    assert_eq!(remaining, 2);
}

#[tokio::test]
async fn test_deleting_thesis_row_cascades_to_its_deals() {
    let state = test_state().await;
    let app = create_app(state.clone());
    let (kept_thesis, _) = thesis_with_deals(&app).await;
    let (dropped_thesis, _) = thesis_with_deals(&app).await;

    investment_thesis::Entity::delete_by_id(dropped_thesis)
        .exec(&state.db)
        .await
        .unwrap();

    let count_for = |thesis_id: i32| {
        deal::Entity::find()
            .filter(deal::Column::ThesisId.eq(thesis_id))
            .count(&state.db)
    };
    assert_eq!(count_for(dropped_thesis).await.unwrap(), 0);
    assert_eq!(count_for(kept_thesis).await.unwrap(), 3);

    // companies are untouched
    let companies = company::Entity::find().count(&state.db).await.unwrap();
    assert_eq!(companies, common::CATALOG_SIZE as u64);
}
