use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{ApiJson, PageInfo, PageQuery};
use crate::analysis::{analyze_thesis as run_thesis_analysis, suggest_title, ThesisAnalysis, ThesisCriteria};
use crate::config::MAX_TOP_N;
use crate::entities::{company, deal, investment_thesis, DealStatus, DealType};
use crate::error::AppError;
use crate::matching::{rank_companies, CompanyMatch, MatchOptions};
use crate::AppState;

pub const MAX_THESIS_CHARS: usize = 10_000;
const HISTORY_LIMIT: u64 = 20;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyzeThesisRequest {
    /// Free-text investment thesis
    #[serde(default)]
    pub thesis_text: Option<String>,
    /// Optional title; one is derived from the criteria when omitted
    #[serde(default)]
    pub title: Option<String>,
    /// Number of matches to return, 1-50 (default from config)
    #[serde(default)]
    pub top_n: Option<usize>,
    /// Drop matches scoring below this value, 0-1 (default: 0)
    #[serde(default)]
    pub min_score: Option<f64>,
    /// Open a prospecting deal for every returned match (default: false)
    #[serde(default)]
    pub create_deals: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyzeThesisResponse {
    pub thesis_id: i32,
    pub title: String,
    pub analysis: ThesisAnalysis,
    pub matching_companies: Vec<CompanyMatch>,
    pub recommendations: Vec<String>,
    /// Ids of deals opened by this request
    pub deals_created: Vec<i32>,
}

/// Validated analyze-thesis input.
#[derive(Debug)]
struct AnalyzeInput {
    text: String,
    title: Option<String>,
    options: MatchOptions,
    create_deals: bool,
}

fn validate(request: AnalyzeThesisRequest, default_top_n: usize) -> Result<AnalyzeInput, AppError> {
    let text = request.thesis_text.unwrap_or_default().trim().to_string();
    if text.is_empty() {
        return Err(AppError::InvalidRequest("Thesis text is required".to_string()));
    }
    if text.chars().count() > MAX_THESIS_CHARS {
        return Err(AppError::InvalidRequest(format!(
            "Thesis text must be at most {MAX_THESIS_CHARS} characters"
        )));
    }

    let top_n = request.top_n.unwrap_or(default_top_n);
    if !(1..=MAX_TOP_N).contains(&top_n) {
        return Err(AppError::InvalidRequest(format!("top_n must be between 1 and {MAX_TOP_N}")));
    }

    let min_score = request.min_score.unwrap_or(0.0);
    if !(0.0..=1.0).contains(&min_score) {
        return Err(AppError::InvalidRequest("min_score must be between 0 and 1".to_string()));
    }

    Ok(AnalyzeInput {
        text,
        title: request.title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()),
        options: MatchOptions { top_n, min_score },
        create_deals: request.create_deals.unwrap_or(false),
    })
}

/// Analyze a thesis and rank the catalog against it
#[utoipa::path(
    post,
    path = "/api/analyze-thesis",
    request_body = AnalyzeThesisRequest,
    responses(
        (status = 200, description = "Thesis analyzed and stored", body = AnalyzeThesisResponse),
        (status = 400, description = "Missing or invalid thesis text"),
        (status = 500, description = "Analysis failed")
    ),
    tag = "thesis"
)]
#[tracing::instrument(skip(state, request))]
pub async fn analyze_thesis(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AnalyzeThesisRequest>,
) -> Result<Json<AnalyzeThesisResponse>, AppError> {
    let input = validate(request, state.config.default_top_n)?;
    tracing::info!(chars = input.text.chars().count(), top_n = input.options.top_n, "analyzing thesis");

    run_analysis(&state, input).await.map(Json).map_err(|e| {
        tracing::error!(error = %e, "thesis analysis failed");
        AppError::AnalysisFailed
    })
}

async fn run_analysis(state: &AppState, input: AnalyzeInput) -> Result<AnalyzeThesisResponse, AppError> {
    let catalog = company::Entity::find()
        .filter(company::Column::IsActive.eq(true))
        .order_by_asc(company::Column::Id)
        .all(&state.db)
        .await?;

    let embedder = state.embedder.clone();
    let text = input.text.clone();
    let options = input.options;
    let (analysis, matches) = tokio::task::spawn_blocking(move || {
        let analysis = run_thesis_analysis(&text);
        let matches = rank_companies(embedder.as_ref(), &text, &analysis.criteria, &catalog, options);
        (analysis, matches)
    })
    .await
    .map_err(|e| AppError::InternalError(format!("analysis task failed: {e}")))?;

    let title = input
        .title
        .unwrap_or_else(|| suggest_title(&input.text, &analysis.criteria));
    let now = Utc::now();

    let txn = state.db.begin().await?;

    let thesis = investment_thesis::ActiveModel {
        title: Set(title.clone()),
        content: Set(input.text.clone()),
        criteria: Set(serde_json::to_value(&analysis.criteria)?),
        analysis_summary: Set(analysis.summary.clone()),
        sentiment_score: Set(analysis.sentiment.score),
        confidence_score: Set(analysis.confidence_score),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut deals_created = Vec::new();
    for m in &matches {
        company::ActiveModel {
            id: Set(m.company.id),
            similarity_score: Set(m.score),
            updated_at: Set(now),
            ..Default::default()
        }
        .update(&txn)
        .await?;

        if input.create_deals {
            let deal = deal::ActiveModel {
                thesis_id: Set(thesis.id),
                company_id: Set(m.company.id),
                title: Set(format!("Deal: {}", m.company.name)),
                deal_type: Set(DealType::default()),
                status: Set(DealStatus::default()),
                match_score: Set(m.score),
                risk_score: Set(m.risk_score),
                notes: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            deals_created.push(deal.id);
        }
    }

    txn.commit().await?;

    tracing::info!(
        thesis_id = thesis.id,
        matches = matches.len(),
        deals = deals_created.len(),
        "thesis stored"
    );

    Ok(AnalyzeThesisResponse {
        thesis_id: thesis.id,
        title,
        recommendations: analysis.recommendations.clone(),
        analysis,
        matching_companies: matches,
        deals_created,
    })
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ThesisList {
    pub items: Vec<investment_thesis::Model>,
    #[serde(flatten)]
    pub page_info: PageInfo,
}

/// List stored theses, newest first
#[utoipa::path(
    get,
    path = "/api/theses",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of theses", body = ThesisList),
        (status = 400, description = "Invalid paging parameters")
    ),
    tag = "thesis"
)]
#[tracing::instrument(skip(state))]
pub async fn list_theses(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ThesisList>, AppError> {
    let (page, page_size) = query.resolve()?;
    let paginator = investment_thesis::Entity::find()
        .order_by_desc(investment_thesis::Column::CreatedAt)
        .order_by_desc(investment_thesis::Column::Id)
        .paginate(&state.db, page_size);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(page - 1).await?;

    Ok(Json(ThesisList {
        items,
        page_info: PageInfo::new(page, page_size, total),
    }))
}

pub(crate) async fn find_thesis(db: &DatabaseConnection, id: i32) -> Result<investment_thesis::Model, AppError> {
    investment_thesis::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Thesis not found".to_string()))
}

/// Fetch one thesis
#[utoipa::path(
    get,
    path = "/api/theses/{id}",
    params(("id" = i32, Path, description = "Thesis id")),
    responses(
        (status = 200, description = "The thesis", body = investment_thesis::Model),
        (status = 404, description = "Thesis not found")
    ),
    tag = "thesis"
)]
#[tracing::instrument(skip(state))]
pub async fn get_thesis(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<investment_thesis::Model>, AppError> {
    Ok(Json(find_thesis(&state.db, id).await?))
}

/// Delete a thesis together with its deals
#[utoipa::path(
    delete,
    path = "/api/theses/{id}",
    params(("id" = i32, Path, description = "Thesis id")),
    responses(
        (status = 204, description = "Thesis deleted"),
        (status = 404, description = "Thesis not found")
    ),
    tag = "thesis"
)]
#[tracing::instrument(skip(state))]
pub async fn delete_thesis(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let txn = state.db.begin().await?;
    // cascades in the schema too; explicit so every backend behaves the same
    let deals = deal::Entity::delete_many()
        .filter(deal::Column::ThesisId.eq(id))
        .exec(&txn)
        .await?;
    let result = investment_thesis::Entity::delete_by_id(id).exec(&txn).await?;
    if result.rows_affected == 0 {
        txn.rollback().await?;
        return Err(AppError::NotFound("Thesis not found".to_string()));
    }
    txn.commit().await?;

    tracing::info!(thesis_id = id, deals_removed = deals.rows_affected, "thesis deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ThesisHistoryEntry {
    pub id: i32,
    pub title: String,
    pub analysis_summary: String,
    pub sentiment_score: f64,
    pub confidence_score: f64,
    pub created_at: DateTime<Utc>,
    pub deal_count: u64,
}

/// The 20 most recent theses with their deal counts
#[utoipa::path(
    get,
    path = "/api/thesis-history",
    responses(
        (status = 200, description = "Recent theses", body = Vec<ThesisHistoryEntry>)
    ),
    tag = "thesis"
)]
#[tracing::instrument(skip(state))]
pub async fn thesis_history(State(state): State<AppState>) -> Result<Json<Vec<ThesisHistoryEntry>>, AppError> {
    let theses = investment_thesis::Entity::find()
        .order_by_desc(investment_thesis::Column::CreatedAt)
        .order_by_desc(investment_thesis::Column::Id)
        .limit(HISTORY_LIMIT)
        .all(&state.db)
        .await?;

    let mut history = Vec::with_capacity(theses.len());
    for thesis in theses {
        let deal_count = deal::Entity::find()
            .filter(deal::Column::ThesisId.eq(thesis.id))
            .count(&state.db)
            .await?;
        history.push(ThesisHistoryEntry {
            id: thesis.id,
            title: thesis.title,
            analysis_summary: thesis.analysis_summary,
            sentiment_score: thesis.sentiment_score,
            confidence_score: thesis.confidence_score,
            created_at: thesis.created_at,
            deal_count,
        });
    }
    Ok(Json(history))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ThesisDeal {
    pub deal: deal::Model,
    pub company_name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ThesisDetails {
    pub thesis: investment_thesis::Model,
    pub criteria: ThesisCriteria,
    pub deals: Vec<ThesisDeal>,
}

/// A thesis with its parsed criteria and deals
#[utoipa::path(
    get,
    path = "/api/thesis/{id}/details",
    params(("id" = i32, Path, description = "Thesis id")),
    responses(
        (status = 200, description = "Thesis details", body = ThesisDetails),
        (status = 404, description = "Thesis not found")
    ),
    tag = "thesis"
)]
#[tracing::instrument(skip(state))]
pub async fn thesis_details(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ThesisDetails>, AppError> {
    let thesis = find_thesis(&state.db, id).await?;
    let criteria: ThesisCriteria = serde_json::from_value(thesis.criteria.clone()).unwrap_or_else(|e| {
        tracing::warn!(thesis_id = id, error = %e, "stored criteria did not parse");
        ThesisCriteria::default()
    });

    let deals = deal::Entity::find()
        .filter(deal::Column::ThesisId.eq(id))
        .order_by_desc(deal::Column::MatchScore)
        .order_by_asc(deal::Column::Id)
        .find_also_related(company::Entity)
        .all(&state.db)
        .await?
        .into_iter()
        .map(|(deal, company)| ThesisDeal {
            deal,
            company_name: company.map(|c| c.name),
        })
        .collect();

    Ok(Json(ThesisDetails { thesis, criteria, deals }))
}
