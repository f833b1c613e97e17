use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::thesis::find_thesis;
use super::{category_filter, ApiJson, PageInfo, PageQuery};
use crate::analysis::ThesisCriteria;
use crate::entities::{company, deal, investment_thesis, parse_category, DealStatus, DealType};
use crate::error::AppError;
use crate::matching::score_company;
use crate::AppState;

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DealQuery {
    /// Filter by pipeline status, e.g. `prospecting`
    #[param(required = false)]
    pub status: Option<String>,
    /// Filter by deal type, e.g. `equity`
    #[param(required = false)]
    pub deal_type: Option<String>,
    /// Only deals opened from this thesis
    #[param(required = false)]
    pub thesis_id: Option<i32>,
    #[param(required = false)]
    pub page: Option<u64>,
    #[param(required = false)]
    pub page_size: Option<u64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DealList {
    pub items: Vec<deal::Model>,
    #[serde(flatten)]
    pub page_info: PageInfo,
}

/// List deals, newest first
#[utoipa::path(
    get,
    path = "/api/deals",
    params(DealQuery),
    responses(
        (status = 200, description = "One page of deals", body = DealList),
        (status = 400, description = "Unknown filter value or bad paging")
    ),
    tag = "deals"
)]
#[tracing::instrument(skip(state))]
pub async fn list_deals(
    State(state): State<AppState>,
    Query(query): Query<DealQuery>,
) -> Result<Json<DealList>, AppError> {
    let (page, page_size) = PageQuery {
        page: query.page,
        page_size: query.page_size,
    }
    .resolve()?;

    let mut condition = Condition::all();
    if let Some(status) = category_filter::<DealStatus>("status", query.status.as_deref())? {
        condition = condition.add(deal::Column::Status.eq(status));
    }
    if let Some(deal_type) = category_filter::<DealType>("deal_type", query.deal_type.as_deref())? {
        condition = condition.add(deal::Column::DealType.eq(deal_type));
    }
    if let Some(thesis_id) = query.thesis_id {
        condition = condition.add(deal::Column::ThesisId.eq(thesis_id));
    }

    let paginator = deal::Entity::find()
        .filter(condition)
        .order_by_desc(deal::Column::CreatedAt)
        .order_by_desc(deal::Column::Id)
        .paginate(&state.db, page_size);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(page - 1).await?;

    Ok(Json(DealList {
        items,
        page_info: PageInfo::new(page, page_size, total),
    }))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateDealRequest {
    pub thesis_id: Option<i32>,
    pub company_id: Option<i32>,
    /// Defaults to "Deal: {company name}"
    #[serde(default)]
    pub title: Option<String>,
    /// Defaults to `equity`
    #[serde(default)]
    pub deal_type: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateDealResponse {
    pub message: String,
    pub deal_id: i32,
    pub deal: deal::Model,
}

async fn find_company(db: &DatabaseConnection, id: i32) -> Result<company::Model, AppError> {
    company::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Company not found".to_string()))
}

async fn find_deal(db: &DatabaseConnection, id: i32) -> Result<deal::Model, AppError> {
    deal::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Deal not found".to_string()))
}

/// Open a deal between a thesis and a company
#[utoipa::path(
    post,
    path = "/api/create-deal",
    request_body = CreateDealRequest,
    responses(
        (status = 201, description = "Deal created", body = CreateDealResponse),
        (status = 400, description = "Missing ids or unknown deal type"),
        (status = 404, description = "Thesis or company not found")
    ),
    tag = "deals"
)]
#[tracing::instrument(skip(state, request))]
pub async fn create_deal(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateDealRequest>,
) -> Result<(StatusCode, Json<CreateDealResponse>), AppError> {
    let (Some(thesis_id), Some(company_id)) = (request.thesis_id, request.company_id) else {
        return Err(AppError::InvalidRequest(
            "Company ID and Thesis ID are required".to_string(),
        ));
    };
    let deal_type = match request.deal_type.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        Some(raw) => parse_category::<DealType>("deal_type", raw)?,
        None => DealType::default(),
    };

    let company = find_company(&state.db, company_id).await?;
    let thesis = find_thesis(&state.db, thesis_id).await?;

    let criteria: ThesisCriteria = serde_json::from_value(thesis.criteria.clone()).unwrap_or_default();
    let scored = score_company(state.embedder.as_ref(), &thesis.content, &criteria, &company);

    let now = Utc::now();
    let title = request
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| format!("Deal: {}", company.name));

    let deal = deal::ActiveModel {
        thesis_id: Set(thesis.id),
        company_id: Set(company.id),
        title: Set(title),
        deal_type: Set(deal_type),
        status: Set(DealStatus::default()),
        match_score: Set(scored.score),
        risk_score: Set(scored.risk_score),
        notes: Set(request.notes),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    tracing::info!(deal_id = deal.id, thesis_id, company_id, "deal created");
    Ok((
        StatusCode::CREATED,
        Json(CreateDealResponse {
            message: "Deal created successfully".to_string(),
            deal_id: deal.id,
            deal,
        }),
    ))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateDealRequest {
    /// New pipeline status
    #[serde(default)]
    pub status: Option<String>,
    /// Replaces the notes; an empty string clears them
    #[serde(default)]
    pub notes: Option<String>,
}

/// Move a deal through the pipeline or edit its notes
#[utoipa::path(
    patch,
    path = "/api/deals/{id}",
    params(("id" = i32, Path, description = "Deal id")),
    request_body = UpdateDealRequest,
    responses(
        (status = 200, description = "Updated deal", body = deal::Model),
        (status = 400, description = "Nothing to update or unknown status"),
        (status = 404, description = "Deal not found")
    ),
    tag = "deals"
)]
#[tracing::instrument(skip(state, request))]
pub async fn update_deal(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ApiJson(request): ApiJson<UpdateDealRequest>,
) -> Result<Json<deal::Model>, AppError> {
    if request.status.is_none() && request.notes.is_none() {
        return Err(AppError::InvalidRequest("Nothing to update".to_string()));
    }
    let status = request
        .status
        .as_deref()
        .map(|raw| parse_category::<DealStatus>("status", raw))
        .transpose()?;

    let existing = find_deal(&state.db, id).await?;
    let mut active: deal::ActiveModel = existing.into();
    if let Some(status) = status {
        active.status = Set(status);
    }
    if let Some(notes) = request.notes {
        active.notes = Set(Some(notes).filter(|n| !n.trim().is_empty()));
    }
    active.updated_at = Set(Utc::now());

    let updated = active.update(&state.db).await?;
    tracing::info!(deal_id = id, status = ?updated.status, "deal updated");
    Ok(Json(updated))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DealAnalysis {
    pub deal: deal::Model,
    pub company: company::Model,
    pub thesis: investment_thesis::Model,
    /// Why the company fits the thesis
    pub match_reasons: Vec<String>,
}

/// A deal together with its company and thesis
#[utoipa::path(
    get,
    path = "/api/deals/{id}/analysis",
    params(("id" = i32, Path, description = "Deal id")),
    responses(
        (status = 200, description = "Deal analysis", body = DealAnalysis),
        (status = 404, description = "Deal not found")
    ),
    tag = "deals"
)]
#[tracing::instrument(skip(state))]
pub async fn deal_analysis(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DealAnalysis>, AppError> {
    let deal = find_deal(&state.db, id).await?;
    let company = find_company(&state.db, deal.company_id).await?;
    let thesis = find_thesis(&state.db, deal.thesis_id).await?;

    let criteria: ThesisCriteria = serde_json::from_value(thesis.criteria.clone()).unwrap_or_default();
    let match_reasons = score_company(state.embedder.as_ref(), &thesis.content, &criteria, &company).match_reasons;

    Ok(Json(DealAnalysis {
        deal,
        company,
        thesis,
        match_reasons,
    }))
}
