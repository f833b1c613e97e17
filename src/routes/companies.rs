use axum::{
    extract::{Path, Query, State},
    Json,
};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::{category_filter, PageInfo, PageQuery};
use crate::entities::{company, FundingStage, Industry, RevenueRange};
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CompanyQuery {
    /// Filter by industry, e.g. `fintech`
    #[param(required = false)]
    pub industry: Option<String>,
    /// Filter by funding stage, e.g. `series_a`
    #[param(required = false)]
    pub funding_stage: Option<String>,
    /// Filter by revenue range, e.g. `5_20m`
    #[param(required = false)]
    pub revenue_range: Option<String>,
    /// Substring match on name or description
    #[param(required = false)]
    pub q: Option<String>,
    #[param(required = false)]
    pub page: Option<u64>,
    #[param(required = false)]
    pub page_size: Option<u64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CompanyList {
    pub items: Vec<company::Model>,
    #[serde(flatten)]
    pub page_info: PageInfo,
}

/// List active companies in the catalog
#[utoipa::path(
    get,
    path = "/api/companies",
    params(CompanyQuery),
    responses(
        (status = 200, description = "One page of companies", body = CompanyList),
        (status = 400, description = "Unknown filter value or bad paging")
    ),
    tag = "companies"
)]
#[tracing::instrument(skip(state))]
pub async fn list_companies(
    State(state): State<AppState>,
    Query(query): Query<CompanyQuery>,
) -> Result<Json<CompanyList>, AppError> {
    let (page, page_size) = PageQuery {
        page: query.page,
        page_size: query.page_size,
    }
    .resolve()?;

    let mut condition = Condition::all().add(company::Column::IsActive.eq(true));
    if let Some(industry) = category_filter::<Industry>("industry", query.industry.as_deref())? {
        condition = condition.add(company::Column::Industry.eq(industry));
    }
    if let Some(stage) = category_filter::<FundingStage>("funding_stage", query.funding_stage.as_deref())? {
        condition = condition.add(company::Column::FundingStage.eq(stage));
    }
    if let Some(range) = category_filter::<RevenueRange>("revenue_range", query.revenue_range.as_deref())? {
        condition = condition.add(company::Column::RevenueRange.eq(range));
    }
    if let Some(q) = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        // LIKE is case-sensitive on Postgres, so compare lower-cased on both sides
        let pattern = format!("%{}%", q.to_lowercase());
        condition = condition.add(
            Condition::any()
                .add(Expr::expr(Func::lower(Expr::col(company::Column::Name))).like(pattern.clone()))
                .add(Expr::expr(Func::lower(Expr::col(company::Column::Description))).like(pattern)),
        );
    }

    let paginator = company::Entity::find()
        .filter(condition)
        .order_by_asc(company::Column::Name)
        .order_by_asc(company::Column::Id)
        .paginate(&state.db, page_size);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(page - 1).await?;

    Ok(Json(CompanyList {
        items,
        page_info: PageInfo::new(page, page_size, total),
    }))
}

/// Fetch one company
#[utoipa::path(
    get,
    path = "/api/companies/{id}",
    params(("id" = i32, Path, description = "Company id")),
    responses(
        (status = 200, description = "The company", body = company::Model),
        (status = 404, description = "Company not found")
    ),
    tag = "companies"
)]
#[tracing::instrument(skip(state))]
pub async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<company::Model>, AppError> {
    company::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Company not found".to_string()))
}
