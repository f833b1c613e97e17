use axum::{extract::State, Json};
use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, Iterable, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::entities::{company, deal, investment_thesis, DealStatus, FundingStage, Industry, RevenueRange};
use crate::error::AppError;
use crate::AppState;

const RECENT_DEALS: u64 = 5;
const TOP_COMPANIES: u64 = 5;
const RECENT_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatusCount {
    pub status: DealStatus,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IndustryCount {
    pub industry: Industry,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecentDeal {
    pub id: i32,
    pub title: String,
    pub company_name: Option<String>,
    pub status: DealStatus,
    pub match_score: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TopCompany {
    pub id: i32,
    pub name: String,
    pub industry: Industry,
    pub funding_stage: FundingStage,
    pub revenue_range: RevenueRange,
    pub similarity_score: f64,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct ThesisSummary {
    pub total_analyses: u64,
    /// Theses stored in the last 7 days
    pub recent_analyses: u64,
    pub avg_match_score: f64,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct DashboardStats {
    pub total_companies: u64,
    pub total_deals: u64,
    pub total_theses: u64,
    /// Only statuses with at least one deal
    pub deal_statuses: Vec<StatusCount>,
    /// Only industries with at least one active company
    pub industry_breakdown: Vec<IndustryCount>,
    pub recent_deals: Vec<RecentDeal>,
    pub top_companies: Vec<TopCompany>,
    pub thesis_summary: ThesisSummary,
}

/// Gathers the dashboard numbers; also feeds the chat replies.
pub async fn collect_stats(db: &DatabaseConnection) -> Result<DashboardStats, AppError> {
    let total_companies = company::Entity::find()
        .filter(company::Column::IsActive.eq(true))
        .count(db)
        .await?;
    let total_deals = deal::Entity::find().count(db).await?;
    let total_theses = investment_thesis::Entity::find().count(db).await?;

    let mut deal_statuses = Vec::new();
    for status in DealStatus::iter() {
        let count = deal::Entity::find()
            .filter(deal::Column::Status.eq(status))
            .count(db)
            .await?;
        if count > 0 {
            deal_statuses.push(StatusCount { status, count });
        }
    }

    let mut industry_breakdown = Vec::new();
    for industry in Industry::iter() {
        let count = company::Entity::find()
            .filter(company::Column::IsActive.eq(true))
            .filter(company::Column::Industry.eq(industry))
            .count(db)
            .await?;
        if count > 0 {
            industry_breakdown.push(IndustryCount { industry, count });
        }
    }

    let recent_deals = deal::Entity::find()
        .order_by_desc(deal::Column::CreatedAt)
        .order_by_desc(deal::Column::Id)
        .limit(RECENT_DEALS)
        .find_also_related(company::Entity)
        .all(db)
        .await?
        .into_iter()
        .map(|(deal, company)| RecentDeal {
            id: deal.id,
            title: deal.title,
            company_name: company.map(|c| c.name),
            status: deal.status,
            match_score: deal.match_score,
            created_at: deal.created_at,
        })
        .collect();

    let top_companies = company::Entity::find()
        .filter(company::Column::IsActive.eq(true))
        .order_by_desc(company::Column::SimilarityScore)
        .order_by_asc(company::Column::Id)
        .limit(TOP_COMPANIES)
        .all(db)
        .await?
        .into_iter()
        .map(|c| TopCompany {
            id: c.id,
            name: c.name,
            industry: c.industry,
            funding_stage: c.funding_stage,
            revenue_range: c.revenue_range,
            similarity_score: c.similarity_score,
        })
        .collect();

    let recent_analyses = investment_thesis::Entity::find()
        .filter(investment_thesis::Column::CreatedAt.gte(Utc::now() - Duration::days(RECENT_WINDOW_DAYS)))
        .count(db)
        .await?;

    let match_scores: Vec<f64> = deal::Entity::find()
        .select_only()
        .column(deal::Column::MatchScore)
        .into_tuple()
        .all(db)
        .await?;
    let avg_match_score = if match_scores.is_empty() {
        0.0
    } else {
        match_scores.iter().sum::<f64>() / match_scores.len() as f64
    };

    Ok(DashboardStats {
        total_companies,
        total_deals,
        total_theses,
        deal_statuses,
        industry_breakdown,
        recent_deals,
        top_companies,
        thesis_summary: ThesisSummary {
            total_analyses: total_theses,
            recent_analyses,
            avg_match_score,
        },
    })
}

/// Aggregate catalog, deal and thesis statistics
#[utoipa::path(
    get,
    path = "/api/dashboard-stats",
    responses(
        (status = 200, description = "Dashboard statistics", body = DashboardStats),
        (status = 500, description = "Failed to gather statistics")
    ),
    tag = "dashboard"
)]
#[tracing::instrument(skip(state))]
pub async fn dashboard_stats(State(state): State<AppState>) -> Result<Json<DashboardStats>, AppError> {
    Ok(Json(collect_stats(&state.db).await?))
}
