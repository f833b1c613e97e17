use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

use super::categories::{FundingStage, Industry, RevenueRange};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, ToSchema)]
#[sea_orm(table_name = "companies")]
#[schema(as = Company)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = true)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub industry: Industry,
    pub funding_stage: FundingStage,
    pub revenue_range: RevenueRange,
    pub website: Option<String>,
    pub founding_year: Option<i32>,
    pub employee_count: Option<i32>,
    pub headquarters: Option<String>,
    pub total_funding: Option<f64>, // USD millions
    // JSON array of f32, written by the embedding refresh
    #[sea_orm(column_type = "Text", nullable)]
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub embedding_vector: Option<String>,
    pub similarity_score: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::deal::Entity")]
    Deals,
}

impl Related<super::deal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Deals.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Text used for embeddings and keyword similarity.
    pub fn profile_text(&self) -> String {
        format!(
            "{} {} {} {}",
            self.name,
            self.description,
            self.industry.label(),
            self.funding_stage.label()
        )
    }

    pub fn embedding(&self) -> Option<Vec<f32>> {
        self.embedding_vector
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
    }
}
