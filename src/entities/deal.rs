use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

use super::categories::{DealStatus, DealType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, ToSchema)]
#[sea_orm(table_name = "deals")]
#[schema(as = Deal)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = true)]
    pub id: i32,
    pub thesis_id: i32,
    pub company_id: i32,
    pub title: String,
    pub deal_type: DealType,
    pub status: DealStatus,
    /// Similarity between the thesis and the company, in [0, 1]
    pub match_score: f64,
    pub risk_score: f64,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::investment_thesis::Entity",
        from = "Column::ThesisId",
        to = "super::investment_thesis::Column::Id",
        on_delete = "Cascade"
    )]
    Thesis,
    #[sea_orm(
        belongs_to = "super::company::Entity",
        from = "Column::CompanyId",
        to = "super::company::Column::Id",
        on_delete = "Cascade"
    )]
    Company,
}

impl Related<super::investment_thesis::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Thesis.def()
    }
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
