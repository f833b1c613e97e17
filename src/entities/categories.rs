//! Fixed vocabularies shared by the catalog, the extractor and the deal pipeline.
//!
//! Every enum is stored as a short string column and serialized with the same
//! string, so `"ai_ml"` means the same thing in SQL, JSON and query strings.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum Industry {
    #[sea_orm(string_value = "software")]
    #[serde(rename = "software")]
    Software,
    #[sea_orm(string_value = "fintech")]
    #[serde(rename = "fintech")]
    Fintech,
    #[sea_orm(string_value = "healthcare")]
    #[serde(rename = "healthcare")]
    Healthcare,
    #[sea_orm(string_value = "energy")]
    #[serde(rename = "energy")]
    Energy,
    #[sea_orm(string_value = "education")]
    #[serde(rename = "education")]
    Education,
    #[sea_orm(string_value = "retail")]
    #[serde(rename = "retail")]
    Retail,
    #[sea_orm(string_value = "logistics")]
    #[serde(rename = "logistics")]
    Logistics,
    #[sea_orm(string_value = "cybersecurity")]
    #[serde(rename = "cybersecurity")]
    Cybersecurity,
    #[sea_orm(string_value = "ai_ml")]
    #[serde(rename = "ai_ml")]
    AiMl,
    #[sea_orm(string_value = "other")]
    #[serde(rename = "other")]
    Other,
}

impl Industry {
    pub fn label(&self) -> &'static str {
        match self {
            Industry::Software => "Software",
            Industry::Fintech => "FinTech",
            Industry::Healthcare => "Healthcare",
            Industry::Energy => "Energy",
            Industry::Education => "Education",
            Industry::Retail => "Retail",
            Industry::Logistics => "Logistics",
            Industry::Cybersecurity => "Cybersecurity",
            Industry::AiMl => "AI/ML",
            Industry::Other => "Other",
        }
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum FundingStage {
    #[sea_orm(string_value = "seed")]
    #[serde(rename = "seed")]
    Seed,
    #[sea_orm(string_value = "series_a")]
    #[serde(rename = "series_a")]
    SeriesA,
    #[sea_orm(string_value = "series_b")]
    #[serde(rename = "series_b")]
    SeriesB,
    #[sea_orm(string_value = "series_c")]
    #[serde(rename = "series_c")]
    SeriesC,
    #[sea_orm(string_value = "series_d")]
    #[serde(rename = "series_d")]
    SeriesD,
    #[sea_orm(string_value = "ipo")]
    #[serde(rename = "ipo")]
    Ipo,
    #[sea_orm(string_value = "public")]
    #[serde(rename = "public")]
    Public,
    #[sea_orm(string_value = "private")]
    #[serde(rename = "private")]
    Private,
}

impl FundingStage {
    pub fn label(&self) -> &'static str {
        match self {
            FundingStage::Seed => "Seed",
            FundingStage::SeriesA => "Series A",
            FundingStage::SeriesB => "Series B",
            FundingStage::SeriesC => "Series C",
            FundingStage::SeriesD => "Series D",
            FundingStage::Ipo => "IPO",
            FundingStage::Public => "Public",
            FundingStage::Private => "Private",
        }
    }

    /// Maps the letter of a "Series X" round to its stage.
    pub fn from_series_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_lowercase() {
            'a' => Some(FundingStage::SeriesA),
            'b' => Some(FundingStage::SeriesB),
            'c' => Some(FundingStage::SeriesC),
            'd' => Some(FundingStage::SeriesD),
            _ => None,
        }
    }

    pub fn is_early(&self) -> bool {
        matches!(self, FundingStage::Seed | FundingStage::SeriesA)
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum RevenueRange {
    #[sea_orm(string_value = "under_1m")]
    #[serde(rename = "under_1m")]
    Under1M,
    #[sea_orm(string_value = "1_5m")]
    #[serde(rename = "1_5m")]
    From1To5M,
    #[sea_orm(string_value = "5_20m")]
    #[serde(rename = "5_20m")]
    From5To20M,
    #[sea_orm(string_value = "20_100m")]
    #[serde(rename = "20_100m")]
    From20To100M,
    #[sea_orm(string_value = "100m_plus")]
    #[serde(rename = "100m_plus")]
    Over100M,
}

impl RevenueRange {
    pub fn label(&self) -> &'static str {
        match self {
            RevenueRange::Under1M => "Under $1M",
            RevenueRange::From1To5M => "$1M - $5M",
            RevenueRange::From5To20M => "$5M - $20M",
            RevenueRange::From20To100M => "$20M - $100M",
            RevenueRange::Over100M => "$100M+",
        }
    }

    /// Bucket bounds in USD millions, lower inclusive, upper exclusive.
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            RevenueRange::Under1M => (0.0, 1.0),
            RevenueRange::From1To5M => (1.0, 5.0),
            RevenueRange::From5To20M => (5.0, 20.0),
            RevenueRange::From20To100M => (20.0, 100.0),
            RevenueRange::Over100M => (100.0, f64::INFINITY),
        }
    }
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum DealStatus {
    #[default]
    #[sea_orm(string_value = "prospecting")]
    #[serde(rename = "prospecting")]
    Prospecting,
    #[sea_orm(string_value = "qualification")]
    #[serde(rename = "qualification")]
    Qualification,
    #[sea_orm(string_value = "proposal")]
    #[serde(rename = "proposal")]
    Proposal,
    #[sea_orm(string_value = "negotiation")]
    #[serde(rename = "negotiation")]
    Negotiation,
    #[sea_orm(string_value = "due_diligence")]
    #[serde(rename = "due_diligence")]
    DueDiligence,
    #[sea_orm(string_value = "closed_won")]
    #[serde(rename = "closed_won")]
    ClosedWon,
    #[sea_orm(string_value = "closed_lost")]
    #[serde(rename = "closed_lost")]
    ClosedLost,
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum DealType {
    #[default]
    #[sea_orm(string_value = "equity")]
    #[serde(rename = "equity")]
    Equity,
    #[sea_orm(string_value = "debt")]
    #[serde(rename = "debt")]
    Debt,
    #[sea_orm(string_value = "acquisition")]
    #[serde(rename = "acquisition")]
    Acquisition,
    #[sea_orm(string_value = "merger")]
    #[serde(rename = "merger")]
    Merger,
    #[sea_orm(string_value = "partnership")]
    #[serde(rename = "partnership")]
    Partnership,
}

/// Parses a stored/query-string value into one of the category enums.
///
/// Unknown values become `AppError::InvalidRequest` naming the field.
pub fn parse_category<E>(field: &str, raw: &str) -> Result<E, AppError>
where
    E: ActiveEnum<Value = String>,
{
    E::try_from_value(&raw.trim().to_lowercase())
        .map_err(|_| AppError::InvalidRequest(format!("unknown {}: '{}'", field, raw)))
}
