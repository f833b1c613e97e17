use sea_orm_migration::prelude::*;

use super::m20250601_000001_create_companies_table::Companies;
use super::m20250601_000002_create_investment_theses_table::InvestmentTheses;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Deals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Deals::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Deals::ThesisId).integer().not_null())
                    .col(ColumnDef::new(Deals::CompanyId).integer().not_null())
                    .col(ColumnDef::new(Deals::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Deals::DealType).string_len(20).not_null())
                    .col(ColumnDef::new(Deals::Status).string_len(20).not_null())
                    .col(ColumnDef::new(Deals::MatchScore).double().not_null().default(0.0))
                    .col(ColumnDef::new(Deals::RiskScore).double().not_null().default(0.5))
                    .col(ColumnDef::new(Deals::Notes).text().null())
                    .col(
                        ColumnDef::new(Deals::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Deals::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deals_thesis")
                            .from(Deals::Table, Deals::ThesisId)
                            .to(InvestmentTheses::Table, InvestmentTheses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deals_company")
                            .from(Deals::Table, Deals::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Deals::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Deals {
    Table,
    Id,
    ThesisId,
    CompanyId,
    Title,
    DealType,
    Status,
    MatchScore,
    RiskScore,
    Notes,
    CreatedAt,
    UpdatedAt,
}
