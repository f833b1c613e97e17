use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Companies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Companies::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Companies::Name).string_len(200).not_null().unique_key())
                    .col(ColumnDef::new(Companies::Description).text().not_null())
                    .col(ColumnDef::new(Companies::Industry).string_len(20).not_null())
                    .col(ColumnDef::new(Companies::FundingStage).string_len(20).not_null())
                    .col(ColumnDef::new(Companies::RevenueRange).string_len(20).not_null())
                    .col(ColumnDef::new(Companies::Website).string().null())
                    .col(ColumnDef::new(Companies::FoundingYear).integer().null())
                    .col(ColumnDef::new(Companies::EmployeeCount).integer().null())
                    .col(ColumnDef::new(Companies::Headquarters).string_len(200).null())
                    .col(ColumnDef::new(Companies::TotalFunding).double().null()) // USD millions
                    .col(ColumnDef::new(Companies::EmbeddingVector).text().null()) // JSON array
                    .col(
                        ColumnDef::new(Companies::SimilarityScore)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Companies::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Companies::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Companies::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_companies_industry")
                    .table(Companies::Table)
                    .col(Companies::Industry)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Companies::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Companies {
    Table,
    Id,
    Name,
    Description,
    Industry,
    FundingStage,
    RevenueRange,
    Website,
    FoundingYear,
    EmployeeCount,
    Headquarters,
    TotalFunding,
    EmbeddingVector,
    SimilarityScore,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
