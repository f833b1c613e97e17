use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InvestmentTheses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InvestmentTheses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(InvestmentTheses::Title).string_len(200).not_null())
                    .col(ColumnDef::new(InvestmentTheses::Content).text().not_null())
                    .col(ColumnDef::new(InvestmentTheses::Criteria).json().not_null())
                    .col(ColumnDef::new(InvestmentTheses::AnalysisSummary).text().not_null())
                    .col(
                        ColumnDef::new(InvestmentTheses::SentimentScore)
                            .double()
                            .not_null()
                            .default(0.5),
                    )
                    .col(
                        ColumnDef::new(InvestmentTheses::ConfidenceScore)
                            .double()
                            .not_null()
                            .default(0.5),
                    )
                    .col(
                        ColumnDef::new(InvestmentTheses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(InvestmentTheses::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InvestmentTheses::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum InvestmentTheses {
    Table,
    Id,
    Title,
    Content,
    Criteria,
    AnalysisSummary,
    SentimentScore,
    ConfidenceScore,
    CreatedAt,
    UpdatedAt,
}
