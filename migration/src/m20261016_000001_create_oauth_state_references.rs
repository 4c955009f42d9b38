use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One row per in-flight login. Rows are deleted when the provider callback consumes
        // them; abandoned rows are left for operational tooling to reap.
        manager
            .create_table(
                Table::create()
                    .table(OauthStateReferences::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OauthStateReferences::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(OauthStateReferences::Referrer)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OauthStateReferences::CreatedAt)
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
                    .if_not_exists()
                    .name("idx_oauth_state_references_created_at")
                    .table(OauthStateReferences::Table)
                    .col(OauthStateReferences::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(OauthStateReferences::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum OauthStateReferences {
    Table,
    Id,
    Referrer,
    CreatedAt,
}
