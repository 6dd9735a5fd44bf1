use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_news::News;

const NEWS_URL_UNIQUE_INDEX: &str = "uniq_news_url";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // News: unique url, enforced by the database rather than a pre-check
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name(NEWS_URL_UNIQUE_INDEX)
                    .table(News::Table)
                    .col(News::Url)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name(NEWS_URL_UNIQUE_INDEX).table(News::Table).to_owned())
            .await
    }
}
