//! Create `news` table.
//!
//! One row per article; `url` uniqueness lives in the index migration.
use sea_orm_migration::{prelude::*, schema::*};

/// Width of the `url` and `url_image` columns.
const URL_MAX_LEN: u32 = 2048;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(News::Table)
                    .if_not_exists()
                    .col(pk_auto(News::Id))
                    .col(string(News::Title))
                    .col(string(News::Author))
                    .col(text(News::Description))
                    .col(text(News::Content))
                    .col(string_len(News::Url, URL_MAX_LEN))
                    .col(string_len(News::UrlImage, URL_MAX_LEN))
                    // kept as submitted; the service only accepts parseable dates
                    .col(string(News::PublishedAt))
                    .col(string(News::Category))
                    .col(timestamp_with_time_zone(News::CreatedAt))
                    .col(timestamp_with_time_zone(News::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(News::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub(crate) enum News {
    Table,
    Id,
    Title,
    Author,
    Description,
    Content,
    Url,
    UrlImage,
    PublishedAt,
    Category,
    CreatedAt,
    UpdatedAt,
}
