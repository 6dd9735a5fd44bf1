use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};
use tracing::warn;

use models::news::{self, Entity as NewsEntity};

use crate::errors::ServiceError;
use crate::news::domain::{NewsInput, NewsPatch};
use crate::news::repository::NewsRepository;
use crate::news::validation::{FieldErrors, Rule};

/// SeaORM-backed repository; uniqueness comes from the `uniq_news_url` index.
pub struct SeaOrmNewsRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmNewsRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

/// Unique violations become field errors; the rest stay opaque.
fn map_write_err(e: DbErr) -> ServiceError {
    if let Some(SqlErr::UniqueConstraintViolation(detail)) = e.sql_err() {
        warn!(%detail, "news url unique constraint rejected write");
        return ServiceError::ValidationFailed(FieldErrors::single("url", Rule::Unique.message("url")));
    }
    ServiceError::Db(e.to_string())
}

#[async_trait]
impl NewsRepository for SeaOrmNewsRepository {
    async fn list_all(&self) -> Result<Vec<news::Model>, ServiceError> {
        NewsEntity::find()
            .order_by_asc(news::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<news::Model>, ServiceError> {
        NewsEntity::find_by_id(id).one(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn insert(&self, input: NewsInput) -> Result<news::Model, ServiceError> {
        let now = Utc::now().into();
        let am = news::ActiveModel {
            title: Set(input.title),
            author: Set(input.author),
            description: Set(input.description),
            content: Set(input.content),
            url: Set(input.url),
            url_image: Set(input.url_image),
            published_at: Set(input.published_at),
            category: Set(input.category),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        am.insert(&self.db).await.map_err(map_write_err)
    }

    async fn update(&self, id: i32, patch: NewsPatch) -> Result<Option<news::Model>, ServiceError> {
        let current = NewsEntity::find_by_id(id).one(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
        let Some(existing) = current else { return Ok(None) };
        let mut am: news::ActiveModel = existing.into();
        if let Some(v) = patch.title { am.title = Set(v); }
        if let Some(v) = patch.author { am.author = Set(v); }
        if let Some(v) = patch.description { am.description = Set(v); }
        if let Some(v) = patch.content { am.content = Set(v); }
        if let Some(v) = patch.url { am.url = Set(v); }
        if let Some(v) = patch.url_image { am.url_image = Set(v); }
        if let Some(v) = patch.published_at { am.published_at = Set(v); }
        if let Some(v) = patch.category { am.category = Set(v); }
        am.updated_at = Set(Utc::now().into());
        match am.update(&self.db).await {
            Ok(updated) => Ok(Some(updated)),
            // deleted between the read and the write
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(map_write_err(e)),
        }
    }

    async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        let res = NewsEntity::delete_by_id(id).exec(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(res.rows_affected > 0)
    }

    async fn exists_with(&self, field: &str, value: &str, except_id: Option<i32>) -> Result<bool, ServiceError> {
        let column = news::Column::from_str(field).map_err(|e| ServiceError::Db(format!("{e:?}")))?;
        let mut finder = NewsEntity::find().filter(column.eq(value));
        if let Some(id) = except_id { finder = finder.filter(news::Column::Id.ne(id)); }
        let n = finder.count(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(n > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use uuid::Uuid;

    fn input(url: &str) -> NewsInput {
        NewsInput {
            title: "Grid penalties explained".into(),
            author: "Ana".into(),
            description: "Why ten places".into(),
            content: "Long form".into(),
            url: url.into(),
            url_image: "https://img.example.com/grid.png".into(),
            published_at: "2024-03-02T09:30:00+01:00".into(),
            category: "Sport".into(),
        }
    }

    #[tokio::test]
    async fn news_crud_repository() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() { return Ok(()); }
        let repo = SeaOrmNewsRepository::new(get_db().await?);

        let url = format!("https://news.example.com/{}", Uuid::new_v4());
        let a = repo.insert(input(&url)).await?;
        assert_eq!(repo.find_by_id(a.id).await?.map(|m| m.url), Some(url.clone()));
        assert!(repo.exists_with("url", &url, None).await?);
        assert!(!repo.exists_with("url", &url, Some(a.id)).await?);

        let patched = repo.update(a.id, NewsPatch { category: Some("Tech".into()), ..Default::default() }).await?.unwrap();
        assert_eq!(patched.category, "Tech");
        assert_eq!(patched.title, a.title);
        assert_eq!(patched.created_at, a.created_at);
        assert_eq!(patched.published_at, "2024-03-02T09:30:00+01:00");

        let dup = repo.insert(input(&url)).await;
        assert!(matches!(dup, Err(ServiceError::ValidationFailed(ref e)) if e.contains("url")));

        assert!(repo.list_all().await?.iter().any(|m| m.id == a.id));
        assert!(repo.delete(a.id).await?);
        assert!(!repo.delete(a.id).await?);
        assert!(repo.update(a.id, NewsPatch::default()).await?.is_none());
        Ok(())
    }
}
