use async_trait::async_trait;

use models::news;

use super::domain::{NewsInput, NewsPatch};
use crate::errors::ServiceError;

/// Repository abstraction for news persistence.
///
/// Implementations must enforce `url` uniqueness themselves and report a
/// violation as `ServiceError::ValidationFailed` on the `url` field.
#[async_trait]
pub trait NewsRepository: Send + Sync {
    /// Every stored item in primary key order.
    async fn list_all(&self) -> Result<Vec<news::Model>, ServiceError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<news::Model>, ServiceError>;
    async fn insert(&self, input: NewsInput) -> Result<news::Model, ServiceError>;
    /// Writes only the `Some` fields. `Ok(None)` if the row is gone.
    async fn update(&self, id: i32, patch: NewsPatch) -> Result<Option<news::Model>, ServiceError>;
    /// Returns true if a row was removed.
    async fn delete(&self, id: i32) -> Result<bool, ServiceError>;
    /// Whether another row (not `except_id`) already holds `value` in column `field`.
    async fn exists_with(&self, field: &str, value: &str, except_id: Option<i32>) -> Result<bool, ServiceError>;
}

/// In-memory repository for tests and database-less runs
pub mod memory {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::{Mutex, MutexGuard, PoisonError};

    use chrono::Utc;

    use crate::news::validation::{FieldErrors, Rule};

    #[derive(Default)]
    struct Inner {
        last_id: i32,
        rows: BTreeMap<i32, news::Model>,
    }

    #[derive(Default)]
    pub struct MemoryNewsRepository {
        inner: Mutex<Inner>,
    }

    impl MemoryNewsRepository {
        pub fn new() -> Self { Self::default() }

        fn lock(&self) -> MutexGuard<'_, Inner> {
            self.inner.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    impl Inner {
        fn url_clash(&self, url: &str, except_id: Option<i32>) -> Result<(), ServiceError> {
            if self.rows.values().any(|m| m.url == url && Some(m.id) != except_id) {
                return Err(ServiceError::ValidationFailed(FieldErrors::single("url", Rule::Unique.message("url"))));
            }
            Ok(())
        }
    }

    fn column<'a>(m: &'a news::Model, field: &str) -> Option<&'a str> {
        Some(match field {
            "title" => m.title.as_str(),
            "author" => m.author.as_str(),
            "description" => m.description.as_str(),
            "content" => m.content.as_str(),
            "url" => m.url.as_str(),
            "url_image" => m.url_image.as_str(),
            "category" => m.category.as_str(),
            _ => return None,
        })
    }

    #[async_trait]
    impl NewsRepository for MemoryNewsRepository {
        async fn list_all(&self) -> Result<Vec<news::Model>, ServiceError> {
            Ok(self.lock().rows.values().cloned().collect())
        }

        async fn find_by_id(&self, id: i32) -> Result<Option<news::Model>, ServiceError> {
            Ok(self.lock().rows.get(&id).cloned())
        }

        async fn insert(&self, input: NewsInput) -> Result<news::Model, ServiceError> {
            let mut inner = self.lock();
            inner.url_clash(&input.url, None)?;
            // ids are never reused, even after deletes
            inner.last_id += 1;
            let now = Utc::now().into();
            let model = news::Model {
                id: inner.last_id,
                title: input.title,
                author: input.author,
                description: input.description,
                content: input.content,
                url: input.url,
                url_image: input.url_image,
                published_at: input.published_at,
                category: input.category,
                created_at: now,
                updated_at: now,
            };
            inner.rows.insert(model.id, model.clone());
            Ok(model)
        }

        async fn update(&self, id: i32, patch: NewsPatch) -> Result<Option<news::Model>, ServiceError> {
            let mut inner = self.lock();
            let Some(current) = inner.rows.get(&id).cloned() else { return Ok(None) };
            if let Some(url) = &patch.url {
                inner.url_clash(url, Some(id))?;
            }
            let merged = patch.apply(&current);
            let model = news::Model {
                title: merged.title,
                author: merged.author,
                description: merged.description,
                content: merged.content,
                url: merged.url,
                url_image: merged.url_image,
                published_at: merged.published_at,
                category: merged.category,
                updated_at: Utc::now().into(),
                ..current
            };
            inner.rows.insert(id, model.clone());
            Ok(Some(model))
        }

        async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
            Ok(self.lock().rows.remove(&id).is_some())
        }

        async fn exists_with(&self, field: &str, value: &str, except_id: Option<i32>) -> Result<bool, ServiceError> {
            let inner = self.lock();
            Ok(inner
                .rows
                .values()
                .any(|m| Some(m.id) != except_id && column(m, field) == Some(value)))
        }
    }

}
