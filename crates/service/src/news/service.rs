use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

use models::news;

use super::domain::{NewsInput, NewsPatch};
use super::repository::NewsRepository;
use super::validation::{self, FieldErrors, Presence, Rule, NEWS_RULES};
use crate::errors::ServiceError;

/// News resource business service independent of web framework.
///
/// Every operation is one request: existence check, validation, a single
/// repository write. No state is kept between calls.
pub struct NewsResourceService<R: NewsRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: NewsRepository + ?Sized> Clone for NewsResourceService<R> {
    fn clone(&self) -> Self { Self { repo: Arc::clone(&self.repo) } }
}

impl<R: NewsRepository + ?Sized> NewsResourceService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// All stored items; an empty store is `EmptyCollection`, not an empty list.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<news::Model>, ServiceError> {
        let items = self.repo.list_all().await?;
        if items.is_empty() {
            debug!("news_list_empty");
            return Err(ServiceError::empty("news"));
        }
        info!(count = items.len(), "news_listed");
        Ok(items)
    }

    /// Validate every field and insert.
    ///
    /// # Examples
    /// ```
    /// use service::news::{NewsResourceService, repository::memory::MemoryNewsRepository};
    /// use std::sync::Arc;
    /// let svc = NewsResourceService::new(Arc::new(MemoryNewsRepository::new()));
    /// let body = serde_json::json!({
    ///     "title": "A", "author": "B", "description": "C", "content": "D",
    ///     "url": "http://x.com/1", "url_image": "http://x.com/i.png",
    ///     "published_at": "2024-01-01", "category": "Tech"
    /// });
    /// let created = tokio_test::block_on(svc.create(body.as_object().unwrap())).unwrap();
    /// assert_eq!(created.id, 1);
    /// assert_eq!(created.category, "Tech");
    /// ```
    #[instrument(skip(self, payload))]
    pub async fn create(&self, payload: &Map<String, Value>) -> Result<news::Model, ServiceError> {
        let payload = &validation::trim_strings(payload);
        self.validate(payload, Presence::Always, None).await?;
        let input = NewsInput::from_payload(payload)
            .ok_or_else(|| ServiceError::ValidationFailed(FieldErrors::new()))?;
        let created = self.repo.insert(input).await?;
        info!(id = created.id, url = %created.url, "news_created");
        Ok(created)
    }

    /// Overwrite all eight fields; the item may keep its own `url`.
    #[instrument(skip(self, payload))]
    pub async fn replace(&self, id: i32, payload: &Map<String, Value>) -> Result<news::Model, ServiceError> {
        self.find(id).await?;
        let payload = &validation::trim_strings(payload);
        self.validate(payload, Presence::Always, Some(id)).await?;
        let input = NewsInput::from_payload(payload)
            .ok_or_else(|| ServiceError::ValidationFailed(FieldErrors::new()))?;
        let updated = self.repo.update(id, input.into()).await?.ok_or_else(|| ServiceError::not_found("news"))?;
        info!(id, "news_replaced");
        Ok(updated)
    }

    /// Merge the supplied recognized fields; other keys are ignored.
    #[instrument(skip(self, payload))]
    pub async fn patch(&self, id: i32, payload: &Map<String, Value>) -> Result<news::Model, ServiceError> {
        let current = self.find(id).await?;
        let payload = &validation::trim_strings(payload);
        self.validate(payload, Presence::Sometimes, Some(id)).await?;
        let patch = NewsPatch::from_payload(payload);
        if patch.is_empty() {
            debug!(id, "news_patch_noop");
            return Ok(current);
        }
        let updated = self.repo.update(id, patch).await?.ok_or_else(|| ServiceError::not_found("news"))?;
        info!(id, "news_patched");
        Ok(updated)
    }

    /// Hard delete; returns the last stored values.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<news::Model, ServiceError> {
        let current = self.find(id).await?;
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found("news"));
        }
        info!(id, url = %current.url, "news_deleted");
        Ok(current)
    }

    /// One stored item, or `NotFound`.
    pub async fn find(&self, id: i32) -> Result<news::Model, ServiceError> {
        self.repo.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found("news"))
    }

    /// Run the rule table, then resolve uniqueness against the store.
    async fn validate(&self, payload: &Map<String, Value>, presence: Presence, except_id: Option<i32>) -> Result<(), ServiceError> {
        let validation::Outcome { mut errors, unique_checks } = validation::validate(payload, NEWS_RULES, presence);
        for check in unique_checks {
            if self.repo.exists_with(check.field, &check.value, except_id).await? {
                errors.add(check.field, Rule::Unique.message(check.field));
            }
        }
        if errors.is_empty() {
            return Ok(());
        }
        debug!(fields = ?errors.fields().collect::<Vec<_>>(), "news_validation_failed");
        Err(ServiceError::ValidationFailed(errors))
    }
}
