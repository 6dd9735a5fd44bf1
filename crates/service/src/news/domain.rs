use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::validation::parse_date;

/// All eight business fields, as accepted by create and replace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsInput {
    pub title: String,
    pub author: String,
    pub description: String,
    pub content: String,
    pub url: String,
    pub url_image: String,
    /// As submitted; only parseable dates get this far.
    pub published_at: String,
    pub category: String,
}

/// Subset of business fields; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub url: Option<String>,
    pub url_image: Option<String>,
    pub published_at: Option<String>,
    pub category: Option<String>,
}

fn text(payload: &Map<String, Value>, key: &str) -> Option<String> {
    payload.get(key).and_then(Value::as_str).map(str::to_string)
}

fn date(payload: &Map<String, Value>, key: &str) -> Option<String> {
    text(payload, key).filter(|s| parse_date(s).is_some())
}

impl NewsPatch {
    /// Pick the recognized fields out of an already validated payload.
    pub fn from_payload(payload: &Map<String, Value>) -> Self {
        Self {
            title: text(payload, "title"),
            author: text(payload, "author"),
            description: text(payload, "description"),
            content: text(payload, "content"),
            url: text(payload, "url"),
            url_image: text(payload, "url_image"),
            published_at: date(payload, "published_at"),
            category: text(payload, "category"),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge onto a stored row.
    pub fn apply(self, current: &models::news::Model) -> NewsInput {
        NewsInput {
            title: self.title.unwrap_or_else(|| current.title.clone()),
            author: self.author.unwrap_or_else(|| current.author.clone()),
            description: self.description.unwrap_or_else(|| current.description.clone()),
            content: self.content.unwrap_or_else(|| current.content.clone()),
            url: self.url.unwrap_or_else(|| current.url.clone()),
            url_image: self.url_image.unwrap_or_else(|| current.url_image.clone()),
            published_at: self.published_at.unwrap_or_else(|| current.published_at.clone()),
            category: self.category.unwrap_or_else(|| current.category.clone()),
        }
    }
}

impl NewsInput {
    /// `None` when a field is missing, i.e. the payload was not validated with `Presence::Always`.
    pub fn from_payload(payload: &Map<String, Value>) -> Option<Self> {
        let p = NewsPatch::from_payload(payload);
        Some(Self {
            title: p.title?,
            author: p.author?,
            description: p.description?,
            content: p.content?,
            url: p.url?,
            url_image: p.url_image?,
            published_at: p.published_at?,
            category: p.category?,
        })
    }
}

impl From<NewsInput> for NewsPatch {
    fn from(i: NewsInput) -> Self {
        Self {
            title: Some(i.title),
            author: Some(i.author),
            description: Some(i.description),
            content: Some(i.content),
            url: Some(i.url),
            url_image: Some(i.url_image),
            published_at: Some(i.published_at),
            category: Some(i.category),
        }
    }
}
