use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Body for create and replace; every field is required.
#[derive(ToSchema)]
pub struct NewsInputDoc {
    pub title: String,
    pub author: String,
    pub description: String,
    pub content: String,
    /// Absolute URL, unique across all news
    pub url: String,
    /// Absolute URL
    pub url_image: String,
    /// `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` or RFC 3339
    pub published_at: String,
    pub category: String,
}

/// Body for patch; only the sent fields are validated and written.
#[derive(ToSchema)]
pub struct NewsPatchDoc {
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub url: Option<String>,
    pub url_image: Option<String>,
    pub published_at: Option<String>,
    pub category: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::news::list,
        crate::routes::news::create,
        crate::routes::news::replace,
        crate::routes::news::patch,
        crate::routes::news::delete,
    ),
    components(
        schemas(
            HealthResponse,
            NewsInputDoc,
            NewsPatchDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "news")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_news_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        assert!(paths.iter().any(|p| p.as_str() == "/news"));
        assert!(paths.iter().any(|p| p.as_str() == "/news/{id}"));
        assert!(paths.iter().any(|p| p.as_str() == "/health"));
    }
}
