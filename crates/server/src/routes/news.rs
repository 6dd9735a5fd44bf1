use axum::{
    extract::{rejection::{JsonRejection, PathRejection}, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{Map, Value};
use tracing::{debug, info};

use common::types::Envelope;
use models::news;
use service::news::validation::FieldErrors;

use crate::errors::ApiError;
use crate::state::ServerState;

pub const LISTED: &str = "Successfully retrieved all news data";
pub const CREATED: &str = "Successfully created new news entry";
pub const REPLACED: &str = "Successfully replaced news data";
pub const PATCHED: &str = "Successfully updated news data partially";
pub const DELETED: &str = "Successfully deleted news";
pub const CREATE_INVALID: &str = "Incomplete or invalid data";
pub const UPDATE_INVALID: &str = "Incomplete data. Provide complete data!";

type Body = Result<Json<Value>, JsonRejection>;
type IdParam = Result<Path<i32>, PathRejection>;
type NewsResponse = Result<Json<Envelope<news::Model>>, ApiError>;

/// Non-integer ids cannot name a row.
fn news_id(id: IdParam) -> Result<i32, ApiError> {
    id.map(|Path(id)| id).map_err(|e| {
        debug!(error = %e, "news id rejected");
        ApiError::not_found()
    })
}

fn object(body: Body) -> Option<Map<String, Value>> {
    match body {
        Ok(Json(Value::Object(map))) => Some(map),
        Ok(Json(other)) => {
            debug!(kind = json_kind(&other), "news body is not an object");
            None
        }
        Err(e) => {
            debug!(error = %e, "news body rejected");
            None
        }
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn malformed(message: &str) -> ApiError {
    ApiError::validation(message, FieldErrors::single("body", "The request body must be a JSON object.".into()))
}

#[utoipa::path(
    get, path = "/news", tag = "news",
    responses(
        (status = 200, description = "All stored news"),
        (status = 404, description = "No news stored yet")
    )
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Envelope<Vec<news::Model>>>, ApiError> {
    let items = state.news.list().await?;
    Ok(Json(Envelope::new(LISTED, items)))
}

#[utoipa::path(
    post, path = "/news", tag = "news",
    request_body = crate::openapi::NewsInputDoc,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Validation Error")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    body: Body,
) -> Result<(StatusCode, Json<Envelope<news::Model>>), ApiError> {
    let payload = object(body).ok_or_else(|| malformed(CREATE_INVALID))?;
    let created = state.news.create(&payload).await.map_err(|e| ApiError::from_service(e, CREATE_INVALID))?;
    info!(id = created.id, "news_create_ok");
    Ok((StatusCode::CREATED, Json(Envelope::new(CREATED, created))))
}

#[utoipa::path(
    put, path = "/news/{id}", tag = "news",
    params(("id" = i32, Path, description = "News ID")),
    request_body = crate::openapi::NewsInputDoc,
    responses(
        (status = 200, description = "Replaced"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn replace(State(state): State<ServerState>, id: IdParam, body: Body) -> NewsResponse {
    let id = news_id(id)?;
    let Some(payload) = object(body) else {
        // an unknown id wins over a bad body
        state.news.find(id).await.map_err(|e| ApiError::from_service(e, UPDATE_INVALID))?;
        return Err(malformed(UPDATE_INVALID));
    };
    let updated = state.news.replace(id, &payload).await.map_err(|e| ApiError::from_service(e, UPDATE_INVALID))?;
    Ok(Json(Envelope::new(REPLACED, updated)))
}

#[utoipa::path(
    patch, path = "/news/{id}", tag = "news",
    params(("id" = i32, Path, description = "News ID")),
    request_body = crate::openapi::NewsPatchDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn patch(State(state): State<ServerState>, id: IdParam, body: Body) -> NewsResponse {
    let id = news_id(id)?;
    let Some(payload) = object(body) else {
        state.news.find(id).await.map_err(|e| ApiError::from_service(e, UPDATE_INVALID))?;
        return Err(malformed(UPDATE_INVALID));
    };
    let updated = state.news.patch(id, &payload).await.map_err(|e| ApiError::from_service(e, UPDATE_INVALID))?;
    Ok(Json(Envelope::new(PATCHED, updated)))
}

#[utoipa::path(
    delete, path = "/news/{id}", tag = "news",
    params(("id" = i32, Path, description = "News ID")),
    responses(
        (status = 200, description = "Deleted; body holds the last stored values"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete(State(state): State<ServerState>, id: IdParam) -> NewsResponse {
    let id = news_id(id)?;
    let deleted = state.news.delete(id).await?;
    Ok(Json(Envelope::new(DELETED, deleted)))
}
