use crate::application::catalog;
use crate::domain::value_objects::AuthorId;
use axum::{Json, extract::State, http::StatusCode};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::api::{
    error::ApiError,
    extract::{ApiJson, ApiPath, ApiQuery},
    pagination::{PageQuery, PaginatedResponse},
    types::{AuthorPatch, AuthorRequest, AuthorResponse},
};
use super::AppState;

pub async fn list_authors(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<Json<PaginatedResponse<AuthorResponse>>, ApiError> {
    let params = query.resolve(&state.pagination)?;
    let paged = catalog::list_authors(&state.service_deps, params.request()).await?;

    Ok(Json(PaginatedResponse::build(params, paged, AuthorResponse::from)?))
}

pub async fn get_author(
    State(state): State<Arc<AppState>>,
    ApiPath(author_id): ApiPath<Uuid>,
) -> Result<Json<AuthorResponse>, ApiError> {
    let author = catalog::get_author(&state.service_deps, AuthorId::from_uuid(author_id)).await?;
    Ok(Json(author.into()))
}

pub async fn create_author(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<AuthorRequest>,
) -> Result<(StatusCode, Json<AuthorResponse>), ApiError> {
    req.validate()?;
    let author = catalog::create_author(&state.service_deps, req.into()).await?;
    Ok((StatusCode::CREATED, Json(author.into())))
}

pub async fn replace_author(
    State(state): State<Arc<AppState>>,
    ApiPath(author_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<AuthorRequest>,
) -> Result<Json<AuthorResponse>, ApiError> {
    req.validate()?;
    let author_id = AuthorId::from_uuid(author_id);
    let author = catalog::update_author(&state.service_deps, author_id, req.into()).await?;
    Ok(Json(author.into()))
}

pub async fn patch_author(
    State(state): State<Arc<AppState>>,
    ApiPath(author_id): ApiPath<Uuid>,
    ApiJson(patch): ApiJson<AuthorPatch>,
) -> Result<Json<AuthorResponse>, ApiError> {
    patch.validate()?;
    let author_id = AuthorId::from_uuid(author_id);
    let current = catalog::get_author(&state.service_deps, author_id).await?;
    let author =
        catalog::update_author(&state.service_deps, author_id, patch.apply(current)).await?;
    Ok(Json(author.into()))
}

/// DELETE /authors/:id - 著者の書籍と貸出も削除される
pub async fn delete_author(
    State(state): State<Arc<AppState>>,
    ApiPath(author_id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    catalog::delete_author(&state.service_deps, AuthorId::from_uuid(author_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
