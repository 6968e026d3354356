use crate::application::catalog;
use crate::domain::value_objects::BookId;
use axum::{Json, extract::State, http::StatusCode};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::api::{
    error::ApiError,
    extract::{ApiJson, ApiPath, ApiQuery},
    pagination::{PageQuery, PaginatedResponse},
    types::{BookPatch, BookRequest, BookResponse},
};
use super::AppState;

/// GET /books - 書籍一覧（タイトル順、著者名付き）
pub async fn list_books(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<Json<PaginatedResponse<BookResponse>>, ApiError> {
    let params = query.resolve(&state.pagination)?;
    let paged = catalog::list_books(&state.service_deps, params.request()).await?;

    Ok(Json(PaginatedResponse::build(params, paged, BookResponse::from)?))
}

pub async fn get_book(
    State(state): State<Arc<AppState>>,
    ApiPath(book_id): ApiPath<Uuid>,
) -> Result<Json<BookResponse>, ApiError> {
    let book = catalog::get_book(&state.service_deps, BookId::from_uuid(book_id)).await?;
    Ok(Json(book.into()))
}

pub async fn create_book(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<BookRequest>,
) -> Result<(StatusCode, Json<BookResponse>), ApiError> {
    req.validate()?;
    let book = catalog::create_book(&state.service_deps, req.into()).await?;
    Ok((StatusCode::CREATED, Json(book.into())))
}

pub async fn replace_book(
    State(state): State<Arc<AppState>>,
    ApiPath(book_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<BookRequest>,
) -> Result<Json<BookResponse>, ApiError> {
    req.validate()?;
    let book_id = BookId::from_uuid(book_id);
    let book = catalog::update_book(&state.service_deps, book_id, req.into()).await?;
    Ok(Json(book.into()))
}

pub async fn patch_book(
    State(state): State<Arc<AppState>>,
    ApiPath(book_id): ApiPath<Uuid>,
    ApiJson(patch): ApiJson<BookPatch>,
) -> Result<Json<BookResponse>, ApiError> {
    patch.validate()?;
    let book_id = BookId::from_uuid(book_id);
    let current = catalog::get_book(&state.service_deps, book_id).await?;
    let book = catalog::update_book(&state.service_deps, book_id, patch.apply(current)).await?;
    Ok(Json(book.into()))
}

pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    ApiPath(book_id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    catalog::delete_book(&state.service_deps, BookId::from_uuid(book_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
