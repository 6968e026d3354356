use crate::application::catalog;
use crate::domain::value_objects::LoanId;
use axum::{Json, extract::State, http::StatusCode};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::{
    error::ApiError,
    extract::{ApiJson, ApiPath, ApiQuery},
    pagination::{PageQuery, PaginatedResponse},
    types::{LoanPatch, LoanRequest, LoanResponse},
};
use super::{AppState, today};

// 貸出レコードの直接操作。在庫数は変更しない（貸出・返却は lending を使う）

/// GET /loans - 貸出一覧（貸出日の新しい順）
pub async fn list_loans(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<Json<PaginatedResponse<LoanResponse>>, ApiError> {
    let params = query.resolve(&state.pagination)?;
    let paged = catalog::list_loans(&state.service_deps, params.request()).await?;

    Ok(Json(PaginatedResponse::build(params, paged, LoanResponse::from)?))
}

pub async fn get_loan(
    State(state): State<Arc<AppState>>,
    ApiPath(loan_id): ApiPath<Uuid>,
) -> Result<Json<LoanResponse>, ApiError> {
    let loan = catalog::get_loan(&state.service_deps, LoanId::from_uuid(loan_id)).await?;
    Ok(Json(loan.into()))
}

pub async fn create_loan(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<LoanRequest>,
) -> Result<(StatusCode, Json<LoanResponse>), ApiError> {
    let loan = catalog::create_loan(&state.service_deps, req.into(), today()).await?;
    Ok((StatusCode::CREATED, Json(loan.into())))
}

pub async fn replace_loan(
    State(state): State<Arc<AppState>>,
    ApiPath(loan_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<LoanRequest>,
) -> Result<Json<LoanResponse>, ApiError> {
    let loan_id = LoanId::from_uuid(loan_id);
    let loan = catalog::update_loan(&state.service_deps, loan_id, req.into(), today()).await?;
    Ok(Json(loan.into()))
}

pub async fn patch_loan(
    State(state): State<Arc<AppState>>,
    ApiPath(loan_id): ApiPath<Uuid>,
    ApiJson(patch): ApiJson<LoanPatch>,
) -> Result<Json<LoanResponse>, ApiError> {
    let loan_id = LoanId::from_uuid(loan_id);
    let current = catalog::get_loan(&state.service_deps, loan_id).await?;
    let loan =
        catalog::update_loan(&state.service_deps, loan_id, patch.apply(current), today()).await?;
    Ok(Json(loan.into()))
}

pub async fn delete_loan(
    State(state): State<Arc<AppState>>,
    ApiPath(loan_id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    catalog::delete_loan(&state.service_deps, LoanId::from_uuid(loan_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
