use crate::application::catalog;
use crate::domain::value_objects::MemberId;
use axum::{Json, extract::State, http::StatusCode};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::api::{
    error::ApiError,
    extract::{ApiJson, ApiPath, ApiQuery},
    pagination::{PageQuery, PaginatedResponse},
    types::{MemberPatch, MemberRequest, MemberResponse, TopActiveMemberResponse},
};
use super::{AppState, today};

pub async fn list_members(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<Json<PaginatedResponse<MemberResponse>>, ApiError> {
    let params = query.resolve(&state.pagination)?;
    let paged = catalog::list_members(&state.service_deps, params.request()).await?;

    Ok(Json(PaginatedResponse::build(params, paged, MemberResponse::from)?))
}

pub async fn get_member(
    State(state): State<Arc<AppState>>,
    ApiPath(member_id): ApiPath<Uuid>,
) -> Result<Json<MemberResponse>, ApiError> {
    let member = catalog::get_member(&state.service_deps, MemberId::from_uuid(member_id)).await?;
    Ok(Json(member.into()))
}

/// POST /members - 会員を登録する（入会日は登録日）
pub async fn create_member(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<MemberRequest>,
) -> Result<(StatusCode, Json<MemberResponse>), ApiError> {
    req.validate()?;
    let member = catalog::create_member(&state.service_deps, req.into(), today()).await?;
    Ok((StatusCode::CREATED, Json(member.into())))
}

pub async fn replace_member(
    State(state): State<Arc<AppState>>,
    ApiPath(member_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<MemberRequest>,
) -> Result<Json<MemberResponse>, ApiError> {
    req.validate()?;
    let member_id = MemberId::from_uuid(member_id);
    let member = catalog::update_member(&state.service_deps, member_id, req.into()).await?;
    Ok(Json(member.into()))
}

pub async fn patch_member(
    State(state): State<Arc<AppState>>,
    ApiPath(member_id): ApiPath<Uuid>,
    ApiJson(patch): ApiJson<MemberPatch>,
) -> Result<Json<MemberResponse>, ApiError> {
    patch.validate()?;
    let member_id = MemberId::from_uuid(member_id);
    let current = catalog::get_member(&state.service_deps, member_id).await?;
    let member =
        catalog::update_member(&state.service_deps, member_id, patch.apply(current)).await?;
    Ok(Json(member.into()))
}

pub async fn delete_member(
    State(state): State<Arc<AppState>>,
    ApiPath(member_id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    catalog::delete_member(&state.service_deps, MemberId::from_uuid(member_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /members/top-active - 貸出中の冊数が多い会員（最大5名）
pub async fn top_active_members(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TopActiveMemberResponse>>, ApiError> {
    let members = catalog::top_active_members(&state.service_deps).await?;
    Ok(Json(
        members
            .into_iter()
            .map(TopActiveMemberResponse::from)
            .collect(),
    ))
}
