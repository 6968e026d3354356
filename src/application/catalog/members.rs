use crate::application::loan::ServiceDependencies;
use crate::domain::{member::Member, value_objects::MemberId};
use crate::ports::{ActiveMemberView, PageRequest, Paged};
use chrono::NaiveDate;

use super::errors::{CatalogError, Result, storage_error};

/// 貸出中冊数ランキングの件数
pub const TOP_ACTIVE_LIMIT: u64 = 5;

const DUPLICATE_USERNAME: &str = "A user with that username already exists.";

/// 会員の入力値
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDraft {
    pub username: String,
    pub email: String,
}

impl From<Member> for MemberDraft {
    fn from(member: Member) -> Self {
        Self {
            username: member.username,
            email: member.email,
        }
    }
}

async fn ensure_unique_username(
    deps: &ServiceDependencies,
    username: &str,
    member_id: MemberId,
) -> Result<()> {
    let taken = deps
        .members
        .find_by_username(username)
        .await
        .map_err(CatalogError::Storage)?
        .is_some_and(|existing| existing.member_id != member_id);

    if taken {
        return Err(CatalogError::Invalid(DUPLICATE_USERNAME.to_string()));
    }
    Ok(())
}

pub async fn list_members(deps: &ServiceDependencies, page: PageRequest) -> Result<Paged<Member>> {
    deps.members.list(page).await.map_err(CatalogError::Storage)
}

pub async fn get_member(deps: &ServiceDependencies, member_id: MemberId) -> Result<Member> {
    deps.members
        .get(member_id)
        .await
        .map_err(CatalogError::Storage)?
        .ok_or(CatalogError::NotFound("Member"))
}

/// 会員を登録する。入会日は登録日になる。
pub async fn create_member(
    deps: &ServiceDependencies,
    draft: MemberDraft,
    today: NaiveDate,
) -> Result<Member> {
    let member_id = MemberId::new();
    ensure_unique_username(deps, &draft.username, member_id).await?;

    let member = Member {
        member_id,
        username: draft.username,
        email: draft.email,
        membership_date: today,
    };

    deps.members
        .insert(&member)
        .await
        .map_err(|e| storage_error(e, DUPLICATE_USERNAME))?;

    tracing::info!(member_id = %member.member_id, "member registered");
    Ok(member)
}

/// 会員情報を更新する。入会日は変更しない。
pub async fn update_member(
    deps: &ServiceDependencies,
    member_id: MemberId,
    draft: MemberDraft,
) -> Result<Member> {
    let current = get_member(deps, member_id).await?;
    ensure_unique_username(deps, &draft.username, member_id).await?;

    let member = Member {
        username: draft.username,
        email: draft.email,
        ..current
    };

    let updated = deps
        .members
        .update(&member)
        .await
        .map_err(|e| storage_error(e, DUPLICATE_USERNAME))?;

    if !updated {
        return Err(CatalogError::NotFound("Member"));
    }
    Ok(member)
}

pub async fn delete_member(deps: &ServiceDependencies, member_id: MemberId) -> Result<()> {
    let deleted = deps
        .members
        .delete(member_id)
        .await
        .map_err(CatalogError::Storage)?;

    if !deleted {
        return Err(CatalogError::NotFound("Member"));
    }

    tracing::info!(member_id = %member_id, "member deleted");
    Ok(())
}

/// 貸出中の冊数が多い会員（上位5名）
pub async fn top_active_members(deps: &ServiceDependencies) -> Result<Vec<ActiveMemberView>> {
    deps.members
        .top_active(TOP_ACTIVE_LIMIT)
        .await
        .map_err(CatalogError::Storage)
}
