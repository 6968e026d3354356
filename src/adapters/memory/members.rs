use crate::domain::{member::Member, value_objects::MemberId};
use crate::ports::{ActiveMemberView, DuplicateKey, MemberRepository, PageRequest, Paged, Result};
use async_trait::async_trait;
use std::collections::HashMap;

use super::{InMemoryStore, paginate};

#[async_trait]
impl MemberRepository for InMemoryStore {
    async fn list(&self, page: PageRequest) -> Result<Paged<Member>> {
        let members = self.state()?.members.values().cloned().collect();
        Ok(paginate(members, page, |m: &Member| {
            (m.username.clone(), m.member_id)
        }))
    }

    async fn get(&self, member_id: MemberId) -> Result<Option<Member>> {
        Ok(self.state()?.members.get(&member_id).cloned())
    }

    async fn exists(&self, member_id: MemberId) -> Result<bool> {
        Ok(self.state()?.members.contains_key(&member_id))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Member>> {
        Ok(self
            .state()?
            .members
            .values()
            .find(|member| member.username == username)
            .cloned())
    }

    async fn insert(&self, member: &Member) -> Result<()> {
        let mut state = self.state()?;
        if state.members.values().any(|m| m.username == member.username) {
            return Err(Box::new(DuplicateKey { field: "username" }));
        }
        state.members.insert(member.member_id, member.clone());
        Ok(())
    }

    async fn update(&self, member: &Member) -> Result<bool> {
        let mut state = self.state()?;
        if state
            .members
            .values()
            .any(|m| m.username == member.username && m.member_id != member.member_id)
        {
            return Err(Box::new(DuplicateKey { field: "username" }));
        }
        match state.members.get_mut(&member.member_id) {
            Some(stored) => {
                *stored = member.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, member_id: MemberId) -> Result<bool> {
        let mut state = self.state()?;
        if state.members.remove(&member_id).is_none() {
            return Ok(false);
        }
        state.loans.retain(|_, loan| loan.member_id != member_id);
        Ok(true)
    }

    async fn top_active(&self, limit: u64) -> Result<Vec<ActiveMemberView>> {
        let state = self.state()?;

        let mut counts: HashMap<MemberId, u64> = HashMap::new();
        for loan in state.loans.values().filter(|loan| !loan.is_returned) {
            *counts.entry(loan.member_id).or_default() += 1;
        }

        let mut ranked: Vec<ActiveMemberView> = counts
            .into_iter()
            .filter_map(|(member_id, active_loans)| {
                state.members.get(&member_id).map(|member| ActiveMemberView {
                    member_id,
                    username: member.username.clone(),
                    email: member.email.clone(),
                    active_loans,
                })
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.active_loans
                .cmp(&a.active_loans)
                .then_with(|| a.username.cmp(&b.username))
        });
        ranked.truncate(limit as usize);
        Ok(ranked)
    }
}
