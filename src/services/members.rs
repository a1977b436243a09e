//! Member management service

use crate::{
    error::{AppError, AppResult},
    models::member::{CreateMember, Member, MemberQuery, UpdateMember},
    repository::Repository,
};

#[derive(Clone)]
pub struct MembersService {
    repository: Repository,
}

impl MembersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List members with pagination
    pub async fn search_members(&self, query: &MemberQuery) -> AppResult<(Vec<Member>, i64)> {
        self.repository.members.search(query).await
    }

    /// Get member by ID
    pub async fn get_member(&self, id: i64) -> AppResult<Member> {
        self.repository.members.get_by_id(id).await
    }

    /// Register a new member
    pub async fn create_member(&self, member: CreateMember) -> AppResult<Member> {
        if self
            .repository
            .members
            .email_exists(&member.email, None)
            .await?
        {
            return Err(AppError::Conflict(format!(
                "A member with email {} already exists",
                member.email
            )));
        }

        let created = self.repository.members.create(&member).await?;
        tracing::info!(member_id = created.id, "member created");
        Ok(created)
    }

    /// Update an existing member
    pub async fn update_member(&self, id: i64, member: UpdateMember) -> AppResult<Member> {
        // Verify member exists
        self.repository.members.get_by_id(id).await?;

        if let Some(ref email) = member.email {
            if self.repository.members.email_exists(email, Some(id)).await? {
                return Err(AppError::Conflict(format!(
                    "A member with email {} already exists",
                    email
                )));
            }
        }

        self.repository.members.update(id, &member).await
    }

    /// Delete a member. Refused while the member still holds borrowed copies.
    pub async fn delete_member(&self, id: i64) -> AppResult<()> {
        self.repository.members.get_by_id(id).await?;

        let active = self
            .repository
            .borrowings
            .count_active_for_member(id)
            .await?;
        if active > 0 {
            return Err(AppError::Conflict(format!(
                "Member has {} unreturned borrowing(s)",
                active
            )));
        }

        self.repository.members.delete(id).await?;
        tracing::info!(member_id = id, "member deleted");
        Ok(())
    }
}
