use chrono::Utc;
use tracing::info;

use microblog_domain::id::UserId;
use microblog_domain::pagination::PageRequest;
use microblog_domain::validation::{ValidationErrors, Violation};

use crate::domain::repository::{RelationshipRepository, UserRepository};
use crate::domain::types::{NewRelationship, Relationship, User, validate_user_ref};
use crate::error::MicroblogError;

// ── Follow ───────────────────────────────────────────────────────────────────

pub struct FollowUseCase<U: UserRepository, R: RelationshipRepository> {
    pub users: U,
    pub relationships: R,
}

impl<U: UserRepository, R: RelationshipRepository> FollowUseCase<U, R> {
    /// Make `follower_id` follow `followed_id`.
    ///
    /// Following yourself is a validation error, and following twice is
    /// [`MicroblogError::AlreadyFollowing`].
    pub async fn execute(
        &self,
        follower_id: UserId,
        followed_id: UserId,
    ) -> Result<Relationship, MicroblogError> {
        let mut errors = ValidationErrors::new();
        validate_user_ref("follower_id", follower_id, &mut errors);
        validate_user_ref("followed_id", followed_id, &mut errors);
        if errors.is_empty() && follower_id == followed_id {
            errors.add("followed_id", Violation::Invalid);
        }
        errors.into_result()?;

        for id in [follower_id, followed_id] {
            if self.users.find_by_id(id).await?.is_none() {
                return Err(MicroblogError::UserNotFound);
            }
        }

        if self
            .relationships
            .find(follower_id, followed_id)
            .await?
            .is_some()
        {
            return Err(MicroblogError::AlreadyFollowing);
        }

        let relationship = self
            .relationships
            .create(&NewRelationship {
                follower_id,
                followed_id,
                created_at: Utc::now(),
            })
            .await?;
        info!(follower_id = %follower_id, followed_id = %followed_id, "followed");
        Ok(relationship)
    }
}

// ── Unfollow ─────────────────────────────────────────────────────────────────

pub struct UnfollowUseCase<R: RelationshipRepository> {
    pub relationships: R,
}

impl<R: RelationshipRepository> UnfollowUseCase<R> {
    pub async fn execute(
        &self,
        follower_id: UserId,
        followed_id: UserId,
    ) -> Result<(), MicroblogError> {
        let relationship = self
            .relationships
            .find(follower_id, followed_id)
            .await?
            .ok_or(MicroblogError::RelationshipNotFound)?;
        if !self.relationships.delete(&relationship).await? {
            return Err(MicroblogError::RelationshipNotFound);
        }
        info!(follower_id = %follower_id, followed_id = %followed_id, "unfollowed");
        Ok(())
    }
}

// ── IsFollowing ──────────────────────────────────────────────────────────────

pub struct IsFollowingUseCase<R: RelationshipRepository> {
    pub relationships: R,
}

impl<R: RelationshipRepository> IsFollowingUseCase<R> {
    pub async fn execute(
        &self,
        follower_id: UserId,
        followed_id: UserId,
    ) -> Result<bool, MicroblogError> {
        Ok(self
            .relationships
            .find(follower_id, followed_id)
            .await?
            .is_some())
    }
}

// ── ListFollowing / ListFollowers ────────────────────────────────────────────

pub struct ListFollowingUseCase<U: UserRepository, R: RelationshipRepository> {
    pub users: U,
    pub relationships: R,
}

impl<U: UserRepository, R: RelationshipRepository> ListFollowingUseCase<U, R> {
    pub async fn execute(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<Vec<User>, MicroblogError> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(MicroblogError::UserNotFound);
        }
        self.relationships.list_followed(user_id, page).await
    }
}

pub struct ListFollowersUseCase<U: UserRepository, R: RelationshipRepository> {
    pub users: U,
    pub relationships: R,
}

impl<U: UserRepository, R: RelationshipRepository> ListFollowersUseCase<U, R> {
    pub async fn execute(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<Vec<User>, MicroblogError> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(MicroblogError::UserNotFound);
        }
        self.relationships.list_followers(user_id, page).await
    }
}
