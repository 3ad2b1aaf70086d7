use chrono::Utc;
use tracing::{debug, info};

use microblog_domain::id::{MicropostId, UserId};
use microblog_domain::pagination::PageRequest;
use microblog_domain::validation::ValidationErrors;

use crate::domain::repository::{MicropostRepository, UserRepository};
use crate::domain::types::{
    Micropost, MicropostSortBy, NewMicropost, validate_content, validate_user_ref,
};
use crate::error::MicroblogError;

async fn ensure_user_exists<U: UserRepository>(
    users: &U,
    user_id: UserId,
) -> Result<(), MicroblogError> {
    users
        .find_by_id(user_id)
        .await?
        .map(|_| ())
        .ok_or(MicroblogError::UserNotFound)
}

// ── CreateMicropost ──────────────────────────────────────────────────────────

pub struct CreateMicropostInput {
    pub user_id: UserId,
    pub content: String,
}

pub struct CreateMicropostUseCase<U: UserRepository, M: MicropostRepository> {
    pub users: U,
    pub microposts: M,
}

impl<U: UserRepository, M: MicropostRepository> CreateMicropostUseCase<U, M> {
    pub async fn execute(&self, input: CreateMicropostInput) -> Result<Micropost, MicroblogError> {
        let mut errors = ValidationErrors::new();
        validate_content(&input.content, &mut errors);
        validate_user_ref("user_id", input.user_id, &mut errors);
        errors.into_result()?;

        ensure_user_exists(&self.users, input.user_id).await?;

        let micropost = self
            .microposts
            .create(&NewMicropost {
                content: input.content,
                user_id: input.user_id,
                created_at: Utc::now(),
            })
            .await?;
        info!(user_id = %micropost.user_id, micropost_id = %micropost.id, "micropost created");
        Ok(micropost)
    }
}

// ── DeleteMicropost ──────────────────────────────────────────────────────────

pub struct DeleteMicropostUseCase<M: MicropostRepository> {
    pub microposts: M,
}

impl<M: MicropostRepository> DeleteMicropostUseCase<M> {
    /// Only the author may delete a post. Another user's post is reported as
    /// missing.
    pub async fn execute(
        &self,
        owner_id: UserId,
        micropost_id: MicropostId,
    ) -> Result<(), MicroblogError> {
        match self.microposts.find_by_id(micropost_id).await? {
            Some(micropost) if micropost.user_id == owner_id => {}
            _ => return Err(MicroblogError::MicropostNotFound),
        }
        if !self.microposts.delete(micropost_id).await? {
            return Err(MicroblogError::MicropostNotFound);
        }
        info!(user_id = %owner_id, micropost_id = %micropost_id, "micropost deleted");
        Ok(())
    }
}

// ── ListMicroposts ───────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct ListMicropostsOutput {
    pub microposts: Vec<Micropost>,
    /// Total posts by the user, across all pages.
    pub total: u64,
}

pub struct ListMicropostsUseCase<U: UserRepository, M: MicropostRepository> {
    pub users: U,
    pub microposts: M,
}

impl<U: UserRepository, M: MicropostRepository> ListMicropostsUseCase<U, M> {
    pub async fn execute(
        &self,
        user_id: UserId,
        sort_by: MicropostSortBy,
        page: PageRequest,
    ) -> Result<ListMicropostsOutput, MicroblogError> {
        ensure_user_exists(&self.users, user_id).await?;
        let microposts = self.microposts.list_by_user(user_id, sort_by, page).await?;
        let total = self.microposts.count_by_user(user_id).await?;
        Ok(ListMicropostsOutput { microposts, total })
    }
}

// ── Feed ─────────────────────────────────────────────────────────────────────

pub struct FeedUseCase<U: UserRepository, M: MicropostRepository> {
    pub users: U,
    pub microposts: M,
}

impl<U: UserRepository, M: MicropostRepository> FeedUseCase<U, M> {
    /// The user's own posts plus posts of everyone it follows.
    pub async fn execute(
        &self,
        user_id: UserId,
        sort_by: MicropostSortBy,
        page: PageRequest,
    ) -> Result<Vec<Micropost>, MicroblogError> {
        ensure_user_exists(&self.users, user_id).await?;
        let feed = self
            .microposts
            .from_users_followed_by(user_id, sort_by, page)
            .await?;
        debug!(user_id = %user_id, items = feed.len(), "feed loaded");
        Ok(feed)
    }
}
