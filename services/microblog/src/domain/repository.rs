#![allow(async_fn_in_trait)]

use microblog_domain::id::{MicropostId, UserId};
use microblog_domain::pagination::PageRequest;

use crate::domain::types::{
    Micropost, MicropostSortBy, NewMicropost, NewRelationship, NewUser, Relationship, User,
};
use crate::error::MicroblogError;

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, MicroblogError>;

    /// Lookup by already-normalized (lowercase) email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, MicroblogError>;

    /// Users in id order.
    async fn list(&self, page: PageRequest) -> Result<Vec<User>, MicroblogError>;

    async fn create(&self, user: &NewUser) -> Result<User, MicroblogError>;

    /// Persist every mutable column of `user`.
    async fn update(&self, user: &User) -> Result<(), MicroblogError>;

    async fn update_remember_token(&self, id: UserId, digest: &str)
    -> Result<(), MicroblogError>;

    /// Delete the user together with its microposts and both directions of
    /// relationships. Returns `true` if the user row existed.
    async fn delete_cascade(&self, id: UserId) -> Result<bool, MicroblogError>;
}

/// Repository for microposts.
pub trait MicropostRepository: Send + Sync {
    async fn find_by_id(&self, id: MicropostId) -> Result<Option<Micropost>, MicroblogError>;

    async fn create(&self, micropost: &NewMicropost) -> Result<Micropost, MicroblogError>;

    /// Delete a micropost. Returns `true` if a row was deleted.
    async fn delete(&self, id: MicropostId) -> Result<bool, MicroblogError>;

    /// Posts authored by `user_id`.
    async fn list_by_user(
        &self,
        user_id: UserId,
        sort_by: MicropostSortBy,
        page: PageRequest,
    ) -> Result<Vec<Micropost>, MicroblogError>;

    async fn count_by_user(&self, user_id: UserId) -> Result<u64, MicroblogError>;

    /// Posts authored by `user_id` or by any user it follows, in one query.
    async fn from_users_followed_by(
        &self,
        user_id: UserId,
        sort_by: MicropostSortBy,
        page: PageRequest,
    ) -> Result<Vec<Micropost>, MicroblogError>;
}

/// Repository for follow edges.
pub trait RelationshipRepository: Send + Sync {
    async fn find(
        &self,
        follower_id: UserId,
        followed_id: UserId,
    ) -> Result<Option<Relationship>, MicroblogError>;

    async fn create(&self, relationship: &NewRelationship)
    -> Result<Relationship, MicroblogError>;

    /// Delete the edge. Returns `true` if a row was deleted.
    async fn delete(&self, relationship: &Relationship) -> Result<bool, MicroblogError>;

    /// Users that `user_id` follows, in follow order.
    async fn list_followed(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<Vec<User>, MicroblogError>;

    /// Users following `user_id`, in follow order.
    async fn list_followers(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<Vec<User>, MicroblogError>;
}
