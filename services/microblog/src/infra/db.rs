use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    Select, SqlErr, TransactionTrait,
    sea_query::{Expr, Query, SelectStatement},
};

use microblog_core::sea_ext::WithPage;
use microblog_domain::id::{MicropostId, RelationshipId, UserId};
use microblog_domain::pagination::{PageRequest, Sort};
use microblog_schema::{microposts, relationships, users};

use crate::domain::repository::{MicropostRepository, RelationshipRepository, UserRepository};
use crate::domain::types::{
    Micropost, MicropostSortBy, NewMicropost, NewRelationship, NewUser, Relationship, User,
};
use crate::error::MicroblogError;

/// Map a failed write. Unique and foreign-key violations become
/// [`MicroblogError::Constraint`]; anything else is internal.
fn write_error(err: DbErr, what: &'static str) -> MicroblogError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail))
        | Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
            tracing::debug!(what, detail = %detail, "constraint violation");
            MicroblogError::Constraint(detail)
        }
        _ => MicroblogError::internal(err, what),
    }
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, MicroblogError> {
        let model = users::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| MicroblogError::internal(e, "find user by id"))?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, MicroblogError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| MicroblogError::internal(e, "find user by email"))?;
        Ok(model.map(user_from_model))
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<User>, MicroblogError> {
        let models = users::Entity::find()
            .order_by_asc(users::Column::Id)
            .with_page(page)
            .all(&self.db)
            .await
            .map_err(|e| MicroblogError::internal(e, "list users"))?;
        Ok(models.into_iter().map(user_from_model).collect())
    }

    async fn create(&self, user: &NewUser) -> Result<User, MicroblogError> {
        let model = users::ActiveModel {
            name: Set(user.name.clone()),
            email: Set(user.email.clone()),
            password_digest: Set(user.password_digest.clone()),
            remember_token: Set(user.remember_token.clone()),
            admin: Set(user.admin),
            created_at: Set(user.created_at),
            updated_at: Set(user.created_at),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_error(e, "create user"))?;
        Ok(user_from_model(model))
    }

    async fn update(&self, user: &User) -> Result<(), MicroblogError> {
        users::ActiveModel {
            id: Set(user.id.0),
            name: Set(user.name.clone()),
            email: Set(user.email.clone()),
            password_digest: Set(user.password_digest.clone()),
            admin: Set(user.admin),
            updated_at: Set(user.updated_at),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| match e {
            DbErr::RecordNotUpdated => MicroblogError::UserNotFound,
            e => write_error(e, "update user"),
        })?;
        Ok(())
    }

    async fn update_remember_token(
        &self,
        id: UserId,
        digest: &str,
    ) -> Result<(), MicroblogError> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::RememberToken, Expr::value(digest))
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(id.0))
            .exec(&self.db)
            .await
            .map_err(|e| MicroblogError::internal(e, "update remember token"))?;
        if result.rows_affected == 0 {
            return Err(MicroblogError::UserNotFound);
        }
        Ok(())
    }

    async fn delete_cascade(&self, id: UserId) -> Result<bool, MicroblogError> {
        let deleted = self
            .db
            .transaction::<_, bool, DbErr>(|txn| {
                Box::pin(async move {
                    microposts::Entity::delete_many()
                        .filter(microposts::Column::UserId.eq(id.0))
                        .exec(txn)
                        .await?;
                    relationships::Entity::delete_many()
                        .filter(
                            Condition::any()
                                .add(relationships::Column::FollowerId.eq(id.0))
                                .add(relationships::Column::FollowedId.eq(id.0)),
                        )
                        .exec(txn)
                        .await?;
                    let result = users::Entity::delete_by_id(id.0).exec(txn).await?;
                    Ok(result.rows_affected > 0)
                })
            })
            .await
            .map_err(|e| MicroblogError::internal(e, "delete user with dependents"))?;
        Ok(deleted)
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: UserId(model.id),
        name: model.name,
        email: model.email,
        password_digest: model.password_digest,
        remember_token: model.remember_token,
        admin: model.admin,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Micropost repository ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbMicropostRepository {
    pub db: DatabaseConnection,
}

/// `SELECT followed_id FROM relationships WHERE follower_id = :user_id`
fn followed_ids_of(user_id: UserId) -> SelectStatement {
    Query::select()
        .column(relationships::Column::FollowedId)
        .from(relationships::Entity)
        .and_where(Expr::col(relationships::Column::FollowerId).eq(user_id.0))
        .to_owned()
}

fn order_microposts(
    query: Select<microposts::Entity>,
    sort_by: MicropostSortBy,
) -> Select<microposts::Entity> {
    // id breaks ties between posts created in the same instant
    match sort_by {
        MicropostSortBy::CreatedAt(Sort::Desc) => query
            .order_by_desc(microposts::Column::CreatedAt)
            .order_by_desc(microposts::Column::Id),
        MicropostSortBy::CreatedAt(Sort::Asc) => query
            .order_by_asc(microposts::Column::CreatedAt)
            .order_by_asc(microposts::Column::Id),
    }
}

impl MicropostRepository for DbMicropostRepository {
    async fn find_by_id(&self, id: MicropostId) -> Result<Option<Micropost>, MicroblogError> {
        let model = microposts::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| MicroblogError::internal(e, "find micropost by id"))?;
        Ok(model.map(micropost_from_model))
    }

    async fn create(&self, micropost: &NewMicropost) -> Result<Micropost, MicroblogError> {
        let model = microposts::ActiveModel {
            content: Set(micropost.content.clone()),
            user_id: Set(micropost.user_id.0),
            created_at: Set(micropost.created_at),
            updated_at: Set(micropost.created_at),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_error(e, "create micropost"))?;
        Ok(micropost_from_model(model))
    }

    async fn delete(&self, id: MicropostId) -> Result<bool, MicroblogError> {
        let result = microposts::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(|e| MicroblogError::internal(e, "delete micropost"))?;
        Ok(result.rows_affected > 0)
    }

    async fn list_by_user(
        &self,
        user_id: UserId,
        sort_by: MicropostSortBy,
        page: PageRequest,
    ) -> Result<Vec<Micropost>, MicroblogError> {
        let query = microposts::Entity::find().filter(microposts::Column::UserId.eq(user_id.0));
        let models = order_microposts(query, sort_by)
            .with_page(page)
            .all(&self.db)
            .await
            .map_err(|e| MicroblogError::internal(e, "list microposts by user"))?;
        Ok(models.into_iter().map(micropost_from_model).collect())
    }

    async fn count_by_user(&self, user_id: UserId) -> Result<u64, MicroblogError> {
        let count = microposts::Entity::find()
            .filter(microposts::Column::UserId.eq(user_id.0))
            .count(&self.db)
            .await
            .map_err(|e| MicroblogError::internal(e, "count microposts by user"))?;
        Ok(count)
    }

    async fn from_users_followed_by(
        &self,
        user_id: UserId,
        sort_by: MicropostSortBy,
        page: PageRequest,
    ) -> Result<Vec<Micropost>, MicroblogError> {
        let query = microposts::Entity::find().filter(
            Condition::any()
                .add(microposts::Column::UserId.in_subquery(followed_ids_of(user_id)))
                .add(microposts::Column::UserId.eq(user_id.0)),
        );
        let models = order_microposts(query, sort_by)
            .with_page(page)
            .all(&self.db)
            .await
            .map_err(|e| {
                MicroblogError::internal(e, "list microposts from users followed by")
            })?;
        Ok(models.into_iter().map(micropost_from_model).collect())
    }
}

fn micropost_from_model(model: microposts::Model) -> Micropost {
    Micropost {
        id: MicropostId(model.id),
        content: model.content,
        user_id: UserId(model.user_id),
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Relationship repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRelationshipRepository {
    pub db: DatabaseConnection,
}

impl RelationshipRepository for DbRelationshipRepository {
    async fn find(
        &self,
        follower_id: UserId,
        followed_id: UserId,
    ) -> Result<Option<Relationship>, MicroblogError> {
        let model = relationships::Entity::find()
            .filter(relationships::Column::FollowerId.eq(follower_id.0))
            .filter(relationships::Column::FollowedId.eq(followed_id.0))
            .one(&self.db)
            .await
            .map_err(|e| MicroblogError::internal(e, "find relationship"))?;
        Ok(model.map(relationship_from_model))
    }

    async fn create(
        &self,
        relationship: &NewRelationship,
    ) -> Result<Relationship, MicroblogError> {
        let model = relationships::ActiveModel {
            follower_id: Set(relationship.follower_id.0),
            followed_id: Set(relationship.followed_id.0),
            created_at: Set(relationship.created_at),
            updated_at: Set(relationship.created_at),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_error(e, "create relationship"))?;
        Ok(relationship_from_model(model))
    }

    async fn delete(&self, relationship: &Relationship) -> Result<bool, MicroblogError> {
        let result = relationships::Entity::delete_by_id(relationship.id.0)
            .exec(&self.db)
            .await
            .map_err(|e| MicroblogError::internal(e, "delete relationship"))?;
        Ok(result.rows_affected > 0)
    }

    async fn list_followed(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<Vec<User>, MicroblogError> {
        let models = users::Entity::find()
            .join_rev(JoinType::InnerJoin, relationships::Relation::Followed.def())
            .filter(relationships::Column::FollowerId.eq(user_id.0))
            .order_by_asc(relationships::Column::Id)
            .with_page(page)
            .all(&self.db)
            .await
            .map_err(|e| MicroblogError::internal(e, "list followed users"))?;
        Ok(models.into_iter().map(user_from_model).collect())
    }

    async fn list_followers(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<Vec<User>, MicroblogError> {
        let models = users::Entity::find()
            .join_rev(JoinType::InnerJoin, relationships::Relation::Follower.def())
            .filter(relationships::Column::FollowedId.eq(user_id.0))
            .order_by_asc(relationships::Column::Id)
            .with_page(page)
            .all(&self.db)
            .await
            .map_err(|e| MicroblogError::internal(e, "list followers"))?;
        Ok(models.into_iter().map(user_from_model).collect())
    }
}

fn relationship_from_model(model: relationships::Model) -> Relationship {
    Relationship {
        id: RelationshipId(model.id),
        follower_id: UserId(model.follower_id),
        followed_id: UserId(model.followed_id),
        created_at: model.created_at,
    }
}
