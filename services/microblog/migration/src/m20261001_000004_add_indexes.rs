use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .table(Users::Table)
                    .col(Users::RememberToken)
                    .name("idx_users_remember_token")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Microposts::Table)
                    .col(Microposts::UserId)
                    .col(Microposts::CreatedAt)
                    .name("idx_microposts_user_id_created_at")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Relationships::Table)
                    .col(Relationships::FollowerId)
                    .name("idx_relationships_follower_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Relationships::Table)
                    .col(Relationships::FollowedId)
                    .name("idx_relationships_followed_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Relationships::Table)
                    .col(Relationships::FollowerId)
                    .col(Relationships::FollowedId)
                    .unique()
                    .name("idx_relationships_follower_id_followed_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_relationships_follower_id_followed_id",
            "idx_relationships_followed_id",
            "idx_relationships_follower_id",
            "idx_microposts_user_id_created_at",
            "idx_users_remember_token",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(Iden)]
enum Users {
    Table,
    RememberToken,
}

#[derive(Iden)]
enum Microposts {
    Table,
    UserId,
    CreatedAt,
}

#[derive(Iden)]
enum Relationships {
    Table,
    FollowerId,
    FollowedId,
}
