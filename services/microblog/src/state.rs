use sea_orm::DatabaseConnection;

use crate::config::MicroblogConfig;
use crate::domain::credentials::RememberTokenHasher;
use crate::error::MicroblogError;
use crate::infra::db::{DbMicropostRepository, DbRelationshipRepository, DbUserRepository};

/// Shared handles every use case is built from.
#[derive(Clone, Debug)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub tokens: RememberTokenHasher,
}

impl AppState {
    /// Open the connection pool described by `config`.
    pub async fn connect(config: &MicroblogConfig) -> Result<Self, MicroblogError> {
        let db = microblog_core::db::connect(&config.database_url, config.database_max_connections)
            .await
            .map_err(|e| MicroblogError::internal(e, "connect to database"))?;
        let tokens = RememberTokenHasher::new(config.remember_token_secret.as_bytes())?;
        Ok(Self { db, tokens })
    }

    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn micropost_repo(&self) -> DbMicropostRepository {
        DbMicropostRepository {
            db: self.db.clone(),
        }
    }

    pub fn relationship_repo(&self) -> DbRelationshipRepository {
        DbRelationshipRepository {
            db: self.db.clone(),
        }
    }
}
