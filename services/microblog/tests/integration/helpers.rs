use chrono::{DateTime, Duration, TimeZone, Utc};

use microblog::config::MicroblogConfig;
use microblog::domain::repository::{MicropostRepository, UserRepository};
use microblog::domain::types::{Micropost, NewMicropost, NewUser, User};
use microblog::state::AppState;
use microblog_domain::id::UserId;
use microblog_migration::{Migrator, MigratorTrait};

pub const TEST_SECRET: &str = "integration-test-remember-secret";

/// Fresh in-memory database with every migration applied.
///
/// A single pooled connection keeps the in-memory database alive for the
/// whole test. Logs go to stdout as JSON, filtered by `RUST_LOG`.
pub async fn test_state() -> AppState {
    microblog_core::tracing::init_tracing();
    let config = MicroblogConfig {
        database_url: "sqlite::memory:".into(),
        remember_token_secret: TEST_SECRET.into(),
        database_max_connections: 1,
    };
    let state = AppState::connect(&config).await.unwrap();
    Migrator::up(&state.db, None).await.unwrap();
    state
}

/// Insert a user directly, skipping password hashing.
pub async fn insert_user(state: &AppState, name: &str) -> User {
    state
        .user_repo()
        .create(&NewUser {
            name: name.into(),
            email: format!("{}@example.com", name.to_lowercase()),
            password_digest: "unused".into(),
            remember_token: String::new(),
            admin: false,
            created_at: Utc::now(),
        })
        .await
        .unwrap()
}

/// Insert a micropost with an explicit creation time.
pub async fn insert_micropost(
    state: &AppState,
    user_id: UserId,
    content: &str,
    created_at: DateTime<Utc>,
) -> Micropost {
    state
        .micropost_repo()
        .create(&NewMicropost {
            content: content.into(),
            user_id,
            created_at,
        })
        .await
        .unwrap()
}

/// A fixed instant `hours` after a base time, so ordering never depends on
/// the wall clock.
pub fn at(hours: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap() + Duration::hours(hours)
}
