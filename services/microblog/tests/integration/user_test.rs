use microblog::domain::repository::{MicropostRepository, RelationshipRepository, UserRepository};
use microblog::error::MicroblogError;
use microblog::usecase::user::{
    AuthenticateInput, AuthenticateUseCase, CreateUserInput, CreateUserUseCase,
    DeleteUserUseCase, RememberUserUseCase,
};
use microblog_domain::pagination::PageRequest;
use microblog_domain::validation::Violation;

use crate::helpers::{at, insert_micropost, insert_user, test_state};

fn signup(email: &str, password: &str) -> CreateUserInput {
    CreateUserInput {
        name: "Example User".into(),
        email: email.into(),
        password: password.into(),
        password_confirmation: Some(password.into()),
    }
}

// ── signup ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_store_email_lowercased() {
    let state = test_state().await;
    let usecase = CreateUserUseCase {
        repo: state.user_repo(),
        tokens: state.tokens.clone(),
    };

    let user = usecase
        .execute(signup("Foo@ExAMPle.CoM", "foobar"))
        .await
        .unwrap();
    assert_eq!(user.email, "foo@example.com");

    let stored = state
        .user_repo()
        .find_by_email("foo@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.id, user.id);
    assert_ne!(stored.password_digest, "foobar");
    assert_eq!(stored.remember_token.len(), 64);
}

#[tokio::test]
async fn should_reject_5_char_password_and_accept_6() {
    let state = test_state().await;
    let usecase = CreateUserUseCase {
        repo: state.user_repo(),
        tokens: state.tokens.clone(),
    };

    let error = usecase
        .execute(signup("short@example.com", "aaaaa"))
        .await
        .unwrap_err();
    assert!(
        error
            .validation_errors()
            .unwrap()
            .contains("password", &Violation::TooShort { min: 6 })
    );

    usecase
        .execute(signup("short@example.com", "aaaaaa"))
        .await
        .unwrap();
}

#[tokio::test]
async fn should_reject_email_taken_in_different_case() {
    let state = test_state().await;
    let usecase = CreateUserUseCase {
        repo: state.user_repo(),
        tokens: state.tokens.clone(),
    };

    usecase
        .execute(signup("user@example.com", "foobar"))
        .await
        .unwrap();
    let error = usecase
        .execute(signup("USER@EXAMPLE.COM", "foobar"))
        .await
        .unwrap_err();
    assert!(
        error
            .validation_errors()
            .unwrap()
            .contains("email", &Violation::Taken)
    );
    let users = state.user_repo().list(PageRequest::default()).await.unwrap();
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn should_surface_unique_index_as_constraint() {
    let state = test_state().await;
    insert_user(&state, "dup").await;
    let result = state
        .user_repo()
        .create(&microblog::domain::types::NewUser {
            name: "dup".into(),
            email: "dup@example.com".into(),
            password_digest: "unused".into(),
            remember_token: String::new(),
            admin: false,
            created_at: chrono::Utc::now(),
        })
        .await;
    assert!(
        matches!(result, Err(MicroblogError::Constraint(_))),
        "expected Constraint, got {result:?}"
    );
}

// ── authenticate / remember ──────────────────────────────────────────────────

#[tokio::test]
async fn should_authenticate_with_correct_password_only() {
    let state = test_state().await;
    CreateUserUseCase {
        repo: state.user_repo(),
        tokens: state.tokens.clone(),
    }
    .execute(signup("auth@example.com", "foobar"))
    .await
    .unwrap();

    let usecase = AuthenticateUseCase {
        repo: state.user_repo(),
    };
    let user = usecase
        .execute(AuthenticateInput {
            email: "Auth@Example.com".into(),
            password: "foobar".into(),
        })
        .await
        .unwrap();
    assert_eq!(user.email, "auth@example.com");

    let result = usecase
        .execute(AuthenticateInput {
            email: "auth@example.com".into(),
            password: "invalid".into(),
        })
        .await;
    assert!(matches!(result, Err(MicroblogError::InvalidCredentials)));
}

#[tokio::test]
async fn should_store_digest_of_issued_remember_token() {
    let state = test_state().await;
    let user = insert_user(&state, "remember").await;

    let token = RememberUserUseCase {
        repo: state.user_repo(),
        tokens: state.tokens.clone(),
    }
    .execute(user.id)
    .await
    .unwrap();

    let stored = state.user_repo().find_by_id(user.id).await.unwrap().unwrap();
    assert_ne!(stored.remember_token, token);
    assert_eq!(stored.remember_token, state.tokens.encrypt(&token));
}

#[tokio::test]
async fn should_touch_updated_at_when_rotating_remember_token() {
    let state = test_state().await;
    let user = state
        .user_repo()
        .create(&microblog::domain::types::NewUser {
            name: "stale".into(),
            email: "stale@example.com".into(),
            password_digest: "unused".into(),
            remember_token: String::new(),
            admin: false,
            created_at: at(0),
        })
        .await
        .unwrap();
    assert_eq!(user.updated_at, at(0));

    RememberUserUseCase {
        repo: state.user_repo(),
        tokens: state.tokens.clone(),
    }
    .execute(user.id)
    .await
    .unwrap();

    let stored = state.user_repo().find_by_id(user.id).await.unwrap().unwrap();
    assert!(stored.updated_at > at(0), "{:?}", stored.updated_at);
    assert_eq!(stored.created_at, at(0));
}

// ── delete ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_delete_user_with_microposts_and_relationships() {
    let state = test_state().await;
    let alice = insert_user(&state, "alice").await;
    let bob = insert_user(&state, "bob").await;
    let carol = insert_user(&state, "carol").await;
    let post = insert_micropost(&state, alice.id, "hello", at(0)).await;
    let relationships = state.relationship_repo();
    for (follower, followed) in [(alice.id, bob.id), (carol.id, alice.id)] {
        relationships
            .create(&microblog::domain::types::NewRelationship {
                follower_id: follower,
                followed_id: followed,
                created_at: at(1),
            })
            .await
            .unwrap();
    }

    DeleteUserUseCase {
        repo: state.user_repo(),
    }
    .execute(alice.id)
    .await
    .unwrap();

    assert!(state.user_repo().find_by_id(alice.id).await.unwrap().is_none());
    assert!(state.micropost_repo().find_by_id(post.id).await.unwrap().is_none());
    assert!(relationships.find(alice.id, bob.id).await.unwrap().is_none());
    assert!(relationships.find(carol.id, alice.id).await.unwrap().is_none());
    assert!(
        relationships
            .list_followers(bob.id, PageRequest::default())
            .await
            .unwrap()
            .is_empty()
    );

    let result = DeleteUserUseCase {
        repo: state.user_repo(),
    }
    .execute(alice.id)
    .await;
    assert!(matches!(result, Err(MicroblogError::UserNotFound)));
}
