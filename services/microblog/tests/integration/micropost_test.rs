use microblog::domain::repository::MicropostRepository;
use microblog::domain::types::MicropostSortBy;
use microblog::error::MicroblogError;
use microblog::usecase::micropost::{
    CreateMicropostInput, CreateMicropostUseCase, DeleteMicropostUseCase, FeedUseCase,
    ListMicropostsUseCase,
};
use microblog::usecase::relationship::{FollowUseCase, UnfollowUseCase};
use microblog_domain::id::MicropostId;
use microblog_domain::pagination::{PageRequest, Sort};
use microblog_domain::validation::Violation;
use sea_orm::ConnectionTrait;

use crate::helpers::{at, insert_micropost, insert_user, test_state};

fn ids(posts: &[microblog::domain::types::Micropost]) -> Vec<MicropostId> {
    posts.iter().map(|p| p.id).collect()
}

#[tokio::test]
async fn should_accept_140_chars_and_reject_141() {
    let state = test_state().await;
    let user = insert_user(&state, "writer").await;
    let usecase = CreateMicropostUseCase {
        users: state.user_repo(),
        microposts: state.micropost_repo(),
    };

    let post = usecase
        .execute(CreateMicropostInput {
            user_id: user.id,
            content: "a".repeat(140),
        })
        .await
        .unwrap();
    assert_eq!(post.content.chars().count(), 140);

    let error = usecase
        .execute(CreateMicropostInput {
            user_id: user.id,
            content: "a".repeat(141),
        })
        .await
        .unwrap_err();
    assert!(
        error
            .validation_errors()
            .unwrap()
            .contains("content", &Violation::TooLong { max: 140 })
    );
    assert_eq!(state.micropost_repo().count_by_user(user.id).await.unwrap(), 1);
}

#[tokio::test]
async fn should_order_own_feed_newest_first() {
    let state = test_state().await;
    let user = insert_user(&state, "writer").await;
    let p1 = insert_micropost(&state, user.id, "first", at(0)).await;
    let p2 = insert_micropost(&state, user.id, "second", at(1)).await;

    let feed = FeedUseCase {
        users: state.user_repo(),
        microposts: state.micropost_repo(),
    }
    .execute(user.id, MicropostSortBy::default(), PageRequest::default())
    .await
    .unwrap();
    assert_eq!(ids(&feed), vec![p2.id, p1.id]);
}

#[tokio::test]
async fn should_include_followed_posts_until_unfollow() {
    let state = test_state().await;
    let a = insert_user(&state, "a").await;
    let b = insert_user(&state, "b").await;
    let c = insert_user(&state, "c").await;
    let pa = insert_micropost(&state, a.id, "from a", at(0)).await;
    let pb = insert_micropost(&state, b.id, "from b", at(1)).await;
    let pc = insert_micropost(&state, c.id, "from c", at(2)).await;

    let feed = FeedUseCase {
        users: state.user_repo(),
        microposts: state.micropost_repo(),
    };
    let page = PageRequest::default();

    FollowUseCase {
        users: state.user_repo(),
        relationships: state.relationship_repo(),
    }
    .execute(a.id, b.id)
    .await
    .unwrap();

    let items = feed
        .execute(a.id, MicropostSortBy::default(), page)
        .await
        .unwrap();
    assert_eq!(ids(&items), vec![pb.id, pa.id]);
    assert!(!ids(&items).contains(&pc.id));

    // b does not follow a, so b's feed is only its own posts
    let items = feed
        .execute(b.id, MicropostSortBy::default(), page)
        .await
        .unwrap();
    assert_eq!(ids(&items), vec![pb.id]);

    UnfollowUseCase {
        relationships: state.relationship_repo(),
    }
    .execute(a.id, b.id)
    .await
    .unwrap();

    let items = feed
        .execute(a.id, MicropostSortBy::default(), page)
        .await
        .unwrap();
    assert_eq!(ids(&items), vec![pa.id]);
}

#[tokio::test]
async fn should_paginate_and_sort_ascending() {
    let state = test_state().await;
    let user = insert_user(&state, "writer").await;
    let mut posts = Vec::new();
    for hour in 0..5 {
        posts.push(insert_micropost(&state, user.id, "post", at(hour)).await);
    }

    let usecase = ListMicropostsUseCase {
        users: state.user_repo(),
        microposts: state.micropost_repo(),
    };
    let output = usecase
        .execute(
            user.id,
            MicropostSortBy::CreatedAt(Sort::Asc),
            PageRequest::new(2, 2),
        )
        .await
        .unwrap();
    assert_eq!(output.total, 5);
    assert_eq!(ids(&output.microposts), vec![posts[2].id, posts[3].id]);
}

#[tokio::test]
async fn should_let_only_the_author_delete() {
    let state = test_state().await;
    let author = insert_user(&state, "author").await;
    let other = insert_user(&state, "other").await;
    let post = insert_micropost(&state, author.id, "mine", at(0)).await;

    let usecase = DeleteMicropostUseCase {
        microposts: state.micropost_repo(),
    };
    let result = usecase.execute(other.id, post.id).await;
    assert!(matches!(result, Err(MicroblogError::MicropostNotFound)));

    usecase.execute(author.id, post.id).await.unwrap();
    assert!(state.micropost_repo().find_by_id(post.id).await.unwrap().is_none());
}

#[tokio::test]
async fn should_report_storage_failure_as_internal() {
    let state = test_state().await;
    state
        .db
        .execute_unprepared("DROP TABLE microposts")
        .await
        .unwrap();

    let result = state.micropost_repo().find_by_id(MicropostId(1)).await;
    match result {
        Err(error @ MicroblogError::Internal(_)) => {
            assert_eq!(error.kind(), "INTERNAL");
            assert_eq!(error.to_string(), "internal error");
        }
        other => panic!("expected Internal, got {other:?}"),
    }
}
