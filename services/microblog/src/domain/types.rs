use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use microblog_domain::id::{MicropostId, RelationshipId, UserId};
use microblog_domain::pagination::Sort;
use microblog_domain::validation::{ValidationErrors, Violation};

/// Maximum user name length in characters.
pub const NAME_MAX_LEN: usize = 50;

/// Minimum plaintext password length in characters.
pub const PASSWORD_MIN_LEN: usize = 6;

/// Maximum micropost length in characters.
pub const CONTENT_MAX_LEN: usize = 140;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_+\-.]+@[A-Za-z0-9\-]+(\.[A-Za-z]+)*\.[A-Za-z]+$")
        .expect("email regex is valid")
});

/// Account record as persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_digest: String,
    pub remember_token: String,
    pub admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated user that has not been assigned an id yet.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_digest: String,
    pub remember_token: String,
    pub admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Short text post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Micropost {
    pub id: MicropostId,
    pub content: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMicropost {
    pub content: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// Directed follow edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: RelationshipId,
    pub follower_id: UserId,
    pub followed_id: UserId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewRelationship {
    pub follower_id: UserId,
    pub followed_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// Sort options for micropost list queries. Newest first unless overridden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MicropostSortBy {
    CreatedAt(Sort),
}

impl Default for MicropostSortBy {
    fn default() -> Self {
        Self::CreatedAt(Sort::Desc)
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Emails are compared and stored lowercased.
pub fn normalize_email(email: &str) -> String {
    email.to_lowercase()
}

/// Name: present, at most [`NAME_MAX_LEN`] characters.
pub fn validate_name(name: &str, errors: &mut ValidationErrors) {
    if is_blank(name) {
        errors.add("name", Violation::Blank);
    } else if name.chars().count() > NAME_MAX_LEN {
        errors.add("name", Violation::TooLong { max: NAME_MAX_LEN });
    }
}

/// Email: present and well-formed. Uniqueness needs storage and is checked
/// by the caller.
pub fn validate_email(email: &str, errors: &mut ValidationErrors) {
    if is_blank(email) {
        errors.add("email", Violation::Blank);
    } else if !EMAIL_REGEX.is_match(email) {
        errors.add("email", Violation::Invalid);
    }
}

/// Password: present, at least [`PASSWORD_MIN_LEN`] characters, and equal to
/// the confirmation when one is supplied.
pub fn validate_password(
    password: &str,
    confirmation: Option<&str>,
    errors: &mut ValidationErrors,
) {
    if is_blank(password) {
        errors.add("password", Violation::Blank);
    } else if password.chars().count() < PASSWORD_MIN_LEN {
        errors.add("password", Violation::TooShort { min: PASSWORD_MIN_LEN });
    }
    if let Some(confirmation) = confirmation {
        if confirmation != password {
            errors.add(
                "password_confirmation",
                Violation::Mismatch { other: "password" },
            );
        }
    }
}

/// Content: present, at most [`CONTENT_MAX_LEN`] characters.
pub fn validate_content(content: &str, errors: &mut ValidationErrors) {
    if is_blank(content) {
        errors.add("content", Violation::Blank);
    } else if content.chars().count() > CONTENT_MAX_LEN {
        errors.add("content", Violation::TooLong { max: CONTENT_MAX_LEN });
    }
}

/// A reference to a user row must carry an assigned id.
pub fn validate_user_ref(field: &'static str, id: UserId, errors: &mut ValidationErrors) {
    if !id.is_assigned() {
        errors.add(field, Violation::Blank);
    }
}
