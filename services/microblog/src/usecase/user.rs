use chrono::Utc;
use tracing::{info, warn};

use microblog_domain::id::UserId;
use microblog_domain::pagination::PageRequest;
use microblog_domain::validation::{ValidationErrors, Violation};

use crate::domain::credentials::{
    RememberTokenHasher, hash_password, new_remember_token, verify_password,
    verify_unknown_password,
};
use crate::domain::repository::UserRepository;
use crate::domain::types::{
    NewUser, User, normalize_email, validate_email, validate_name, validate_password,
};
use crate::error::MicroblogError;

/// Record `email` as taken unless it is free or already belongs to `owner`.
async fn check_email_available<R: UserRepository>(
    repo: &R,
    email: &str,
    owner: Option<UserId>,
    errors: &mut ValidationErrors,
) -> Result<(), MicroblogError> {
    if errors.has_field("email") {
        return Ok(());
    }
    if let Some(existing) = repo.find_by_email(email).await? {
        if Some(existing.id) != owner {
            errors.add("email", Violation::Taken);
        }
    }
    Ok(())
}

// ── CreateUser (signup) ──────────────────────────────────────────────────────

pub struct CreateUserInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: Option<String>,
}

pub struct CreateUserUseCase<R: UserRepository> {
    pub repo: R,
    pub tokens: RememberTokenHasher,
}

impl<R: UserRepository> CreateUserUseCase<R> {
    pub async fn execute(&self, input: CreateUserInput) -> Result<User, MicroblogError> {
        let email = normalize_email(&input.email);

        let mut errors = ValidationErrors::new();
        validate_name(&input.name, &mut errors);
        validate_email(&email, &mut errors);
        validate_password(
            &input.password,
            input.password_confirmation.as_deref(),
            &mut errors,
        );
        check_email_available(&self.repo, &email, None, &mut errors).await?;
        errors.into_result()?;

        let user = NewUser {
            name: input.name,
            email,
            password_digest: hash_password(&input.password)?,
            remember_token: self.tokens.encrypt(&new_remember_token()),
            admin: false,
            created_at: Utc::now(),
        };
        let user = self.repo.create(&user).await?;
        info!(user_id = %user.id, "user created");
        Ok(user)
    }
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> GetUserUseCase<R> {
    pub async fn execute(&self, user_id: UserId) -> Result<User, MicroblogError> {
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or(MicroblogError::UserNotFound)
    }
}

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> ListUsersUseCase<R> {
    pub async fn execute(&self, page: PageRequest) -> Result<Vec<User>, MicroblogError> {
        self.repo.list(page).await
    }
}

// ── UpdateUser ───────────────────────────────────────────────────────────────

/// Fields left as `None` keep their current value.
#[derive(Default)]
pub struct UpdateUserInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
    pub admin: Option<bool>,
}

pub struct UpdateUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> UpdateUserUseCase<R> {
    pub async fn execute(
        &self,
        user_id: UserId,
        input: UpdateUserInput,
    ) -> Result<User, MicroblogError> {
        let mut user = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or(MicroblogError::UserNotFound)?;

        let email = input.email.as_deref().map(normalize_email);

        let mut errors = ValidationErrors::new();
        if let Some(ref name) = input.name {
            validate_name(name, &mut errors);
        }
        if let Some(ref email) = email {
            validate_email(email, &mut errors);
            check_email_available(&self.repo, email, Some(user.id), &mut errors).await?;
        }
        if let Some(ref password) = input.password {
            validate_password(
                password,
                input.password_confirmation.as_deref(),
                &mut errors,
            );
        }
        errors.into_result()?;

        if let Some(name) = input.name {
            user.name = name;
        }
        if let Some(email) = email {
            user.email = email;
        }
        if let Some(ref password) = input.password {
            user.password_digest = hash_password(password)?;
        }
        if let Some(admin) = input.admin {
            user.admin = admin;
        }
        user.updated_at = Utc::now();

        self.repo.update(&user).await?;
        info!(user_id = %user.id, "user updated");
        Ok(user)
    }
}

// ── DeleteUser ───────────────────────────────────────────────────────────────

pub struct DeleteUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> DeleteUserUseCase<R> {
    /// Removes the user, its microposts and every relationship touching it.
    pub async fn execute(&self, user_id: UserId) -> Result<(), MicroblogError> {
        if !self.repo.delete_cascade(user_id).await? {
            return Err(MicroblogError::UserNotFound);
        }
        info!(user_id = %user_id, "user deleted");
        Ok(())
    }
}

// ── Authenticate ─────────────────────────────────────────────────────────────

pub struct AuthenticateInput {
    pub email: String,
    pub password: String,
}

pub struct AuthenticateUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> AuthenticateUseCase<R> {
    /// Unknown email and wrong password both yield `InvalidCredentials`.
    pub async fn execute(&self, input: AuthenticateInput) -> Result<User, MicroblogError> {
        let email = normalize_email(&input.email);
        match self.repo.find_by_email(&email).await? {
            Some(user) if verify_password(&input.password, &user.password_digest) => Ok(user),
            Some(user) => {
                warn!(user_id = %user.id, "password authentication failed");
                Err(MicroblogError::InvalidCredentials)
            }
            None => {
                verify_unknown_password(&input.password);
                Err(MicroblogError::InvalidCredentials)
            }
        }
    }
}

// ── RememberUser ─────────────────────────────────────────────────────────────

pub struct RememberUserUseCase<R: UserRepository> {
    pub repo: R,
    pub tokens: RememberTokenHasher,
}

impl<R: UserRepository> RememberUserUseCase<R> {
    /// Issue a fresh remember token. Only its digest is stored; the returned
    /// plaintext goes to the client.
    pub async fn execute(&self, user_id: UserId) -> Result<String, MicroblogError> {
        let token = new_remember_token();
        self.repo
            .update_remember_token(user_id, &self.tokens.encrypt(&token))
            .await?;
        info!(user_id = %user_id, "remember token rotated");
        Ok(token)
    }
}
