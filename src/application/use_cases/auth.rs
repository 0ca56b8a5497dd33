use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::OnceCell;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::{
        password,
        validators::{is_valid_email, normalize_email},
    },
    domain::entities::user::{PublicUser, User, UserProfileFields},
};

#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Stores a new user. Fails with `AppError::Conflict` when the email is taken.
    async fn insert(&self, user: User) -> AppResult<User>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;
    async fn count(&self) -> AppResult<u64>;
}

#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub profile: UserProfileFields,
}

/// Verified against on unknown-email logins so both failure paths do the same Argon2 work.
const DUMMY_PASSWORD: &str = "outreach-login-timing-pad";

#[derive(Clone)]
pub struct AuthUseCases {
    repo: Arc<dyn UserRepo>,
    dummy_hash: Arc<OnceCell<String>>,
}

impl AuthUseCases {
    pub fn new(repo: Arc<dyn UserRepo>) -> Self {
        Self {
            repo,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> AppResult<PublicUser> {
        if !is_valid_email(&input.email) {
            return Err(AppError::InvalidInput("A valid email is required".into()));
        }
        if input.password.is_empty() {
            return Err(AppError::InvalidInput("Password is required".into()));
        }

        let email = normalize_email(&input.email);
        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("User already exists".into()));
        }

        let password_hash = hash_off_thread(input.password).await?;
        let user = User {
            id: Uuid::new_v4(),
            email,
            password_hash,
            first_name: non_blank(input.profile.first_name),
            last_name: non_blank(input.profile.last_name),
            company: non_blank(input.profile.company),
            created_at: Utc::now(),
        };

        let user = self.repo.insert(user).await?;
        tracing::info!(user_id = %user.id, "User registered");
        Ok(PublicUser::from(&user))
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> AppResult<PublicUser> {
        let email = normalize_email(email);
        let user = self.repo.find_by_email(&email).await?;

        let stored = match &user {
            Some(user) => user.password_hash.clone(),
            None => self.dummy_hash().await?.to_owned(),
        };
        let matches = verify_off_thread(password.to_owned(), stored).await?;

        match user {
            Some(user) if matches => Ok(PublicUser::from(&user)),
            _ => Err(AppError::InvalidCredentials),
        }
    }

    /// Resolve a token subject to a live user.
    pub async fn resolve(&self, user_id: Uuid) -> AppResult<PublicUser> {
        self.repo
            .find_by_id(user_id)
            .await?
            .map(|user| PublicUser::from(&user))
            .ok_or(AppError::Unauthenticated)
    }

    pub async fn count_users(&self) -> AppResult<u64> {
        self.repo.count().await
    }

    async fn dummy_hash(&self) -> AppResult<&str> {
        self.dummy_hash
            .get_or_try_init(|| hash_off_thread(DUMMY_PASSWORD.to_string()))
            .await
            .map(String::as_str)
    }
}

async fn hash_off_thread(raw: String) -> AppResult<String> {
    tokio::task::spawn_blocking(move || password::hash(&raw))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
}

async fn verify_off_thread(candidate: String, stored: String) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || password::verify(&candidate, &stored))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
