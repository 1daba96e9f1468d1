use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;

use crate::auth::{self, password, AuthError, Claims};
use crate::database::manager::{is_unique_violation, DatabaseError, DatabaseManager};
use crate::database::models::{PublicUser, Tenant, User, UserTenant};
use crate::validation::{validate_payload, LoginRequest, RegisterRequest, ValidationFailure};

/// Result of a successful registration or login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub token: String,
    pub user: PublicUser,
}

#[derive(Debug, Error)]
pub enum AuthServiceError {
    #[error("Validation failed")]
    Validation(ValidationFailure),

    #[error("Email already registered")]
    EmailTaken,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl From<ValidationFailure> for AuthServiceError {
    fn from(err: ValidationFailure) -> Self {
        AuthServiceError::Validation(err)
    }
}

impl From<AuthServiceError> for crate::error::ApiError {
    fn from(err: AuthServiceError) -> Self {
        match err {
            AuthServiceError::Validation(failure) => failure.into(),
            AuthServiceError::EmailTaken => {
                crate::error::ApiError::conflict("Email already registered")
            }
            AuthServiceError::Auth(e) => e.into(),
            AuthServiceError::Database(e) => e.into(),
            AuthServiceError::Sqlx(e) => DatabaseError::Sqlx(e).into(),
        }
    }
}

pub struct AuthService {
    pool: PgPool,
}

impl AuthService {
    pub async fn new() -> Result<Self, DatabaseError> {
        Ok(Self { pool: DatabaseManager::pool().await? })
    }

    /// Register a new tenant and its first user.
    ///
    /// Tenant, user and membership link are inserted inside one
    /// transaction: a mid-sequence failure leaves no orphan rows.
    pub async fn register(&self, input: RegisterRequest) -> Result<AuthSession, AuthServiceError> {
        validate_payload(&input)?;

        let password_hash = password::hash_password(&input.password)?;

        let mut tx = self.pool.begin().await?;

        let tenant = sqlx::query_as::<_, Tenant>(
            "INSERT INTO tenants (name) VALUES ($1)
             RETURNING id, name, created_at, updated_at",
        )
        .bind(&input.tenant_name)
        .fetch_one(&mut *tx)
        .await?;

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (email, password_hash, tenant_id, first_name, last_name)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, email, password_hash, tenant_id, first_name, last_name,
                       created_at, updated_at",
        )
        .bind(&input.email)
        .bind(&password_hash)
        .bind(tenant.id)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AuthServiceError::EmailTaken
            } else {
                AuthServiceError::Sqlx(e)
            }
        })?;

        let link = sqlx::query_as::<_, UserTenant>(
            "INSERT INTO user_tenants (user_id, tenant_id) VALUES ($1, $2)
             RETURNING user_id, tenant_id",
        )
        .bind(user.id)
        .bind(tenant.id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            tenant_id = %link.tenant_id,
            user_id = %link.user_id,
            "Registered new tenant"
        );

        let token = auth::generate_token(&Claims::new(user.id, user.tenant_id))?;
        Ok(AuthSession { token, user: user.into() })
    }

    /// Authenticate by email and password.
    ///
    /// Unknown email and wrong password both surface as the same
    /// `InvalidCredentials` to prevent account enumeration.
    pub async fn login(&self, input: LoginRequest) -> Result<AuthSession, AuthServiceError> {
        validate_payload(&input)?;

        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, tenant_id, first_name, last_name,
                    created_at, updated_at
             FROM users WHERE email = $1",
        )
        .bind(&input.email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

        if !password::verify_password(&input.password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials.into());
        }

        let token = auth::generate_token(&Claims::new(user.id, user.tenant_id))?;
        Ok(AuthSession { token, user: user.into() })
    }
}
