//! Registration, login and password hashing

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use common::error::DatabaseError;
use tracing::{debug, info};

use super::{ServiceError, ServiceResult};
use crate::{
    jwt::JwtService,
    models::{LoginRequest, LoginResponse, NewUser, RegisterRequest, Role, User},
    repositories::UserRepository,
};

/// Hash a password with Argon2id and a fresh random salt
pub fn hash_password(password: &str) -> ServiceResult<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ServiceError::Internal(format!("Failed to hash password: {}", e)))?
        .to_string();

    Ok(hash)
}

/// Check a password against a stored hash
///
/// An unparseable stored hash is reported as an internal error, not a mismatch.
pub fn verify_password(password: &str, password_hash: &str) -> ServiceResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| ServiceError::Internal(format!("Failed to parse password hash: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Account registration and credential exchange
#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    jwt: JwtService,
}

impl AuthService {
    pub fn new(users: UserRepository, jwt: JwtService) -> Self {
        Self { users, jwt }
    }

    /// Register a new account with the `user` role
    ///
    /// Input is expected to be validated already.
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<User> {
        let email = request.email.trim().to_lowercase();
        let username = request.username.trim().to_string();

        if self.users.exists(&email, &username).await? {
            debug!("Registration rejected, identity taken: {}", username);
            return Err(ServiceError::AlreadyExists("User"));
        }

        let new_user = NewUser {
            email,
            username,
            password_hash: hash_password(&request.password)?,
            role: Role::User,
        };

        // a concurrent registration can still win the unique constraint
        let user = self.users.create(&new_user).await.map_err(|e| match e {
            DatabaseError::AlreadyExists => ServiceError::AlreadyExists("User"),
            other => ServiceError::Persistence(other),
        })?;

        info!("Registered user {} ({})", user.username, user.id);
        Ok(user)
    }

    /// Exchange credentials for a session token
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<LoginResponse> {
        let login = request.email.trim();
        let login = if login.contains('@') {
            login.to_lowercase()
        } else {
            login.to_string()
        };

        let user = self
            .users
            .find_by_login(&login)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        if !verify_password(&request.password, &user.password_hash)? {
            debug!("Password mismatch for user {}", user.id);
            return Err(ServiceError::InvalidCredentials);
        }

        let access_token = self
            .jwt
            .issue(&user)
            .map_err(|e| ServiceError::Internal(format!("Failed to sign token: {}", e)))?;

        info!("User {} logged in", user.id);

        Ok(LoginResponse {
            user,
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt.expires_in(),
        })
    }
}
