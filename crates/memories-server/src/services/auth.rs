//! Authentication service

use crate::services::storage_err;
use crate::storage::Database;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use memories_core::rules;
use memories_core::{CoreError, Result};
use memories_types::{RegisterRequest, User};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

const TOKEN_LIFETIME_DAYS: i64 = 30;

pub struct AuthService {
    db: Arc<Database>,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(db: Arc<Database>, jwt_secret: String) -> Self {
        Self { db, jwt_secret }
    }

    /// Create an account and issue its first token.
    pub async fn register(&self, req: &RegisterRequest) -> Result<(User, String)> {
        rules::validate_registration(&req.username, &req.email, &req.password)?;

        if self
            .db
            .get_user_by_username(&req.username)
            .await
            .map_err(storage_err)?
            .is_some()
        {
            return Err(CoreError::Validation("Username already in use".to_string()));
        }
        if self
            .db
            .get_user_by_email(&req.email)
            .await
            .map_err(storage_err)?
            .is_some()
        {
            return Err(CoreError::Validation("Email already in use".to_string()));
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(req.password.as_bytes(), &salt)
            .map_err(|e| CoreError::Storage(format!("Failed to hash password: {e}")))?
            .to_string();

        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            username: req.username.clone(),
            email: req.email.clone(),
            profile_image: rules::default_profile_image(&req.username),
            bio: String::new(),
            followers: Vec::new(),
            following: Vec::new(),
            created_at: Utc::now(),
        };

        self.db
            .create_user(&user, &password_hash)
            .await
            .map_err(storage_err)?;
        info!("Registered user: {}", user.username);

        let token = self.issue_token(&user.id)?;
        Ok((user, token))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String)> {
        let invalid = || CoreError::NotAuthenticated("Invalid email or password".to_string());

        let (user_id, password_hash) = self
            .db
            .get_auth_by_email(email)
            .await
            .map_err(storage_err)?
            .ok_or_else(invalid)?;

        let parsed_hash = PasswordHash::new(&password_hash)
            .map_err(|e| CoreError::Storage(format!("Invalid password hash: {e}")))?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| invalid())?;

        let user = self
            .db
            .get_user_by_id(&user_id)
            .await
            .map_err(storage_err)?
            .ok_or_else(invalid)?;

        let token = self.issue_token(&user.id)?;
        Ok((user, token))
    }

    /// Verify a bearer token and return the user id it is bound to.
    pub fn validate_token(&self, token: &str) -> Result<String> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| CoreError::NotAuthenticated(format!("Invalid token: {e}")))?;

        Ok(token_data.claims.sub)
    }

    fn issue_token(&self, user_id: &str) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + Duration::days(TOKEN_LIFETIME_DAYS)).timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| CoreError::Storage(format!("Failed to issue token: {e}")))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String, // user id
    exp: i64,
    iat: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_request(username: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: "hunter22".to_string(),
        }
    }

    async fn service() -> AuthService {
        let db = Arc::new(Database::in_memory().await.unwrap());
        AuthService::new(db, "test-secret".to_string())
    }

    #[tokio::test]
    async fn register_then_login() {
        let auth = service().await;

        let (user, token) = auth
            .register(&register_request("alice", "alice@example.com"))
            .await
            .unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(auth.validate_token(&token).unwrap(), user.id);

        let (logged_in, _) = auth.login("alice@example.com", "hunter22").await.unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[tokio::test]
    async fn duplicate_username_rejected() {
        let auth = service().await;
        auth.register(&register_request("alice", "alice@example.com"))
            .await
            .unwrap();

        let err = auth
            .register(&register_request("alice", "other@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(ref m) if m == "Username already in use"));
    }

    #[tokio::test]
    async fn duplicate_email_rejected() {
        let auth = service().await;
        auth.register(&register_request("alice", "alice@example.com"))
            .await
            .unwrap();

        let err = auth
            .register(&register_request("bob", "alice@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(ref m) if m == "Email already in use"));
    }

    #[tokio::test]
    async fn wrong_password_is_not_authenticated() {
        let auth = service().await;
        auth.register(&register_request("alice", "alice@example.com"))
            .await
            .unwrap();

        let err = auth
            .login("alice@example.com", "wrong-password")
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotAuthenticated(_)));
    }
}
