use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tokio::task;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::User;

/// Access token payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: String,
    pub exp: i64,
}

/// Password hashing and HS256 bearer tokens.
#[derive(Clone)]
pub struct Credentials {
    bcrypt_cost: u32,
    encoding: EncodingKey,
    decoding: DecodingKey,
    token_ttl: Duration,
}

impl Credentials {
    pub fn new(secret: &str, token_ttl_minutes: i64, bcrypt_cost: u32) -> Self {
        Self {
            bcrypt_cost,
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            token_ttl: Duration::minutes(token_ttl_minutes),
        }
    }

    /// bcrypt is CPU-bound, so hashing runs on the blocking pool.
    pub async fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let password = password.to_string();
        let cost = self.bcrypt_cost;
        task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing task failed: {e}")))?
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to hash password: {e}")))
    }

    /// A malformed stored hash verifies as `false`.
    pub async fn verify_password(&self, password: &str, hashed: &str) -> Result<bool, AppError> {
        if password.is_empty() || hashed.is_empty() {
            return Ok(false);
        }
        let password = password.to_string();
        let hashed = hashed.to_string();
        task::spawn_blocking(move || bcrypt::verify(password, &hashed).unwrap_or(false))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Password check task failed: {e}")))
    }

    pub fn issue_token(&self, user: &User) -> Result<String, AppError> {
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role.clone(),
            exp: (Utc::now() + self.token_ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Token generation failed: {e}")))
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::Unauthorized(
                    "Token has expired, please login again!".to_string(),
                ),
                _ => AppError::Unauthorized("Could not validate credentials".to_string()),
            })
    }
}
