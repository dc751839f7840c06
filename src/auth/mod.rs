use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;

pub mod session;

pub use session::{Session, SessionUser};

const BCRYPT_COST: u32 = 10;

/// Length of the public identifier carried by every resource.
pub const UUID_LENGTH: usize = 8;

/// Length of the per-user auth key.
pub const AUTH_KEY_LENGTH: usize = 16;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token is expired.")]
    RefreshExpired,

    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Identity the token was issued for (the user's email)
    pub sub: String,
    /// Internal numeric user id
    pub uid: i64,
    pub iss: String,
    pub exp: i64,
    /// Issue time of the first token in a refresh chain
    pub orig_iat: i64,
}

/// A freshly signed token and its expiry
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expire: DateTime<Utc>,
}

/// Sign a new token for `email`/`uid`, starting a new refresh chain.
pub fn issue_token(
    security: &SecurityConfig,
    realm: &str,
    email: &str,
    uid: i64,
) -> Result<IssuedToken, AuthError> {
    let now = Utc::now();
    sign(security, realm, email, uid, now, now.timestamp())
}

/// Re-sign a token, keeping its `orig_iat`, as long as the refresh window is still open.
pub fn refresh_token(security: &SecurityConfig, claims: &Claims) -> Result<IssuedToken, AuthError> {
    let now = Utc::now();
    if claims.orig_iat + security.max_refresh_secs < now.timestamp() {
        return Err(AuthError::RefreshExpired);
    }
    sign(security, &claims.iss, &claims.sub, claims.uid, now, claims.orig_iat)
}

fn sign(
    security: &SecurityConfig,
    realm: &str,
    email: &str,
    uid: i64,
    now: DateTime<Utc>,
    orig_iat: i64,
) -> Result<IssuedToken, AuthError> {
    let expire = now + Duration::seconds(security.token_timeout_secs);
    let claims = Claims {
        sub: email.to_string(),
        uid,
        iss: realm.to_string(),
        exp: expire.timestamp(),
        orig_iat,
    };

    let encoding_key = EncodingKey::from_secret(security.realm_key.as_bytes());
    let token = encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))?;

    let expire = Utc.timestamp_opt(claims.exp, 0).single().unwrap_or(expire);
    Ok(IssuedToken { token, expire })
}

/// Verify signature and expiry of `token` and return its claims.
pub fn validate_token(security: &SecurityConfig, token: &str) -> Result<Claims, AuthError> {
    decode_token(security, token, true)
}

/// Verify only the signature of `token`; used by refresh, which applies its own window.
pub fn decode_unexpired(security: &SecurityConfig, token: &str) -> Result<Claims, AuthError> {
    decode_token(security, token, false)
}

fn decode_token(security: &SecurityConfig, token: &str, validate_exp: bool) -> Result<Claims, AuthError> {
    let decoding_key = DecodingKey::from_secret(security.realm_key.as_bytes());
    let mut validation = Validation::default();
    validation.validate_exp = validate_exp;
    if !validate_exp {
        validation.required_spec_claims.remove("exp");
    }

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| AuthError::InvalidToken(e.to_string()))
}

/// One-way password hash, run on the blocking pool.
pub async fn hash_password(password: String) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, BCRYPT_COST))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Check `password` against a stored hash. Malformed hashes never match.
pub async fn verify_password(password: String, hash: String) -> bool {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
        .await
        .unwrap_or(false)
}

/// Random alphanumeric string used for public identifiers and auth keys.
pub fn random_string(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}
