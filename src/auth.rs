use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::{
    extract::{Request, State},
    http::{Method, header, request::Parts},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{
    config::{AppConfig, Env},
    error::ApiError,
};

/// Lifetime of an issued access token.
pub const TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

/// TokenClaims
///
/// Payload signed into every access token and echoed back to the client on sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// The user's surface identifier.
    pub uuid: String,
    pub username: String,
    pub email: String,
    /// Comma-separated permission keys consumed by the admin UI.
    pub can_access: Option<String>,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

impl TokenClaims {
    /// Claims expiring `TOKEN_TTL_SECS` from now.
    pub fn new(uuid: &str, username: &str, email: &str, can_access: Option<String>) -> Self {
        Self {
            uuid: uuid.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            can_access,
            exp: Utc::now().timestamp() + TOKEN_TTL_SECS,
        }
    }
}

/// Argon2id hash in PHC string form, salted from the OS RNG.
pub fn hash_password(plain: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))
}

/// `Ok(false)` on mismatch. A stored hash that cannot be parsed is an internal error,
/// not a failed sign-in.
pub fn compare_password(plain: &str, hash: &str) -> Result<bool, ApiError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| ApiError::Internal(format!("stored password hash is invalid: {e}")))?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Signs `claims` with HS256.
pub fn issue_token(claims: &TokenClaims, secret: &str) -> Result<String, ApiError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("token signing failed: {e}")))
}

/// True only for a well-formed HS256 token with a valid signature that has not expired.
pub fn verify_token(token: &str, secret: &str) -> bool {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .is_ok()
}

/// Portfolio collections holding visitors' personal details; reading them needs a token.
const PRIVATE_PORTFOLIO: [&str; 2] = ["/v1/portfolio/contact-us", "/v1/portfolio/online-admission"];

fn is_private_portfolio(path: &str) -> bool {
    PRIVATE_PORTFOLIO.iter().any(|collection| {
        path.strip_prefix(collection)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}

/// is_public_route
///
/// Routes reachable without a token: sign-in, portfolio reads (the public website) other
/// than enquiries and admission applications, and online admission submissions.
pub fn is_public_route(method: &Method, path: &str) -> bool {
    match *method {
        Method::POST => path == "/v1/signin" || path == "/v1/portfolio/online-admission",
        Method::GET => path.starts_with("/v1/portfolio") && !is_private_portfolio(path),
        _ => false,
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

/// require_bearer
///
/// Middleware guarding every `/v1` route. In `Env::Local` the check is skipped entirely so
/// the admin UI can be developed without signing in. Preflight requests pass so the CORS
/// layer can answer them.
pub async fn require_bearer(
    State(config): State<AppConfig>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let path = request.uri().path();
    let guarded = config.env == Env::Production
        && path.starts_with("/v1/")
        && request.method() != Method::OPTIONS
        && !is_public_route(request.method(), path);

    if guarded {
        let (parts, body) = request.into_parts();
        let authorized = bearer_token(&parts).is_some_and(|token| verify_token(token, &config.jwt_secret));
        if !authorized {
            tracing::debug!(path = %parts.uri.path(), "rejected request without valid bearer token");
            return Err(ApiError::Unauthorized);
        }
        return Ok(next.run(Request::from_parts(parts, body)).await);
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    fn claims() -> TokenClaims {
        TokenClaims::new("u".repeat(21).as_str(), "Rahim", "rahim@example.edu", Some("admin".into()))
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("s3cret-pass").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(compare_password("s3cret-pass", &hash).unwrap());
        assert!(!compare_password("wrong-pass", &hash).unwrap());
    }

    #[test]
    fn malformed_stored_hash_is_an_error() {
        assert!(compare_password("anything", "not-a-phc-string").is_err());
    }

    #[test]
    fn issued_token_verifies_for_a_day() {
        let claims = claims();
        let token = issue_token(&claims, SECRET).unwrap();

        assert!(verify_token(&token, SECRET));
        assert!(!verify_token(&token, "another-secret"));
        assert!(claims.exp - Utc::now().timestamp() > TOKEN_TTL_SECS - 5);
    }

    #[test]
    fn expired_or_garbage_tokens_fail() {
        let mut expired = claims();
        expired.exp = Utc::now().timestamp() - 3600;
        let token = issue_token(&expired, SECRET).unwrap();

        assert!(!verify_token(&token, SECRET));
        assert!(!verify_token("not.a.token", SECRET));
        assert!(!verify_token("", SECRET));
    }

    #[test]
    fn public_allow_list() {
        assert!(is_public_route(&Method::POST, "/v1/signin"));
        assert!(is_public_route(&Method::POST, "/v1/portfolio/online-admission"));
        assert!(is_public_route(&Method::GET, "/v1/portfolio/offer"));
        assert!(is_public_route(&Method::GET, "/v1/portfolio/department-teachers/abc"));

        assert!(!is_public_route(&Method::POST, "/v1/portfolio/offer"));
        assert!(!is_public_route(&Method::DELETE, "/v1/portfolio/offer/abc"));
        assert!(!is_public_route(&Method::GET, "/v1/hr/users"));
        assert!(!is_public_route(&Method::GET, "/v1/signin"));
    }

    #[test]
    fn visitor_submissions_are_not_publicly_readable() {
        assert!(!is_public_route(&Method::GET, "/v1/portfolio/contact-us"));
        assert!(!is_public_route(&Method::GET, "/v1/portfolio/contact-us/abc"));
        assert!(!is_public_route(&Method::GET, "/v1/portfolio/online-admission"));
        assert!(!is_public_route(&Method::GET, "/v1/portfolio/online-admission/abc"));

        assert!(is_public_route(&Method::GET, "/v1/portfolio/contact-us-page"));
        assert!(is_public_route(&Method::GET, "/v1/portfolio/office"));
    }
}
