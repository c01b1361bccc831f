use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

pub const TOKEN_HEADER: &str = "x-access-token";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub exp: u64,
}

/// The authenticated caller, inserted into request extensions by
/// `require_token` and extracted by the protected handlers.
#[derive(Debug, Clone, Copy)]
pub struct Principal {
    pub user_id: i64,
}

/// Validates bearer credentials. Key and validation are built once at
/// startup from the configured secret.
pub struct AccessGate {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AccessGate {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
        }
    }

    pub fn authenticate(&self, token: &str) -> Result<Principal, jsonwebtoken::errors::Error> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(Principal {
            user_id: data.claims.user_id,
        })
    }
}

/// Absent header is "missing"; a header that is present but not valid UTF-8
/// is "invalid", like any other unusable credential.
fn extract_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let value = headers
        .get(TOKEN_HEADER)
        .ok_or_else(|| ApiError::unauthenticated("Token is missing!", None))?;

    value
        .to_str()
        .map_err(|error| ApiError::unauthenticated("Token is invalid!", Some(error.to_string())))
}

/// Middleware stage in front of every protected route. On success the
/// handler sees a `Principal`; on failure the request never reaches it.
pub async fn require_token(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(request.headers())?;

    let principal = state
        .gate
        .authenticate(token)
        .map_err(|error| ApiError::unauthenticated("Token is invalid!", Some(error.to_string())))?;

    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}
