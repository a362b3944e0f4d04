use axum::{
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::sync::Arc;
use tracing::Span;

use crate::domain::models::auth::{AuthContext, Claims};
use crate::state::AppState;

pub const TOKEN_AUDIENCE: &str = "classbook";

/// Verified bearer identity. Token issuance belongs to the external auth
/// collaborator; this extractor only verifies the signature and lifts the
/// claims into an [`AuthContext`].
pub struct Auth(pub AuthContext);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(StatusCode::UNAUTHORIZED)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(StatusCode::UNAUTHORIZED)?;

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let decoding_key = DecodingKey::from_ed_pem(app_state.config.jwt_public_key.as_bytes())
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_audience(&[TOKEN_AUDIENCE]);

        let token_data = decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|_| StatusCode::UNAUTHORIZED)?;

        let ctx = AuthContext {
            profile_id: token_data.claims.sub,
            role: token_data.claims.role,
            tenant_id: token_data.claims.tenant_id,
        };

        Span::current().record("tenant_id", &ctx.tenant_id);
        Span::current().record("actor_id", &ctx.profile_id);

        Ok(Auth(ctx))
    }
}
