use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use uuid::Uuid;

/// Identity of the caller, as asserted by the gateway in front of this
/// service. Authentication itself happens upstream; this service only trusts
/// the forwarded header.
pub struct CurrentUser(pub Uuid);

pub const USER_HEADER: &str = "x-user-id";

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_HEADER)
            .and_then(|h| h.to_str().ok())
            .ok_or((StatusCode::UNAUTHORIZED, "missing X-User-Id header".into()))?;

        let user_id = raw
            .parse::<Uuid>()
            .map_err(|_| (StatusCode::UNAUTHORIZED, "invalid X-User-Id header".into()))?;

        Ok(CurrentUser(user_id))
    }
}
