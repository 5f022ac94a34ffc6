use crate::db::User;
use crate::error::ForgeError;
use crate::router::ForgeState;
use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use time::Duration;

pub const SESSION_COOKIE: &str = "forge_session";

/// Bind the actor to the session after a successful resolution.
pub fn establish(jar: PrivateCookieJar, user_id: &str) -> PrivateCookieJar {
    let cookie = Cookie::build(Cookie::new(SESSION_COOKIE.to_string(), user_id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::days(7))
        .build();
    jar.add(cookie)
}

/// Clear the session binding on logout.
pub fn clear(jar: PrivateCookieJar) -> PrivateCookieJar {
    let cookie = Cookie::build(Cookie::new(SESSION_COOKIE.to_string(), String::new()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    jar.remove(cookie)
}

/// The authenticated actor attached to the session. Rejects with
/// `Unauthenticated` when no valid session cookie is present.
pub struct CurrentUser(pub User);

impl FromRequestParts<ForgeState> for CurrentUser {
    type Rejection = ForgeError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ForgeState,
    ) -> Result<Self, Self::Rejection> {
        let jar =
            <PrivateCookieJar as FromRequestParts<ForgeState>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ForgeError::Unauthenticated)?;
        let Some(cookie) = jar.get(SESSION_COOKIE) else {
            return Err(ForgeError::Unauthenticated);
        };
        let user = state
            .storage
            .user_by_id(cookie.value())
            .await?
            .ok_or(ForgeError::Unauthenticated)?;
        Ok(CurrentUser(user))
    }
}

impl OptionalFromRequestParts<ForgeState> for CurrentUser {
    type Rejection = ForgeError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ForgeState,
    ) -> Result<Option<Self>, Self::Rejection> {
        match <Self as FromRequestParts<ForgeState>>::from_request_parts(parts, state).await {
            Ok(actor) => Ok(Some(actor)),
            Err(ForgeError::Unauthenticated) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
