use crate::auth::session::{self, CurrentUser};
use crate::error::ForgeError;
use crate::router::ForgeState;
use axum::{
    Json,
    extract::{Form, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use oauth2::{AuthorizationCode, CsrfToken, PkceCodeChallenge, PkceCodeVerifier};
use serde::Deserialize;
use subtle::ConstantTimeEq;
use time::Duration;
use tracing::info;

const CSRF_COOKIE: &str = "oauth_csrf_token";
const PKCE_COOKIE: &str = "oauth_pkce_verifier";

#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub profile_pic: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct AuthCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
}

/// POST /signup -> create a local account and begin its session.
pub async fn signup(
    State(state): State<ForgeState>,
    jar: PrivateCookieJar,
    Form(form): Form<SignupForm>,
) -> Result<impl IntoResponse, ForgeError> {
    let user = state
        .identity
        .register(
            &form.name,
            &form.email,
            &form.password,
            form.profile_pic.as_deref().unwrap_or_default(),
        )
        .await?;
    let jar = session::establish(jar, &user.id);
    Ok((jar, Json(user)))
}

/// POST /login -> validate the local credential pair and begin a session.
pub async fn login(
    State(state): State<ForgeState>,
    jar: PrivateCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, ForgeError> {
    let user = state
        .identity
        .resolve_by_credentials(&form.email, &form.password)
        .await?;
    let jar = session::establish(jar, &user.id);
    info!(user = %user.id, "local login");
    Ok((jar, Json(user)))
}

/// GET /logout -> clear the session binding.
pub async fn logout(_actor: CurrentUser, jar: PrivateCookieJar) -> impl IntoResponse {
    (session::clear(jar), Redirect::to("/"))
}

/// GET /login/oauth -> redirect to the identity provider's consent page.
pub async fn oauth_entry(
    State(state): State<ForgeState>,
    jar: PrivateCookieJar,
) -> Result<impl IntoResponse, ForgeError> {
    let (challenge, verifier) = PkceCodeChallenge::new_random_sha256();
    let (auth_url, csrf_token) = state.oauth.authorize_url(challenge).await?;

    let jar = store_oauth_cookies(jar, &csrf_token, verifier.secret());

    info!("dispatching OAuth redirect");
    Ok((jar, Redirect::temporary(auth_url.as_ref())))
}

/// GET /login/oauth/callback -> exchange the code, resolve the identity,
/// and begin a session.
pub async fn oauth_callback(
    State(state): State<ForgeState>,
    Query(query): Query<AuthCallbackQuery>,
    jar: PrivateCookieJar,
) -> Response {
    let (pkce_verifier, csrf_cookie, jar) = match load_oauth_session(jar) {
        Ok(data) => data,
        Err((jar, err)) => return respond_with_error(jar, err),
    };

    let state_param = match query.state.as_deref() {
        Some(s) => s,
        None => {
            return respond_with_error(
                jar,
                ForgeError::OauthFlow("missing `state` in callback".to_string()),
            );
        }
    };

    if !bool::from(state_param.as_bytes().ct_eq(csrf_cookie.as_bytes())) {
        return respond_with_error(
            jar,
            ForgeError::OauthFlow("CSRF token mismatch".to_string()),
        );
    }

    let code = match query.code.as_deref() {
        Some(code) => code,
        None => {
            return respond_with_error(
                jar,
                ForgeError::OauthFlow("missing `code` in callback".to_string()),
            );
        }
    };

    let token = match state
        .oauth
        .exchange_code(
            AuthorizationCode::new(code.to_owned()),
            PkceCodeVerifier::new(pkce_verifier),
        )
        .await
    {
        Ok(token) => token,
        Err(err) => return respond_with_error(jar, err),
    };

    let identity = match state.oauth.fetch_identity(&token).await {
        Ok(identity) => identity,
        Err(err) => return respond_with_error(jar, err),
    };

    let user = match state.identity.resolve_by_external_assertion(identity).await {
        Ok(user) => user,
        Err(err) => return respond_with_error(jar, err),
    };

    let jar = session::establish(jar, &user.id);
    info!(user = %user.id, "external login");
    (jar, Redirect::to("/")).into_response()
}

fn store_oauth_cookies(
    jar: PrivateCookieJar,
    csrf: &CsrfToken,
    pkce_verifier: &str,
) -> PrivateCookieJar {
    jar.add(build_cookie(CSRF_COOKIE, csrf.secret().to_string()))
        .add(build_cookie(PKCE_COOKIE, pkce_verifier.to_string()))
}

fn load_oauth_session(
    jar: PrivateCookieJar,
) -> Result<(String, String, PrivateCookieJar), (PrivateCookieJar, ForgeError)> {
    let Some(csrf_cookie) = jar.get(CSRF_COOKIE).map(|c| c.value().to_owned()) else {
        let jar = clear_oauth_cookies(jar);
        return Err((
            jar,
            ForgeError::OauthFlow("Missing CSRF token in cookie".to_string()),
        ));
    };

    let Some(pkce_cookie) = jar.get(PKCE_COOKIE).map(|c| c.value().to_owned()) else {
        let jar = clear_oauth_cookies(jar);
        return Err((
            jar,
            ForgeError::OauthFlow("Missing PKCE verifier in cookie".to_string()),
        ));
    };

    let jar = clear_oauth_cookies(jar);

    Ok((pkce_cookie, csrf_cookie, jar))
}

fn clear_oauth_cookies(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(clear_cookie(CSRF_COOKIE))
        .remove(clear_cookie(PKCE_COOKIE))
}

fn build_cookie(name: &str, value: String) -> Cookie<'static> {
    Cookie::build(Cookie::new(name.to_string(), value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::minutes(15))
        .build()
}

fn clear_cookie(name: &str) -> Cookie<'static> {
    Cookie::build(Cookie::new(name.to_string(), ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

fn respond_with_error(jar: PrivateCookieJar, err: ForgeError) -> Response {
    (jar, err.into_response()).into_response()
}
