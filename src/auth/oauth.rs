use crate::config::OauthSettings;
use crate::error::ForgeError;

use oauth2::{
    AuthUrl, AuthorizationCode, Client as OAuth2Client, ClientId, ClientSecret, CsrfToken,
    EndpointNotSet, EndpointSet, PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, Scope,
    StandardRevocableToken, TokenResponse, TokenUrl,
    basic::{
        BasicErrorResponse, BasicRevocationErrorResponse, BasicTokenIntrospectionResponse,
        BasicTokenResponse,
    },
};
use serde::Deserialize;
use tracing::info;
use url::Url;

/// The slice of the provider's discovery document this application uses.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderMetadata {
    pub authorization_endpoint: Url,
    pub token_endpoint: Url,
    pub userinfo_endpoint: Url,
}

/// Profile claims returned by the provider's userinfo endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ExternalIdentity {
    pub sub: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub given_name: String,
    #[serde(default)]
    pub picture: String,
}

/// External identity flow: discovery, authorization redirect, code exchange,
/// and profile fetch. Holds its configuration explicitly; no global client
/// state.
pub struct OauthFlow {
    cfg: OauthSettings,
    http: reqwest::Client,
}

impl OauthFlow {
    pub fn new(cfg: OauthSettings, http: reqwest::Client) -> Self {
        Self { cfg, http }
    }

    /// Fetch the provider's discovery document.
    async fn provider_metadata(&self) -> Result<ProviderMetadata, ForgeError> {
        let meta = self
            .http
            .get(self.cfg.discovery_url.clone())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ForgeError::OauthFlow(format!("discovery fetch failed: {e}")))?
            .json::<ProviderMetadata>()
            .await
            .map_err(|e| ForgeError::OauthFlow(format!("malformed discovery document: {e}")))?;
        Ok(meta)
    }

    /// Build the consent-page redirect with a PKCE challenge; returns the URL
    /// and the CSRF state to persist until the callback.
    pub async fn authorize_url(
        &self,
        challenge: PkceCodeChallenge,
    ) -> Result<(Url, CsrfToken), ForgeError> {
        let meta = self.provider_metadata().await?;
        let client = self.build_client(&meta);
        let (auth_url, csrf_token) = client
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new("openid".to_string()))
            .add_scope(Scope::new("email".to_string()))
            .add_scope(Scope::new("profile".to_string()))
            .set_pkce_challenge(challenge)
            .url();
        Ok((auth_url, csrf_token))
    }

    /// Exchange the callback code for a token set.
    pub async fn exchange_code(
        &self,
        code: AuthorizationCode,
        verifier: PkceCodeVerifier,
    ) -> Result<BasicTokenResponse, ForgeError> {
        let meta = self.provider_metadata().await?;
        let client = self.build_client(&meta);
        let token_response = client
            .exchange_code(code)
            .set_pkce_verifier(verifier)
            .request_async(&self.http)
            .await?;
        info!("authorization code exchanged");
        Ok(token_response)
    }

    /// Bearer-authenticated profile fetch.
    pub async fn fetch_identity(
        &self,
        token: &BasicTokenResponse,
    ) -> Result<ExternalIdentity, ForgeError> {
        let meta = self.provider_metadata().await?;
        let identity = self
            .http
            .get(meta.userinfo_endpoint)
            .bearer_auth(token.access_token().secret())
            .header("Accept", "application/json")
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ForgeError::OauthFlow(format!("userinfo fetch failed: {e}")))?
            .json::<ExternalIdentity>()
            .await
            .map_err(|e| ForgeError::OauthFlow(format!("malformed userinfo response: {e}")))?;
        if identity.email.is_empty() {
            return Err(ForgeError::OauthFlow(
                "missing email in userinfo response".to_string(),
            ));
        }
        Ok(identity)
    }

    fn build_client(&self, meta: &ProviderMetadata) -> ProviderOauth2Client {
        OAuth2Client::new(ClientId::new(self.cfg.client_id.clone()))
            .set_client_secret(ClientSecret::new(self.cfg.client_secret.clone()))
            .set_auth_uri(AuthUrl::from_url(meta.authorization_endpoint.clone()))
            .set_token_uri(TokenUrl::from_url(meta.token_endpoint.clone()))
            .set_redirect_uri(RedirectUrl::from_url(self.cfg.redirect_url.clone()))
    }
}

type ProviderOauth2Client = OAuth2Client<
    BasicErrorResponse,
    BasicTokenResponse,
    BasicTokenIntrospectionResponse,
    StandardRevocableToken,
    BasicRevocationErrorResponse,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;
