use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use url::Url;

/// Runtime configuration, resolved once at startup.
///
/// Defaults are overlaid with `FORGE_`-prefixed environment variables,
/// using `__` as the nesting separator (e.g. `FORGE_OAUTH__CLIENT_ID`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub loglevel: String,
    /// Key material for the private session cookies. Must be at least 32
    /// bytes when set; a throwaway key is generated when absent, which
    /// invalidates all sessions on restart.
    pub session_secret: Option<String>,
    /// Maximum number of rows returned by the browse listing.
    pub page_size: u32,
    pub oauth: OauthSettings,
    pub providers: ProviderSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:memeforge.sqlite".to_string(),
            bind_addr: "0.0.0.0:8000".to_string(),
            loglevel: "info".to_string(),
            session_secret: None,
            page_size: 15,
            oauth: OauthSettings::default(),
            providers: ProviderSettings::default(),
        }
    }
}

/// Identity provider settings. The provider is consumed through its
/// discovery document; only these four values are deployment-specific.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OauthSettings {
    pub discovery_url: Url,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: Url,
}

impl Default for OauthSettings {
    fn default() -> Self {
        Self {
            discovery_url: Url::parse(
                "https://accounts.google.com/.well-known/openid-configuration",
            )
            .expect("default discovery URL is valid"),
            client_id: String::new(),
            client_secret: String::new(),
            redirect_url: Url::parse("http://localhost:8000/login/oauth/callback")
                .expect("default redirect URL is valid"),
        }
    }
}

/// Base locations of the three content providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub quotes_base: Url,
    pub images_base: Url,
    pub captioner_url: Url,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            quotes_base: Url::parse("https://api.quotable.io")
                .expect("default quotes URL is valid"),
            images_base: Url::parse("https://api.waifu.pics")
                .expect("default images URL is valid"),
            captioner_url: Url::parse("https://api.memegen.link/images/custom")
                .expect("default captioner URL is valid"),
        }
    }
}

pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Figment::from(Serialized::defaults(Config::default()))
        .merge(Env::prefixed("FORGE_").split("__"))
        .extract()
        .expect("FATAL: invalid configuration")
});
