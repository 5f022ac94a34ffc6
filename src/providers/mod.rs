//! Clients for the three external content providers, each consumed through a
//! single request/response contract.

pub mod captioner;
pub mod catalog;
pub mod images;
pub mod quotes;

pub use captioner::CaptionApi;
pub use images::ImageApi;
pub use quotes::QuoteApi;

use std::time::Duration;

/// Shared outbound HTTP client. Upstream calls carry explicit timeouts; an
/// unresponsive provider fails the request instead of blocking it.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent("memeforge/0.1")
        .connect_timeout(Duration::from_secs(5))
        .timeout(Duration::from_secs(15))
        .build()
        .expect("FATAL: initialize outbound HTTP client failed")
}
