use crate::error::ForgeError;
use serde::{Deserialize, Serialize};
use url::Url;

const LAYOUT: &str = "top";
const FONT: &str = "notosans";
const EXTENSION: &str = "jpg";

/// Composition request submitted to the captioning provider.
#[derive(Debug, Serialize)]
struct CompositionRequest<'a> {
    background: &'a str,
    text: &'a [String],
    layout: &'a str,
    font: &'a str,
    extension: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompositionPayload {
    url: String,
}

/// Stateless caption-compositing provider client.
pub struct CaptionApi;

impl CaptionApi {
    /// POST the background/text composition; returns the composed image URL.
    pub async fn compose(
        client: &reqwest::Client,
        endpoint: &Url,
        background: &str,
        text: &[String],
    ) -> Result<String, ForgeError> {
        let body = CompositionRequest {
            background,
            text,
            layout: LAYOUT,
            font: FONT,
            extension: EXTENSION,
        };

        let payload: CompositionPayload = client
            .post(endpoint.clone())
            .json(&body)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ForgeError::upstream("captioner", e))?
            .json()
            .await
            .map_err(|e| ForgeError::upstream("captioner", e))?;
        Ok(payload.url)
    }
}
