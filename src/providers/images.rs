use crate::error::ForgeError;
use serde::Deserialize;
use url::Url;

#[derive(Debug, Deserialize)]
struct ImagePayload {
    url: String,
}

/// Stateless image provider client.
pub struct ImageApi;

impl ImageApi {
    /// GET {base}/sfw/<category> -> random image URL for the subcategory.
    pub async fn random_sfw(
        client: &reqwest::Client,
        base: &Url,
        category: &str,
    ) -> Result<String, ForgeError> {
        let url = base.join(&format!("sfw/{category}"))?;

        let payload: ImagePayload = client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ForgeError::upstream("image", e))?
            .json()
            .await
            .map_err(|e| ForgeError::upstream("image", e))?;
        Ok(payload.url)
    }
}
