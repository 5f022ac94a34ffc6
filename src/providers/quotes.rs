use crate::error::ForgeError;
use serde::Deserialize;
use url::Url;

#[derive(Debug, Deserialize)]
struct QuotePayload {
    content: String,
}

/// Stateless quote provider client.
pub struct QuoteApi;

impl QuoteApi {
    /// GET {base}/random?tags=<tag> -> random quotation text for the tag.
    pub async fn random_by_tag(
        client: &reqwest::Client,
        base: &Url,
        tag: &str,
    ) -> Result<String, ForgeError> {
        let mut url = base.join("random")?;
        url.query_pairs_mut().append_pair("tags", tag);

        let payload: QuotePayload = client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ForgeError::upstream("quote", e))?
            .json()
            .await
            .map_err(|e| ForgeError::upstream("quote", e))?;
        Ok(payload.content)
    }
}
