use crate::config::ProviderSettings;
use crate::db::{Meme, Storage, User};
use crate::error::ForgeError;
use crate::providers::{CaptionApi, ImageApi, QuoteApi, catalog};
use rand::seq::SliceRandom;
use tracing::{debug, info};
use url::Url;

/// Turns an authenticated request into a stored, shareable meme by calling
/// the content providers in sequence. The meme row is written only after
/// every upstream call has succeeded; there is nothing to roll back on
/// failure beyond the ephemeral network requests.
pub struct MemePipeline {
    http: reqwest::Client,
    storage: Storage,
    quotes_base: Url,
    images_base: Url,
    captioner_url: Url,
}

impl MemePipeline {
    pub fn new(storage: Storage, providers: &ProviderSettings, http: reqwest::Client) -> Self {
        Self {
            http,
            storage,
            quotes_base: providers.quotes_base.clone(),
            images_base: providers.images_base.clone(),
            captioner_url: providers.captioner_url.clone(),
        }
    }

    /// Generated-quote variant: random quotation for the tag, random image
    /// from a random subcategory, composed and persisted.
    pub async fn create_generated(&self, actor: &User, tag: &str) -> Result<Meme, ForgeError> {
        if !catalog::is_quote_tag(tag) {
            return Err(ForgeError::UnknownTag(tag.to_string()));
        }

        let quote = QuoteApi::random_by_tag(&self.http, &self.quotes_base, tag).await?;

        // Subcategory choice is uniform and independent of the quote tag.
        let category = catalog::IMAGE_CATEGORIES
            .choose(&mut rand::thread_rng())
            .copied()
            .expect("image category list is not empty");
        debug!(tag, category, "pipeline inputs resolved");

        let image_url = ImageApi::random_sfw(&self.http, &self.images_base, category).await?;

        self.compose_and_store(actor, &image_url, quote).await
    }

    /// Custom variant: caller-supplied background and caption, submitted
    /// directly to the compositing provider. The image URL is forwarded
    /// as-is; no format or reachability validation is performed.
    pub async fn create_custom(
        &self,
        actor: &User,
        image_url: &str,
        caption: &str,
    ) -> Result<Meme, ForgeError> {
        self.compose_and_store(actor, image_url, caption.to_string())
            .await
    }

    async fn compose_and_store(
        &self,
        actor: &User,
        background: &str,
        caption: String,
    ) -> Result<Meme, ForgeError> {
        let text = [caption];
        let composed_url =
            CaptionApi::compose(&self.http, &self.captioner_url, background, &text).await?;

        let meme = self.storage.insert_meme(&actor.id, &composed_url).await?;
        info!(user = %actor.id, meme_id = meme.meme_id, url = %meme.url, "stored new meme");
        Ok(meme)
    }
}
