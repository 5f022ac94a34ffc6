use crate::auth::session::CurrentUser;
use crate::db::{Meme, MemeSort, RankedMeme};
use crate::error::ForgeError;
use crate::providers::catalog::QUOTE_TAGS;
use crate::router::ForgeState;
use axum::{
    Json,
    extract::{Form, Path, Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

/// GET / -> the actor's profile and memes, or a login hint.
pub async fn home(
    State(state): State<ForgeState>,
    actor: Option<CurrentUser>,
) -> Result<Json<Value>, ForgeError> {
    match actor {
        Some(CurrentUser(user)) => {
            let memes = state.storage.memes_by_owner(&user.id).await?;
            Ok(Json(json!({
                "name": user.name,
                "email": user.email,
                "profile_pic": user.profile_pic,
                "memes": memes,
            })))
        }
        None => Ok(Json(json!({
            "message": "Log in via POST /login, POST /signup, or GET /login/oauth."
        }))),
    }
}

/// GET /tags -> the permitted quote tags for the generated variant.
pub async fn list_tags() -> Json<Value> {
    Json(json!({ "tags": QUOTE_TAGS }))
}

#[derive(Debug, Deserialize)]
pub struct GenerateForm {
    pub tag: String,
}

/// POST /memes -> generated-quote variant.
pub async fn create_generated(
    State(state): State<ForgeState>,
    CurrentUser(actor): CurrentUser,
    Form(form): Form<GenerateForm>,
) -> Result<Json<Meme>, ForgeError> {
    let meme = state.pipeline.create_generated(&actor, &form.tag).await?;
    Ok(Json(meme))
}

#[derive(Debug, Deserialize)]
pub struct CustomForm {
    pub image_url: String,
    pub caption: String,
}

/// POST /memes/custom -> caller-supplied background and caption.
pub async fn create_custom(
    State(state): State<ForgeState>,
    CurrentUser(actor): CurrentUser,
    Form(form): Form<CustomForm>,
) -> Result<Json<Meme>, ForgeError> {
    let meme = state
        .pipeline
        .create_custom(&actor, &form.image_url, &form.caption)
        .await?;
    Ok(Json(meme))
}

#[derive(Debug, Default, Deserialize)]
pub struct BrowseQuery {
    #[serde(default)]
    pub sort: MemeSort,
}

/// GET /memes?sort=recent|likes -> other users' memes, at most one page.
pub async fn browse(
    State(state): State<ForgeState>,
    CurrentUser(actor): CurrentUser,
    Query(query): Query<BrowseQuery>,
) -> Result<Json<Vec<RankedMeme>>, ForgeError> {
    let memes = state
        .storage
        .list_browsable(&actor.id, query.sort, state.page_size)
        .await?;
    Ok(Json(memes))
}

/// GET /memes/{meme_id} -> a single meme with its like count.
pub async fn show(
    State(state): State<ForgeState>,
    _actor: CurrentUser,
    Path(meme_id): Path<i64>,
) -> Result<Json<RankedMeme>, ForgeError> {
    let meme = state
        .storage
        .meme_by_id(meme_id)
        .await?
        .ok_or(ForgeError::NotFound)?;
    let likes = state.storage.like_count(meme_id).await?;
    Ok(Json(RankedMeme { meme, likes }))
}

/// POST /memes/{meme_id}/like -> record a like for the actor.
pub async fn like(
    State(state): State<ForgeState>,
    CurrentUser(actor): CurrentUser,
    Path(meme_id): Path<i64>,
) -> Result<Json<Value>, ForgeError> {
    if state.storage.meme_by_id(meme_id).await?.is_none() {
        return Err(ForgeError::NotFound);
    }
    let newly_liked = state.storage.insert_like(&actor.id, meme_id).await?;
    if !newly_liked {
        debug!(user = %actor.id, meme_id, "duplicate like ignored");
    }
    let likes = state.storage.like_count(meme_id).await?;
    Ok(Json(json!({ "meme_id": meme_id, "likes": likes })))
}
