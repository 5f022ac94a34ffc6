use chrono::{DateTime, Utc};
use serde::Serialize;

/// A registered account. `password` holds an Argon2 PHC string for
/// locally-registered accounts and is `None` for externally-authenticated
/// ones; it is never serialized into responses.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub profile_pic: String,
    #[serde(skip_serializing)]
    pub password: Option<String>,
}

/// A stored artifact: one composed image owned by one user.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Meme {
    pub meme_id: i64,
    pub owner_id: String,
    pub url: String,
    pub date_of_creation: DateTime<Utc>,
}

/// A meme joined with its like count, as returned by the browse listing.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RankedMeme {
    #[serde(flatten)]
    pub meme: Meme,
    pub likes: i64,
}
