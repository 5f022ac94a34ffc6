mod common;

use memeforge::db::{MemeSort, User};
use std::fs;

fn plain_user(id: &str, email: &str) -> User {
    User {
        id: id.to_string(),
        name: id.to_string(),
        email: email.to_string(),
        profile_pic: String::new(),
        password: None,
    }
}

#[tokio::test]
async fn browse_excludes_viewer_and_caps_page_size() {
    let (storage, path) = common::setup_storage("listing-page").await;

    let viewer = plain_user("viewer", "viewer@example.com");
    let author = plain_user("author", "author@example.com");
    storage.insert_user(&viewer).await.expect("insert viewer");
    storage.insert_user(&author).await.expect("insert author");

    for n in 0..3 {
        storage
            .insert_meme(&viewer.id, &format!("http://memes.example/own-{n}"))
            .await
            .expect("insert viewer meme");
    }
    for n in 0..20 {
        storage
            .insert_meme(&author.id, &format!("http://memes.example/other-{n}"))
            .await
            .expect("insert author meme");
    }

    let page = storage
        .list_browsable(&viewer.id, MemeSort::Recent, 15)
        .await
        .expect("listing failed");
    assert_eq!(page.len(), 15);
    assert!(page.iter().all(|ranked| ranked.meme.owner_id == author.id));

    // Newest first under the recency sort.
    let newest = page.first().expect("page is empty");
    assert_eq!(newest.meme.url, "http://memes.example/other-19");

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn browse_orders_by_like_count() {
    let (storage, path) = common::setup_storage("listing-likes").await;

    let viewer = plain_user("viewer", "viewer@example.com");
    let author = plain_user("author", "author@example.com");
    let fan = plain_user("fan", "fan@example.com");
    storage.insert_user(&viewer).await.expect("insert viewer");
    storage.insert_user(&author).await.expect("insert author");
    storage.insert_user(&fan).await.expect("insert fan");

    let cold = storage
        .insert_meme(&author.id, "http://memes.example/cold")
        .await
        .expect("insert meme");
    let warm = storage
        .insert_meme(&author.id, "http://memes.example/warm")
        .await
        .expect("insert meme");
    let hot = storage
        .insert_meme(&author.id, "http://memes.example/hot")
        .await
        .expect("insert meme");

    storage.insert_like(&viewer.id, hot.meme_id).await.expect("like");
    storage.insert_like(&fan.id, hot.meme_id).await.expect("like");
    storage.insert_like(&fan.id, warm.meme_id).await.expect("like");

    let page = storage
        .list_browsable(&viewer.id, MemeSort::Likes, 15)
        .await
        .expect("listing failed");
    let ordered: Vec<(i64, i64)> = page
        .iter()
        .map(|ranked| (ranked.meme.meme_id, ranked.likes))
        .collect();
    assert_eq!(
        ordered,
        vec![(hot.meme_id, 2), (warm.meme_id, 1), (cold.meme_id, 0)]
    );

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn duplicate_likes_collapse_to_one_row() {
    let (storage, path) = common::setup_storage("listing-dup-likes").await;

    let fan = plain_user("fan", "fan@example.com");
    let author = plain_user("author", "author@example.com");
    storage.insert_user(&fan).await.expect("insert fan");
    storage.insert_user(&author).await.expect("insert author");

    let meme = storage
        .insert_meme(&author.id, "http://memes.example/one")
        .await
        .expect("insert meme");

    let first = storage.insert_like(&fan.id, meme.meme_id).await.expect("like");
    let second = storage.insert_like(&fan.id, meme.meme_id).await.expect("like");
    assert!(first);
    assert!(!second);

    let likes = storage.like_count(meme.meme_id).await.expect("count");
    assert_eq!(likes, 1);

    let _ = fs::remove_file(&path);
}
