mod common;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use memeforge::config::ProviderSettings;
use memeforge::providers::http_client;
use memeforge::{ForgeError, IdentityResolver, MemePipeline};
use serde_json::{Value, json};
use std::fs;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use url::Url;

/// In-process stand-in for all three content providers.
#[derive(Clone, Default)]
struct ProviderStub {
    compose_bodies: Arc<Mutex<Vec<Value>>>,
    break_quotes: bool,
}

async fn quote_route(State(stub): State<ProviderStub>) -> Json<Value> {
    if stub.break_quotes {
        Json(json!({ "oops": true }))
    } else {
        Json(json!({ "content": "X" }))
    }
}

async fn image_route() -> Json<Value> {
    Json(json!({ "url": "Y" }))
}

async fn compose_route(State(stub): State<ProviderStub>, Json(body): Json<Value>) -> Json<Value> {
    stub.compose_bodies
        .lock()
        .expect("stub lock poisoned")
        .push(body);
    Json(json!({ "url": "Z" }))
}

async fn spawn_stub(stub: ProviderStub) -> Url {
    let app = Router::new()
        .route("/random", get(quote_route))
        .route("/sfw/{category}", get(image_route))
        .route("/compose", post(compose_route))
        .with_state(stub);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind stub listener");
    let addr = listener.local_addr().expect("stub has no local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server died");
    });
    Url::parse(&format!("http://{addr}")).expect("stub url invalid")
}

fn provider_settings(base: &Url) -> ProviderSettings {
    ProviderSettings {
        quotes_base: base.clone(),
        images_base: base.clone(),
        captioner_url: base.join("compose").expect("compose url invalid"),
    }
}

#[tokio::test]
async fn generated_variant_composes_and_persists() {
    let (storage, path) = common::setup_storage("pipeline-generated").await;
    let resolver = IdentityResolver::new(storage.clone());
    let actor = resolver
        .register("Ada", "ada@example.com", "pw", "")
        .await
        .expect("register failed");

    let stub = ProviderStub::default();
    let base = spawn_stub(stub.clone()).await;
    let pipeline = MemePipeline::new(storage.clone(), &provider_settings(&base), http_client());

    let meme = pipeline
        .create_generated(&actor, "humor")
        .await
        .expect("pipeline failed");
    assert_eq!(meme.url, "Z");
    assert_eq!(meme.owner_id, actor.id);

    let owned = storage
        .memes_by_owner(&actor.id)
        .await
        .expect("owner listing failed");
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].url, "Z");

    let bodies = stub.compose_bodies.lock().expect("stub lock poisoned");
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["background"], "Y");
    assert_eq!(bodies[0]["text"], json!(["X"]));
    assert_eq!(bodies[0]["layout"], "top");
    assert_eq!(bodies[0]["extension"], "jpg");
    drop(bodies);

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn custom_variant_forwards_caption_and_background() {
    let (storage, path) = common::setup_storage("pipeline-custom").await;
    let resolver = IdentityResolver::new(storage.clone());
    let actor = resolver
        .register("Ada", "ada@example.com", "pw", "")
        .await
        .expect("register failed");

    let stub = ProviderStub::default();
    let base = spawn_stub(stub.clone()).await;
    let pipeline = MemePipeline::new(storage.clone(), &provider_settings(&base), http_client());

    let meme = pipeline
        .create_custom(&actor, "http://img", "hello")
        .await
        .expect("pipeline failed");
    assert_eq!(meme.url, "Z");

    let bodies = stub.compose_bodies.lock().expect("stub lock poisoned");
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["background"], "http://img");
    assert_eq!(bodies[0]["text"], json!(["hello"]));
    drop(bodies);

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn unknown_tag_is_rejected_before_any_call() {
    let (storage, path) = common::setup_storage("pipeline-unknown-tag").await;
    let resolver = IdentityResolver::new(storage.clone());
    let actor = resolver
        .register("Ada", "ada@example.com", "pw", "")
        .await
        .expect("register failed");

    let stub = ProviderStub::default();
    let base = spawn_stub(stub.clone()).await;
    let pipeline = MemePipeline::new(storage.clone(), &provider_settings(&base), http_client());

    let err = pipeline
        .create_generated(&actor, "definitely-not-a-tag")
        .await
        .unwrap_err();
    assert!(matches!(err, ForgeError::UnknownTag(_)));

    let owned = storage
        .memes_by_owner(&actor.id)
        .await
        .expect("owner listing failed");
    assert!(owned.is_empty());
    assert!(stub.compose_bodies.lock().expect("stub lock poisoned").is_empty());

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn malformed_quote_payload_aborts_without_persisting() {
    let (storage, path) = common::setup_storage("pipeline-broken-quotes").await;
    let resolver = IdentityResolver::new(storage.clone());
    let actor = resolver
        .register("Ada", "ada@example.com", "pw", "")
        .await
        .expect("register failed");

    let stub = ProviderStub {
        break_quotes: true,
        ..ProviderStub::default()
    };
    let base = spawn_stub(stub.clone()).await;
    let pipeline = MemePipeline::new(storage.clone(), &provider_settings(&base), http_client());

    let err = pipeline.create_generated(&actor, "humor").await.unwrap_err();
    assert!(matches!(err, ForgeError::Upstream { provider: "quote", .. }));

    let owned = storage
        .memes_by_owner(&actor.id)
        .await
        .expect("owner listing failed");
    assert!(owned.is_empty());
    assert!(stub.compose_bodies.lock().expect("stub lock poisoned").is_empty());

    let _ = fs::remove_file(&path);
}
