use memeforge::db::{Storage, connect};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Open a unique temp-file SQLite store with the schema applied. Callers
/// remove the file at the end of the test.
pub async fn setup_storage(label: &str) -> (Storage, PathBuf) {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut temp_path = std::env::temp_dir();
    temp_path.push(format!(
        "memeforge-{label}-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));

    let database_url = format!("sqlite:{}", temp_path.display());
    let pool = connect(&database_url)
        .await
        .expect("failed to open temp database");
    let storage = Storage::new(pool);
    storage.init_schema().await.expect("failed to init schema");

    (storage, temp_path)
}
