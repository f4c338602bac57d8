//! Shared test utilities and fixtures

#![allow(dead_code)]

use std::path::Path;
use std::time::Duration;

use denim_config::RagConfig;
use denim_engine::{App, AppOptions, FileStore};
use denim_types::FieldPath;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const DEBOUNCE: Duration = Duration::from_millis(500);

/// App backed by a real slot file in `storage`, exporting into `export`.
pub fn file_app(storage: &Path, export: &Path) -> App {
    let options = AppOptions {
        debounce: DEBOUNCE,
        export_dir: export.to_path_buf(),
        ..AppOptions::default()
    };
    App::new(Box::new(FileStore::new(storage)), options)
}

pub fn field(raw: &str) -> FieldPath {
    FieldPath::parse(raw).expect("catalog path")
}

/// `[rag]` section pointing at `server` under `/api`.
pub fn rag_config(server: &MockServer, api_key: Option<&str>) -> RagConfig {
    RagConfig {
        base_url: Some(format!("{}/api/", server.uri())),
        api_key: api_key.map(str::to_string),
        timeout_seconds: Some(5),
    }
}

/// Mount a JSON chat reply on `POST /api/chat`.
pub async fn mount_chat_reply(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}
