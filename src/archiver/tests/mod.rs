use super::*;
use crate::config::RetryConfig;
use serde_json::{Value, json};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};


pub(super) const THING_ID: u64 = 11190;
pub(super) const MODIFIED: &str = "2024-01-01T00:00:00Z";

/// Config pointing at `server` with no throttling and no retries
pub(super) fn test_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.api.base_url = server.uri();
    config.api.token = Some("test-token".to_string());
    config.retry = RetryConfig::disabled();
    config
}

pub(super) fn test_archiver(server: &MockServer) -> Archiver {
    Archiver::new(test_config(server)).unwrap()
}

pub(super) async fn mount_json(server: &MockServer, at: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub(super) async fn mount_status(server: &MockServer, at: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(status).set_body_string("server says no"))
        .mount(server)
        .await;
}

pub(super) async fn mount_bytes(server: &MockServer, at: &str, bytes: &[u8]) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes.to_vec()))
        .mount(server)
        .await;
}

pub(super) fn cube_thing(modified: &str) -> Value {
    json!({
        "id": THING_ID,
        "name": "Calibration Cube",
        "modified": modified,
        "added": "2011-09-22T00:00:00+00:00",
        "public_url": "https://www.thingiverse.com/thing:11190",
        "creator": {"name": "tbuser", "public_url": "https://www.thingiverse.com/tbuser"},
        "license": "Creative Commons - Attribution",
        "description": "<p>A 20mm cube</p>",
        "is_featured": true
    })
}

pub(super) fn cube_files(server: &MockServer) -> Value {
    json!([{
        "id": 1,
        "name": "model.stl",
        "size": 11,
        "download_url": format!("{}/download/model.stl", server.uri())
    }])
}

pub(super) fn cube_images(server: &MockServer) -> Value {
    json!([{
        "id": 2,
        "name": "Cover",
        "sizes": [
            {"type": "thumb", "size": "small", "url": format!("{}/cdn/thumb.jpg", server.uri())},
            {"type": "display", "size": "large", "url": format!("{}/cdn/cover.PNG", server.uri())}
        ]
    }])
}

/// Mount the complete calibration cube: record, every category and both assets
pub(super) async fn mount_cube(server: &MockServer, modified: &str) {
    mount_json(server, "/things/11190", cube_thing(modified)).await;
    mount_json(server, "/things/11190/files", cube_files(server)).await;
    mount_json(server, "/things/11190/images", cube_images(server)).await;
    mount_json(
        server,
        "/things/11190/derivatives",
        json!([{"id": 99, "name": "Cube Remix", "public_url": "https://t/99"}]),
    )
    .await;
    mount_json(server, "/things/11190/copies", json!([{"id": 5}])).await;
    mount_json(
        server,
        "/things/11190/comments",
        json!([{"id": 7, "body": "Nice<br>cube", "user": {"name": "maker1"}}]),
    )
    .await;
    mount_bytes(server, "/download/model.stl", b"solid cube\n").await;
    mount_bytes(server, "/cdn/cover.PNG", b"\x89PNG").await;
}

/// Mount a thing with the given record and empty sub-resource lists
pub(super) async fn mount_bare_thing(server: &MockServer, id: u64, record: Value) {
    mount_json(server, &format!("/things/{id}"), record).await;
    for category in Category::ALL {
        mount_json(server, &format!("/things/{id}/{}", category.endpoint()), json!([])).await;
    }
}

pub(super) async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.unwrap().len()
}

pub(super) async fn requests_to(server: &MockServer, at: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == at)
        .count()
}

pub(super) fn read_manifest(dir: &Path) -> Value {
    serde_json::from_slice(&std::fs::read(dir.join(crate::manifest::MANIFEST_FILE)).unwrap())
        .unwrap()
}

pub(super) fn output_root() -> TempDir {
    TempDir::new().unwrap()
}
