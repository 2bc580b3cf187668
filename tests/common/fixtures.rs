//! Canned Thingiverse API responses

use serde_json::{Value, json};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::config::TEST_TOKEN;

/// Bytes served for every downloaded file
pub const STL_BYTES: &[u8] = b"solid gear\nendsolid gear\n";

/// Bytes served for every downloaded image
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n";

/// A thing as it would be archived: its record and the lists hanging off it
pub struct ThingFixture {
    /// Numeric thing id
    pub id: u64,
    /// Display name
    pub name: &'static str,
    /// Modification timestamp
    pub modified: &'static str,
    /// File names served under `/things/{id}/files`
    pub files: Vec<&'static str>,
    /// Image names served under `/things/{id}/images`
    pub images: Vec<&'static str>,
    /// Number of comments
    pub comments: usize,
}

impl ThingFixture {
    /// A thing with one file, one image and one comment
    pub fn simple(id: u64, name: &'static str) -> Self {
        Self {
            id,
            name,
            modified: "2024-01-01T00:00:00Z",
            files: vec!["part.stl"],
            images: vec!["Render"],
            comments: 1,
        }
    }

    /// Full thing record
    pub fn record(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "modified": self.modified,
            "added": "2020-05-05T05:05:05+00:00",
            "public_url": format!("https://www.thingiverse.com/thing:{}", self.id),
            "creator": {"name": "tbuser", "public_url": "https://www.thingiverse.com/tbuser"},
            "license": "GNU - GPL",
            "like_count": 3,
            "download_count": "1.2k",
            "instructions": null,
            "ancestors": [],
            "tags": [{"name": "gear"}],
            "description": "<p>Fixture thing</p>",
            "thumbnail": "https://cdn.example.com/thumb.jpg"
        })
    }

    /// Listing entry for `/users/{name}/things`
    pub fn summary(&self) -> Value {
        json!({"id": self.id, "name": self.name})
    }

    /// Mount the record, every list and every asset on `server`
    pub async fn mount(&self, server: &MockServer) {
        let id = self.id;
        let base = server.uri();

        let files: Vec<Value> = self
            .files
            .iter()
            .enumerate()
            .map(|(i, name)| {
                json!({
                    "id": i + 1,
                    "name": name,
                    "size": STL_BYTES.len(),
                    "download_url": format!("{base}/api/files/{id}/{i}/download")
                })
            })
            .collect();
        let images: Vec<Value> = self
            .images
            .iter()
            .enumerate()
            .map(|(i, name)| {
                json!({
                    "id": i + 1,
                    "name": name,
                    "sizes": [{"type": "display", "size": "large", "url": format!("{base}/cdn/{id}/{i}.png")}]
                })
            })
            .collect();
        let comments: Vec<Value> = (0..self.comments)
            .map(|i| json!({"id": i, "body": format!("comment {i}"), "user": {"name": "fan"}}))
            .collect();

        mount_authenticated(server, &format!("/things/{id}"), self.record()).await;
        mount_authenticated(server, &format!("/things/{id}/files"), Value::Array(files)).await;
        mount_authenticated(server, &format!("/things/{id}/images"), Value::Array(images)).await;
        mount_authenticated(server, &format!("/things/{id}/derivatives"), json!([])).await;
        mount_authenticated(server, &format!("/things/{id}/copies"), json!([])).await;
        mount_authenticated(server, &format!("/things/{id}/comments"), Value::Array(comments)).await;

        for i in 0..self.files.len() {
            Mock::given(method("GET"))
                .and(path(format!("/api/files/{id}/{i}/download")))
                .and(header("Authorization", format!("Bearer {TEST_TOKEN}").as_str()))
                .respond_with(ResponseTemplate::new(200).set_body_bytes(STL_BYTES.to_vec()))
                .mount(server)
                .await;
        }
        for i in 0..self.images.len() {
            Mock::given(method("GET"))
                .and(path(format!("/cdn/{id}/{i}.png")))
                .respond_with(ResponseTemplate::new(200).set_body_bytes(PNG_BYTES.to_vec()))
                .mount(server)
                .await;
        }
    }
}

/// Mount a JSON response that requires the test token
pub async fn mount_authenticated(server: &MockServer, at: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(at))
        .and(header("Authorization", format!("Bearer {TEST_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount a single-page listing of `things` for `user`
pub async fn mount_listing(server: &MockServer, user: &str, things: &[&ThingFixture]) {
    let entries: Vec<Value> = things.iter().map(|t| t.summary()).collect();
    mount_authenticated(server, &format!("/users/{user}/things"), Value::Array(entries)).await;
}
