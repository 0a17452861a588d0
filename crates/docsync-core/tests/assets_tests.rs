use docsync_core::assets;
use docsync_core::client::ServerClient;
use docsync_fs::compute_bytes_checksum;
use docsync_meta::{Credentials, PathContext, Target};
use docsync_test_utils::document::TestDocument;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn node(server: &MockServer, doc: &TestDocument) -> (ServerClient, PathContext) {
    let target = Target::new(server.uri(), Credentials::new("editor", "secret"), "/blog");
    let client = ServerClient::new(&target.server_url, &target.credentials);
    let node = PathContext::root(&target, doc.root()).unwrap();
    (client, node)
}

async fn serve_asset(server: &MockServer, name: &str, body: &[u8], expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/blog/uploads/{name}")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn first_pull_downloads_every_declared_upload_without_manifest() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/blog/uploads.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;
    for name in ["a.png", "b.png", "c.png"] {
        serve_asset(&server, name, name.as_bytes(), 1).await;
    }

    let doc = TestDocument::new();
    doc.settings(
        "",
        json!({"path": "/blog", "uploads": ["a.png", "b.png", "c.png"]}),
    )
    .write("content.md", "# Blog");
    let (client, node) = node(&server, &doc);

    let report = assets::download(&client, &node).await.unwrap();
    assert_eq!(report.transferred, vec!["a.png", "b.png", "c.png"]);
    assert_eq!(doc.read("uploads/b.png"), "b.png");
}

#[tokio::test]
async fn download_fetches_only_missing_or_changed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/blog/uploads.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "a.png", "hash": compute_bytes_checksum(b"aaa")},
            {"name": "b.png", "hash": compute_bytes_checksum(b"bbb")},
            {"name": "c.png", "hash": compute_bytes_checksum(b"ccc")},
        ])))
        .mount(&server)
        .await;
    serve_asset(&server, "a.png", b"aaa", 0).await;
    serve_asset(&server, "b.png", b"bbb", 0).await;
    serve_asset(&server, "c.png", b"ccc", 1).await;

    let doc = TestDocument::minimal("/blog");
    doc.write("uploads/a.png", "aaa")
        .write("uploads/b.png", "bbb")
        .write("uploads/c.png", "stale");
    let (client, node) = node(&server, &doc);

    let report = assets::download(&client, &node).await.unwrap();
    assert_eq!(report.transferred, vec!["c.png"]);
    assert_eq!(report.unchanged, vec!["a.png", "b.png"]);
    assert_eq!(doc.read("uploads/c.png"), "ccc");
}

#[tokio::test]
async fn one_failed_download_does_not_stop_the_rest() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/blog/uploads/broken.png"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    serve_asset(&server, "ok.png", b"ok", 1).await;

    let doc = TestDocument::new();
    doc.settings("", json!({"path": "/blog", "uploads": ["broken.png", "ok.png"]}))
        .write("content.md", "# Blog");
    let (client, node) = node(&server, &doc);

    let report = assets::download(&client, &node).await.unwrap();
    assert_eq!(report.transferred, vec!["ok.png"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].name, "broken.png");
    doc.assert_file_not_exists("uploads/broken.png");
}

#[tokio::test]
async fn upload_sends_only_changed_assets() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/blog/uploads.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "same.png", "hash": compute_bytes_checksum(b"same")},
            {"name": "edited.png", "hash": compute_bytes_checksum(b"old")},
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/blog/uploads"))
        .respond_with(ResponseTemplate::new(201))
        .expect(2)
        .mount(&server)
        .await;

    let doc = TestDocument::minimal("/blog");
    doc.write("uploads/same.png", "same")
        .write("uploads/edited.png", "new")
        .write("uploads/added.png", "added");
    let (client, node) = node(&server, &doc);

    let report = assets::upload(&client, &node).await.unwrap();
    assert_eq!(report.transferred, vec!["added.png", "edited.png"]);
    assert_eq!(report.unchanged, vec!["same.png"]);
}

#[tokio::test]
async fn delete_removes_server_assets_missing_locally() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/blog/uploads.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "kept.png", "hash": "sha256:00"},
            {"name": "gone.png", "hash": "sha256:11"},
        ])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/blog/uploads"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let doc = TestDocument::minimal("/blog");
    doc.write("uploads/kept.png", "k");
    let (client, node) = node(&server, &doc);

    let report = assets::delete(&client, &node).await.unwrap();
    assert_eq!(report.transferred, vec!["gone.png"]);

    let requests = server.received_requests().await.unwrap();
    let delete = requests
        .iter()
        .find(|r| r.method.as_str() == "DELETE")
        .unwrap();
    assert_eq!(delete.url.query(), Some("name=gone.png"));
}
