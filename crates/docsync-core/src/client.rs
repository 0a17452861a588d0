//! HTTP client for the document server
//!
//! Every endpoint lives below the document base URL (server URL plus
//! document path) and every request carries a basic-auth header.

use docsync_meta::{Credentials, Settings, document_base};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One entry of a node's server-side asset manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteAsset {
    pub name: String,
    /// `sha256:<hex>`
    pub hash: String,
}

#[derive(Debug, Deserialize)]
struct ArchiveUploadResponse {
    path: Option<String>,
}

/// Client for one server and one set of credentials.
#[derive(Clone)]
pub struct ServerClient {
    http: Client,
    server_url: String,
    token: String,
}

impl ServerClient {
    pub fn new(server_url: &str, credentials: &Credentials) -> Self {
        Self {
            http: Client::new(),
            server_url: server_url.trim_end_matches('/').to_string(),
            token: credentials.basic_token(),
        }
    }

    /// Public URL of the document at `path`.
    pub fn document_url(&self, path: &str) -> String {
        document_base(&self.server_url, path)
    }

    fn endpoint(&self, path: &str, suffix: &str) -> String {
        format!("{}/{}", self.document_url(path), suffix)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header(reqwest::header::AUTHORIZATION, format!("Basic {}", self.token))
    }

    async fn send(&self, method: Method, url: &str, builder: RequestBuilder) -> Result<Response> {
        tracing::debug!(%method, %url, "Request");
        let response = builder.send().await?;
        check_status(&method, url, response)
    }

    /// Server-side settings of `path`, or `None` when the document does not
    /// exist on the server yet.
    pub async fn fetch_settings(&self, path: &str) -> Result<Option<Settings>> {
        let url = self.endpoint(path, "settings.json");
        let response = self.request(Method::GET, &url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check_status(&Method::GET, &url, response)?;
        Ok(Some(response.json().await?))
    }

    /// Asset manifest of `path`; a missing manifest is empty.
    pub async fn fetch_manifest(&self, path: &str) -> Result<Vec<RemoteAsset>> {
        let url = self.endpoint(path, "uploads.json");
        let response = self.request(Method::GET, &url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        let response = check_status(&Method::GET, &url, response)?;
        Ok(response.json().await?)
    }

    /// Download the tar+gzip archive of `path`.
    pub async fn download_archive(&self, path: &str) -> Result<Vec<u8>> {
        let url = self.endpoint(path, "archive.tar.gz");
        let response = self
            .send(Method::GET, &url, self.request(Method::GET, &url))
            .await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Upload a tar+gzip archive for `path`. Returns the path the server
    /// assigned, when the response names one.
    pub async fn upload_archive(&self, path: &str, archive: Vec<u8>) -> Result<Option<String>> {
        let url = self.endpoint(path, "archive.tar.gz");
        let builder = self
            .request(Method::POST, &url)
            .header(reqwest::header::CONTENT_TYPE, "application/gzip")
            .body(archive);
        let response = self.send(Method::POST, &url, builder).await?;

        let body = response.bytes().await?;
        if body.is_empty() {
            return Ok(None);
        }
        match serde_json::from_slice::<ArchiveUploadResponse>(&body) {
            Ok(response) => Ok(response.path),
            Err(e) => {
                tracing::warn!(%url, error = %e, "Ignoring malformed archive upload response");
                Ok(None)
            }
        }
    }

    /// Download one asset of `path`.
    pub async fn download_asset(&self, path: &str, name: &str) -> Result<Vec<u8>> {
        let url = self.endpoint(path, &format!("uploads/{}", urlencoding::encode(name)));
        let response = self
            .send(Method::GET, &url, self.request(Method::GET, &url))
            .await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Upload one asset of `path` as multipart field `file`.
    pub async fn upload_asset(&self, path: &str, name: &str, content: Vec<u8>) -> Result<()> {
        let url = self.endpoint(path, "uploads");
        let form = Form::new().part("file", Part::bytes(content).file_name(name.to_string()));
        self.send(
            Method::POST,
            &url,
            self.request(Method::POST, &url).multipart(form),
        )
        .await?;
        Ok(())
    }

    /// Delete one asset of `path`.
    pub async fn delete_asset(&self, path: &str, name: &str) -> Result<()> {
        let url = self.endpoint(path, "uploads");
        let builder = self
            .request(Method::DELETE, &url)
            .query(&[("name", name)]);
        self.send(Method::DELETE, &url, builder).await?;
        Ok(())
    }

    /// Request the rendered document once and discard the body.
    pub async fn fetch_document(&self, path: &str) -> Result<()> {
        let url = self.document_url(path);
        let response = self
            .send(Method::GET, &url, self.request(Method::GET, &url))
            .await?;
        response.bytes().await?;
        Ok(())
    }
}

fn check_status(method: &Method, url: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(Error::Http {
            method: method.to_string(),
            url: url.to_string(),
            status: status.as_u16(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{body_bytes, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> ServerClient {
        ServerClient::new(&server.uri(), &Credentials::new("editor", "secret"))
    }

    #[test]
    fn root_document_has_no_path_suffix() {
        let client = ServerClient::new("https://docs.example.com/", &Credentials::default());
        assert_eq!(client.document_url("/"), "https://docs.example.com");
        assert_eq!(
            client.endpoint("/blog", "uploads.json"),
            "https://docs.example.com/blog/uploads.json"
        );
    }

    #[tokio::test]
    async fn sends_basic_auth_and_parses_manifest() {
        let server = MockServer::start().await;
        let token = Credentials::new("editor", "secret").basic_token();
        Mock::given(method("GET"))
            .and(path("/blog/uploads.json"))
            .and(header("authorization", format!("Basic {token}").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"name": "a.png", "hash": "sha256:00"}
            ])))
            .mount(&server)
            .await;

        let manifest = client(&server).fetch_manifest("/blog").await.unwrap();
        assert_eq!(
            manifest,
            vec![RemoteAsset {
                name: "a.png".into(),
                hash: "sha256:00".into()
            }]
        );
    }

    #[tokio::test]
    async fn missing_settings_and_manifest_are_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = client(&server);
        assert_eq!(client.fetch_settings("/new").await.unwrap(), None);
        assert!(client.fetch_manifest("/new").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_success_carries_method_url_and_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/blog/archive.tar.gz"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client(&server).download_archive("/blog").await.unwrap_err();
        match err {
            Error::Http {
                method,
                url,
                status,
            } => {
                assert_eq!(method, "GET");
                assert_eq!(url, format!("{}/blog/archive.tar.gz", server.uri()));
                assert_eq!(status, 500);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn archive_upload_returns_server_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/draft/archive.tar.gz"))
            .and(header("content-type", "application/gzip"))
            .and(body_bytes(vec![1u8, 2, 3]))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "path": "/published"
            })))
            .mount(&server)
            .await;

        let assigned = client(&server)
            .upload_archive("/draft", vec![1, 2, 3])
            .await
            .unwrap();
        assert_eq!(assigned.as_deref(), Some("/published"));
    }

    #[tokio::test]
    async fn archive_upload_ignores_malformed_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/draft/archive.tar.gz"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let assigned = client(&server)
            .upload_archive("/draft", vec![1, 2, 3])
            .await
            .unwrap();
        assert_eq!(assigned, None);
    }

    #[tokio::test]
    async fn delete_uses_name_query() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/blog/uploads"))
            .and(query_param("name", "old file.png"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .delete_asset("/blog", "old file.png")
            .await
            .unwrap();
    }
}
