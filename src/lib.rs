pub mod avatar;
mod cache;
pub mod error;
pub mod player;
pub mod role;
#[cfg(test)]
mod testing;
mod util;

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, error, info, instrument};
use url::Url;

pub use crate::{
    avatar::{Avatar, AvatarSize, AvatarSizes, AvatarUrl},
    error::KagError,
    player::{Player, PlayerInfo},
    role::Role,
};

/// A JSON object as returned by the API, kept verbatim.
pub type Document = serde_json::Map<String, Value>;

pub const URL: &str = "http://api.kag2d.com";
pub const BASE_URL_ENV: &str = "KAG_BASE_URL";

fn base_url() -> String {
    resolve_base_url(std::env::var(BASE_URL_ENV).ok())
}

fn resolve_base_url(env: Option<String>) -> String {
    match env {
        Some(url) if !url.trim().is_empty() => url,
        _ => URL.to_string(),
    }
}

/// Shared HTTP state for every lookup. Cloning is cheap; [`Player`] and
/// [`Avatar`] each keep their own clone.
#[derive(Debug, Clone)]
pub struct KagClient {
    http: reqwest::Client,
    base_url: Url,
}

impl KagClient {
    /// Uses `KAG_BASE_URL` when set, otherwise [`URL`].
    pub fn new() -> Result<Self, KagError> {
        Self::with_base_url(&base_url())
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, KagError> {
        Self::from_http_client(reqwest::Client::new(), base_url)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, KagError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Self::from_http_client(http, base_url)
    }

    pub fn from_http_client(http: reqwest::Client, base_url: &str) -> Result<Self, KagError> {
        let parsed = Url::parse(base_url)
            .map_err(|e| KagError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if parsed.cannot_be_a_base() {
            return Err(KagError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self {
            http,
            base_url: parsed,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn player(&self, nick: impl Into<String>) -> Player {
        Player::new(self.clone(), nick)
    }

    /// GETs `{base}/{segments...}` and returns the body as a JSON object.
    ///
    /// A non-success status still yields `Ok` when the body is a JSON object,
    /// since that is how the API reports unknown players.
    pub async fn get_json(&self, segments: &[&str]) -> Result<Document, KagError> {
        let url = self.endpoint(segments)?;
        self.fetch(url).await
    }

    /// Every segment lands in the path verbatim (percent-encoded). Segments the
    /// URL parser would drop or collapse (`""`, `.`, `..`) are rejected.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, KagError> {
        if let Some(segment) = segments
            .iter()
            .find(|segment| matches!(**segment, "" | "." | ".."))
        {
            return Err(KagError::InvalidPathSegment {
                segment: segment.to_string(),
            });
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| KagError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    #[instrument(skip_all, fields(url = %url))]
    pub(crate) async fn fetch(&self, url: Url) -> Result<Document, KagError> {
        info!("Fetching {url}");
        let response = self.http.get(url.clone()).send().await.map_err(|e| {
            error!("Request failed for {url}: {e}");
            KagError::from_transport(url.as_str(), e)
        })?;

        let status = response.status();
        debug!("Response status: {status}");

        let text = response.text().await.map_err(|e| {
            error!("Failed to read response body from {url}: {e}");
            KagError::from_transport(url.as_str(), e)
        })?;
        debug!("Response length: {} bytes", text.len());

        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(document)) => Ok(document),
            Ok(_) | Err(_) if !status.is_success() => {
                error!("HTTP {status} without a JSON object body (URL: {url})");
                Err(KagError::Status {
                    status: status.as_u16(),
                    url: url.to_string(),
                })
            }
            Ok(other) => {
                error!("Expected a JSON object from {url}, got: {other}");
                Err(KagError::UnexpectedShape {
                    url: url.to_string(),
                })
            }
            Err(source) => {
                let preview: String = text.chars().take(200).collect();
                error!("Failed to parse response from {url}: {source}, body: {preview}");
                Err(KagError::Json {
                    url: url.to_string(),
                    source,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    use super::*;
    use crate::testing::{client_for, not_found};

    #[test]
    fn base_url_defaults_to_api_host() {
        assert_eq!(resolve_base_url(None), "http://api.kag2d.com");
        assert_eq!(resolve_base_url(Some("  ".to_string())), URL);
        assert_eq!(
            resolve_base_url(Some("http://localhost:9000".to_string())),
            "http://localhost:9000"
        );
    }

    #[test]
    fn endpoint_appends_segments() {
        let client = KagClient::with_base_url(URL).unwrap();
        let url = client.endpoint(&["player", "prostosuper", "avatar", "s"]).unwrap();
        assert_eq!(url.as_str(), "http://api.kag2d.com/player/prostosuper/avatar/s");
    }

    #[test]
    fn endpoint_keeps_base_path_and_escapes_nick() {
        let client = KagClient::with_base_url("http://localhost:8080/kag/").unwrap();
        let url = client.endpoint(&["player", "some/nick", "info"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/kag/player/some%2Fnick/info");
    }

    #[test]
    fn endpoint_rejects_dot_and_empty_nicks() {
        let client = KagClient::with_base_url(URL).unwrap();
        for nick in ["", ".", ".."] {
            let err = client.endpoint(&["player", nick, "info"]).unwrap_err();
            assert!(
                matches!(&err, KagError::InvalidPathSegment { segment } if segment == nick),
                "{nick:?}: {err}"
            );
        }
        let url = client.endpoint(&["player", "...", "info"]).unwrap();
        assert_eq!(url.as_str(), "http://api.kag2d.com/player/.../info");
    }

    #[test]
    fn rejects_unusable_base_urls() {
        assert!(matches!(
            KagClient::with_base_url("not a url"),
            Err(KagError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            KagClient::with_base_url("mailto:someone@example.com"),
            Err(KagError::InvalidBaseUrl(_))
        ));
    }

    #[tokio::test]
    async fn not_found_status_with_json_body_is_a_document() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/player/foobarbazbaz/info"))
            .respond_with(ResponseTemplate::new(404).set_body_json(not_found()))
            .mount(&server)
            .await;

        let document = client_for(&server)
            .get_json(&["player", "foobarbazbaz", "info"])
            .await
            .unwrap();
        assert_eq!(document["statusMessage"], "Player not found");
    }

    #[tokio::test]
    async fn server_error_without_json_is_a_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get_json(&["player", "prostosuper", "info"])
            .await
            .unwrap_err();
        assert!(matches!(err, KagError::Status { status: 502, .. }));
    }

    #[tokio::test]
    async fn malformed_json_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"username\": "))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get_json(&["player", "prostosuper", "info"])
            .await
            .unwrap_err();
        assert!(matches!(err, KagError::Json { .. }));
    }

    #[tokio::test]
    async fn non_object_json_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["prostosuper"])))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get_json(&["player", "prostosuper", "info"])
            .await
            .unwrap_err();
        assert!(matches!(err, KagError::UnexpectedShape { .. }));
    }
}
