use async_trait::async_trait;
use reqwest::Client;

use crate::lookup::client::{get_body, RetryPolicy};
use crate::lookup::ClaimsFetcher;

/// Fetches one-hop, forward traversals:
/// `GET {base}?id={entity}&direction=f&prop={relationship}&depth=1`.
pub struct HttpClaimsFetcher {
    client: Client,
    base_url: String,
    policy: RetryPolicy,
}

impl HttpClaimsFetcher {
    pub fn new(client: Client, base_url: String, policy: RetryPolicy) -> Self {
        Self {
            client,
            base_url,
            policy,
        }
    }

    pub fn traversal_url(&self, entity_id: &str, relationship_id: &str) -> String {
        let mut url = format!("{}?", self.base_url);
        url.push_str(
            &url::form_urlencoded::Serializer::new(String::new())
                .append_pair("id", entity_id)
                .append_pair("direction", "f")
                .append_pair("prop", relationship_id)
                .append_pair("depth", "1")
                .finish(),
        );
        url
    }
}

#[async_trait]
impl ClaimsFetcher for HttpClaimsFetcher {
    async fn fetch_claims(&self, entity_id: &str, relationship_id: &str) -> Option<String> {
        let url = self.traversal_url(entity_id, relationship_id);
        log::debug!("traversal url: {}", url);

        let body = get_body(&self.client, &url, self.policy).await;
        match &body {
            Some(b) => log::debug!("traversal response ({} bytes)", b.len()),
            None => log::warn!("No traversal document for {} / {}", entity_id, relationship_id),
        }
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::build_client;
    use crate::lookup::test_support::spawn_service;
    use axum::{extract::Query, http::StatusCode, routing::get, Router};
    use std::collections::HashMap;
    use std::time::Duration;

    fn fetcher(base_url: &str) -> HttpClaimsFetcher {
        HttpClaimsFetcher::new(
            build_client(Duration::from_millis(500)).unwrap(),
            base_url.to_string(),
            RetryPolicy::new(0, Duration::from_millis(500)),
        )
    }

    #[test]
    fn test_traversal_url_shape() {
        let f = fetcher("https://conceptmap.cfapps.io/traversal");
        assert_eq!(
            f.traversal_url("Q615", "P54"),
            "https://conceptmap.cfapps.io/traversal?id=Q615&direction=f&prop=P54&depth=1"
        );
    }

    #[tokio::test]
    async fn test_fetch_returns_raw_document() {
        let app = Router::new().route(
            "/traversal",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let expected = params.get("id").map(String::as_str) == Some("Q615")
                    && params.get("direction").map(String::as_str) == Some("f")
                    && params.get("prop").map(String::as_str) == Some("P54")
                    && params.get("depth").map(String::as_str) == Some("1");
                if expected {
                    Ok(r#"{"item":[]}"#)
                } else {
                    Err(StatusCode::BAD_REQUEST)
                }
            }),
        );
        let base = spawn_service(app).await;

        let doc = fetcher(&format!("{}/traversal", base)).fetch_claims("Q615", "P54").await;
        assert_eq!(doc.as_deref(), Some(r#"{"item":[]}"#));
    }

    #[tokio::test]
    async fn test_fetch_empty_body_is_none() {
        let app = Router::new().route("/traversal", get(|| async { "" }));
        let base = spawn_service(app).await;

        let doc = fetcher(&format!("{}/traversal", base)).fetch_claims("Q615", "P54").await;
        assert!(doc.is_none());
    }

    #[tokio::test]
    async fn test_fetch_server_error_is_none() {
        let app = Router::new().route("/traversal", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }));
        let base = spawn_service(app).await;

        let doc = fetcher(&format!("{}/traversal", base)).fetch_claims("Q615", "P54").await;
        assert!(doc.is_none());
    }
}
