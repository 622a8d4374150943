use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::lookup::client::{get_body, RetryPolicy};
use crate::lookup::EntityResolver;

/// Response from the id locator service
#[derive(Deserialize)]
struct IdLocatorResponse {
    #[serde(rename = "itemId", default)]
    item_id: Option<String>,
}

/// Resolves item names through the id locator service:
/// `GET {base}?name={item}&lang={language}` -> `{ "itemId": "Q615" }`.
pub struct HttpEntityResolver {
    client: Client,
    base_url: String,
    language: String,
    policy: RetryPolicy,
}

impl HttpEntityResolver {
    pub fn new(client: Client, base_url: String, language: String, policy: RetryPolicy) -> Self {
        Self {
            client,
            base_url,
            language,
            policy,
        }
    }

    /// Lookup URL for `item_name`. Spaces are sent as `%20`.
    pub fn lookup_url(&self, item_name: &str) -> String {
        format!(
            "{}?name={}&lang={}",
            self.base_url,
            encode_component(item_name),
            encode_component(&self.language)
        )
    }
}

fn encode_component(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Pull the entity id out of an id locator body.
fn parse_item_id(body: &str) -> Option<String> {
    let response: IdLocatorResponse = match serde_json::from_str(body) {
        Ok(r) => r,
        Err(e) => {
            log::error!("Exception occurred while parsing id locator response: {}", e);
            return None;
        }
    };

    response.item_id.filter(|id| !id.is_empty())
}

#[async_trait]
impl EntityResolver for HttpEntityResolver {
    async fn resolve(&self, item_name: &str) -> Option<String> {
        let url = self.lookup_url(item_name);
        log::debug!("locate item id url: {}", url);

        let body = get_body(&self.client, &url, self.policy).await?;
        let item_id = parse_item_id(&body);

        log::info!("Resolved item '{}' to {:?}", item_name, item_id);
        item_id
    }
}
