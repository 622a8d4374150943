use reqwest::Client;
use std::time::Duration;

use crate::Result;

const USER_AGENT: &str = concat!("conceptmap/", env!("CARGO_PKG_VERSION"));
const INITIAL_BACKOFF: Duration = Duration::from_millis(100);

/// Build the HTTP client shared by the lookup services.
///
/// `timeout` bounds each whole request; a timed-out call is treated the
/// same as any other failed call.
pub fn build_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// How hard one lookup call tries before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first, for transport errors and 5xx.
    pub max_retries: usize,
    /// Wall-clock budget for the whole call, retries and backoff included.
    pub deadline: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: usize, deadline: Duration) -> Self {
        Self { max_retries, deadline }
    }
}

/// Outcome of one GET attempt
enum Attempt {
    Body(String),
    Retryable(String),
    Failed(String),
}

/// GET `url` and return its body, retrying transport errors and 5xx
/// responses up to `policy.max_retries` times with exponential backoff.
///
/// Every failure is logged and collapses to `None`, as does an empty body
/// or running past `policy.deadline`.
pub(crate) async fn get_body(client: &Client, url: &str, policy: RetryPolicy) -> Option<String> {
    match tokio::time::timeout(policy.deadline, get_with_retry(client, url, policy.max_retries)).await {
        Ok(body) => body,
        Err(_) => {
            log::warn!("Request to {} exceeded its {:?} deadline", url, policy.deadline);
            None
        }
    }
}

async fn get_with_retry(client: &Client, url: &str, max_retries: usize) -> Option<String> {
    let mut attempt = 0;
    let mut delay = INITIAL_BACKOFF;

    loop {
        match get_once(client, url).await {
            Attempt::Body(body) => {
                // Only line breaks are dropped; other whitespace is left for the JSON decoder.
                if body.trim_matches(|c: char| c == '\n' || c == '\r').is_empty() {
                    log::warn!("Empty response body from {}", url);
                    return None;
                }
                return Some(body);
            }
            Attempt::Retryable(reason) if attempt < max_retries => {
                log::warn!("Retry {}/{} for {} after error: {}", attempt + 1, max_retries, url, reason);
                tokio::time::sleep(delay).await;
                delay *= 2;
                attempt += 1;
            }
            Attempt::Retryable(reason) | Attempt::Failed(reason) => {
                log::warn!("Request to {} failed: {}", url, reason);
                return None;
            }
        }
    }
}

async fn get_once(client: &Client, url: &str) -> Attempt {
    let response = match client.get(url).send().await {
        Ok(r) => r,
        Err(e) if e.is_timeout() => return Attempt::Retryable(format!("timed out: {}", e)),
        Err(e) => return Attempt::Retryable(format!("network error: {}", e)),
    };

    let status = response.status();
    if !status.is_success() {
        let reason = format!("HTTP status {}", status);
        return if status.is_server_error() {
            Attempt::Retryable(reason)
        } else {
            Attempt::Failed(reason)
        };
    }

    match response.text().await {
        Ok(body) => Attempt::Body(body),
        Err(e) => Attempt::Retryable(format!("failed to read body: {}", e)),
    }
}
