use crate::config::DownloadConfig;
use crate::domain::model::HttpResponse;
use crate::domain::ports::HttpSource;
use crate::utils::error::{MirrorError, Result};
use reqwest::header::{
    HeaderMap, HeaderValue, CONTENT_DISPOSITION, CONTENT_TYPE, REFERER, RETRY_AFTER, USER_AGENT,
};
use reqwest::{Client, Response};
use std::time::Duration;

const MAX_REDIRECTS: usize = 10;
const MAX_RETRY_AFTER: Duration = Duration::from_secs(60);

/// Bounded retry for transient failures: 429/5xx responses, connect errors and timeouts.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: Duration,
    pub retry_statuses: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff: Duration::from_secs(1),
            retry_statuses: vec![429, 500, 502, 503, 504],
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &DownloadConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            backoff: config.backoff(),
            ..Self::default()
        }
    }

    pub fn should_retry_status(&self, status: u16) -> bool {
        self.retry_statuses.contains(&status)
    }

    /// Delay before retry number `retry` (0-based). A server-sent `Retry-After` wins.
    pub fn delay(&self, retry: u32, retry_after: Option<Duration>) -> Duration {
        if let Some(wait) = retry_after {
            return wait.min(MAX_RETRY_AFTER);
        }
        self.backoff.saturating_mul(2u32.saturating_pow(retry))
    }
}

pub fn build_http_client(config: &DownloadConfig) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, header_value("download.user_agent", &config.user_agent)?);
    if let Some(referer) = &config.referer {
        headers.insert(REFERER, header_value("download.referer", referer)?);
    }

    let client = Client::builder()
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .connect_timeout(config.request_timeout())
        .read_timeout(config.request_timeout())
        .pool_max_idle_per_host(config.workers)
        .build()?;

    Ok(client)
}

fn header_value(field: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| MirrorError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Pooled client that re-issues GETs per its [`RetryPolicy`].
#[derive(Debug, Clone)]
pub struct RetryingHttpClient {
    client: Client,
    policy: RetryPolicy,
}

impl RetryingHttpClient {
    pub fn new(client: Client, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    pub fn from_config(config: &DownloadConfig) -> Result<Self> {
        Ok(Self::new(
            build_http_client(config)?,
            RetryPolicy::from_config(config),
        ))
    }
}

impl HttpSource for RetryingHttpClient {
    type Body = Response;

    async fn get(&self, url: &str) -> Result<HttpResponse<Response>> {
        let mut retries = 0;
        loop {
            match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    if self.policy.should_retry_status(status) && retries < self.policy.max_retries
                    {
                        let delay = self.policy.delay(retries, retry_after(&response));
                        retries += 1;
                        tracing::warn!(
                            "HTTP {} from {}, retry {}/{} in {:?}",
                            status,
                            url,
                            retries,
                            self.policy.max_retries,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Ok(into_http_response(response));
                }
                Err(e) if is_transient(&e) && retries < self.policy.max_retries => {
                    let delay = self.policy.delay(retries, None);
                    retries += 1;
                    tracing::warn!(
                        "Request to {} failed ({}), retry {}/{} in {:?}",
                        url,
                        e,
                        retries,
                        self.policy.max_retries,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

fn is_transient(error: &reqwest::Error) -> bool {
    error.is_connect() || error.is_timeout()
}

fn retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

fn header_string(response: &Response, name: reqwest::header::HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn into_http_response(response: Response) -> HttpResponse<Response> {
    HttpResponse {
        status: response.status().as_u16(),
        content_type: header_string(&response, CONTENT_TYPE),
        content_disposition: header_string(&response, CONTENT_DISPOSITION),
        body: response,
    }
}
