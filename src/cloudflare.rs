//! Cloudflare API Client
//!
//! Adapter over the v4 REST API with two operation families:
//! - JSON operations (`get`/`post`/`put`/`delete`) unwrap the
//!   `{success, result, errors}` envelope and return `result`.
//! - Raw operations (`get_raw`/`put_raw`/`delete_raw`) take absolute URLs and
//!   exchange plain text, as the Workers KV value endpoints do.

use std::fmt;

use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::CloudflareConfig;
use crate::error::CloudflareError;

pub type Result<T> = std::result::Result<T, CloudflareError>;

const USER_AGENT: &str = concat!("cloudflare-fabric/", env!("CARGO_PKG_VERSION"));

// ============================================================
// Envelope
// ============================================================

#[derive(Debug, Deserialize)]
struct ApiResponse {
    success: bool,
    // Some endpoints send `"errors": null`
    #[serde(default)]
    errors: Option<Vec<Value>>,
    #[serde(default)]
    result: Value,
}

// ============================================================
// Query parameters
// ============================================================

/// Ordered query parameters. Every value is stringified on insert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Query::push`].
    pub fn with(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: &str, value: impl fmt::Display) -> &mut Self {
        self.pairs.push((key.to_string(), value.to_string()));
        self
    }

    /// Push only when a value is present.
    pub fn push_opt<V: fmt::Display>(&mut self, key: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.push(key, value);
        }
        self
    }

    /// Coerce a JSON object of scalars into parameters.
    ///
    /// Strings are taken as-is, `null` is skipped, everything else uses its
    /// JSON rendering (`2` becomes `"2"`, `true` becomes `"true"`).
    pub fn from_json(params: &Map<String, Value>) -> Self {
        let mut query = Self::new();
        for (key, value) in params {
            match value {
                Value::Null => {}
                Value::String(s) => {
                    query.push(key, s);
                }
                other => {
                    query.push(key, other);
                }
            }
        }
        query
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Append to `url`'s query string, form-encoded.
    pub fn append_to(&self, url: &mut Url) {
        if self.pairs.is_empty() {
            return;
        }
        url.query_pairs_mut().extend_pairs(self.pairs.iter());
    }
}

// ============================================================
// Client
// ============================================================

/// Cloudflare API client
///
/// Holds only the immutable credentials captured at construction, so clones
/// can be used from concurrent tasks.
#[derive(Clone)]
pub struct CloudflareClient {
    client: Client,
    api_token: String,
    account_id: Option<String>,
    api_base: String,
}

impl CloudflareClient {
    /// Create a client. Fails with [`CloudflareError::MissingToken`] before
    /// anything touches the network when the token is empty.
    pub fn new(config: CloudflareConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            client,
            api_token: config.api_token,
            account_id: config.account_id,
            api_base: config.api_base,
        })
    }

    /// Default account for account-scoped endpoints
    pub fn account_id(&self) -> Option<&str> {
        self.account_id.as_deref()
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Absolute URL for an API path, e.g. `/zones` -> `<base>/zones`.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.api_base, path)
        } else {
            format!("{}/{}", self.api_base, path)
        }
    }

    // --------------------------------------------------------
    // JSON operations
    // --------------------------------------------------------

    pub async fn get(&self, path: &str, params: Option<&Query>) -> Result<Value> {
        self.request(Method::GET, path, params, None::<&Value>, HeaderMap::new())
            .await
    }

    pub async fn post<B>(&self, path: &str, body: Option<&B>) -> Result<Value>
    where
        B: Serialize + ?Sized + Sync,
    {
        self.request(Method::POST, path, None, body, HeaderMap::new())
            .await
    }

    pub async fn put<B>(&self, path: &str, body: Option<&B>) -> Result<Value>
    where
        B: Serialize + ?Sized + Sync,
    {
        self.request(Method::PUT, path, None, body, HeaderMap::new())
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.request(Method::DELETE, path, None, None::<&Value>, HeaderMap::new())
            .await
    }

    /// Issue a JSON request against `path` and unwrap the envelope.
    ///
    /// `Authorization` and `Content-Type: application/json` are set first;
    /// `headers` are merged afterwards and replace a default of the same name.
    pub async fn request<B>(
        &self,
        method: Method,
        path: &str,
        params: Option<&Query>,
        body: Option<&B>,
        headers: HeaderMap,
    ) -> Result<Value>
    where
        B: Serialize + ?Sized + Sync,
    {
        let url = resolve_url(&self.url(path), params)?;

        let mut request = self
            .client
            .request(method.clone(), url.clone())
            .bearer_auth(&self.api_token)
            .header(CONTENT_TYPE, "application/json")
            .headers(headers);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = self.send(&method, &url, request).await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!("Cloudflare {} {} failed with {}", method, url, status);
            return Err(CloudflareError::Transport {
                method: method.to_string(),
                url: url.to_string(),
                status: status.as_u16(),
                body: Some(text),
            });
        }

        let envelope: ApiResponse =
            response
                .json()
                .await
                .map_err(|source| CloudflareError::Decode {
                    url: url.to_string(),
                    source,
                })?;

        if !envelope.success {
            let errors = envelope.errors.unwrap_or_default();
            warn!(
                "Cloudflare {} {} returned success=false ({} errors)",
                method,
                url,
                errors.len()
            );
            return Err(CloudflareError::Api { errors });
        }

        Ok(envelope.result)
    }

    // --------------------------------------------------------
    // Raw operations
    // --------------------------------------------------------

    /// GET an absolute URL and return the body unparsed.
    pub async fn get_raw(&self, url: &str) -> Result<String> {
        let url = resolve_url(url, None)?;
        let request = self
            .client
            .get(url.clone())
            .bearer_auth(&self.api_token);

        let response = self.send(&Method::GET, &url, request).await?;
        let response = ensure_success(&Method::GET, &url, response)?;

        Ok(response.text().await?)
    }

    /// PUT `body` verbatim as `text/plain`, with `params` appended to `url`.
    pub async fn put_raw(&self, url: &str, body: &str, params: Option<&Query>) -> Result<()> {
        let url = resolve_url(url, params)?;
        let request = self
            .client
            .put(url.clone())
            .bearer_auth(&self.api_token)
            .header(CONTENT_TYPE, "text/plain")
            .body(body.to_owned());

        let response = self.send(&Method::PUT, &url, request).await?;
        ensure_success(&Method::PUT, &url, response)?;
        Ok(())
    }

    pub async fn delete_raw(&self, url: &str) -> Result<()> {
        let url = resolve_url(url, None)?;
        let request = self
            .client
            .delete(url.clone())
            .bearer_auth(&self.api_token);

        let response = self.send(&Method::DELETE, &url, request).await?;
        ensure_success(&Method::DELETE, &url, response)?;
        Ok(())
    }

    async fn send(&self, method: &Method, url: &Url, request: RequestBuilder) -> Result<Response> {
        debug!("Cloudflare {} {}", method, url);

        request.send().await.map_err(|err| {
            warn!("Cloudflare {} {} could not be sent: {}", method, url, err);
            CloudflareError::Request(err)
        })
    }
}

impl fmt::Debug for CloudflareClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudflareClient")
            .field("api_token", &"<redacted>")
            .field("account_id", &self.account_id)
            .field("api_base", &self.api_base)
            .finish()
    }
}

fn resolve_url(raw: &str, params: Option<&Query>) -> Result<Url> {
    let mut url = Url::parse(raw).map_err(|e| CloudflareError::InvalidUrl(format!("{}: {}", raw, e)))?;
    if let Some(params) = params {
        params.append_to(&mut url);
    }
    Ok(url)
}

/// Raw endpoints report failures by status only; the body is not read.
fn ensure_success(method: &Method, url: &Url, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    warn!("Cloudflare {} {} failed with {}", method, url, status);
    Err(CloudflareError::Transport {
        method: method.to_string(),
        url: url.to_string(),
        status: status.as_u16(),
        body: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> CloudflareClient {
        CloudflareClient::new(CloudflareConfig::new("test-token")).unwrap()
    }

    #[test]
    fn test_missing_token_fails_construction() {
        let result = CloudflareClient::new(CloudflareConfig::new(""));
        assert!(matches!(result, Err(CloudflareError::MissingToken)));
    }

    #[test]
    fn test_url_joins_base_and_path() {
        let cf = client();
        assert_eq!(cf.url("/zones"), "https://api.cloudflare.com/client/v4/zones");
        assert_eq!(cf.url("zones/z1"), "https://api.cloudflare.com/client/v4/zones/z1");
    }

    #[test]
    fn test_query_from_json_coerces_scalars() {
        let params = json!({"status": "active", "page": 2, "proxied": true, "skip": null});
        let query = Query::from_json(params.as_object().unwrap());

        let mut pairs = query.pairs().to_vec();
        pairs.sort();
        assert_eq!(
            pairs,
            vec![
                ("page".to_string(), "2".to_string()),
                ("proxied".to_string(), "true".to_string()),
                ("status".to_string(), "active".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_appends_encoded_pairs() {
        let mut url = Url::parse("https://api.cloudflare.com/client/v4/zones").unwrap();
        Query::new()
            .with("name", "a b&c")
            .with("page", 2)
            .append_to(&mut url);

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("name".to_string(), "a b&c".to_string()),
                ("page".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_query_leaves_url_untouched() {
        let mut url = Url::parse("https://api.cloudflare.com/client/v4/zones").unwrap();
        Query::new().append_to(&mut url);
        assert_eq!(url.as_str(), "https://api.cloudflare.com/client/v4/zones");
    }

    #[test]
    fn test_push_opt_skips_none() {
        let mut query = Query::new();
        query.push_opt("page", Some(3)).push_opt::<u32>("per_page", None);
        assert_eq!(query.pairs(), &[("page".to_string(), "3".to_string())]);
    }

    #[test]
    fn test_invalid_raw_url_is_rejected() {
        let err = resolve_url("not a url", None).unwrap_err();
        assert!(matches!(err, CloudflareError::InvalidUrl(_)));
    }

    #[test]
    fn test_debug_redacts_token() {
        let rendered = format!("{:?}", client());
        assert!(!rendered.contains("test-token"));
    }
}
