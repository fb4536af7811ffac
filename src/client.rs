use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::multipart::Form;
use reqwest::{Client as HttpClient, Method, Request, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::api::{Account, Cache, Folder, Item, Services, Transfer, Zip};
use crate::config::load_config;
use crate::error::{Error, Result, api_error_from_envelope};
use crate::params::{ParamValue, Params};
use crate::upload::FileSource;

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://www.premiumize.me/api/";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API key, sent as the `apikey` query parameter on every request.
    pub token: String,
    /// API root. Endpoint paths are appended to it verbatim, so it should end
    /// with `/`.
    pub base_url: String,
    /// Whole-request timeout applied to every call unless the call sets its own.
    pub timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
    /// Proxy URL for all schemes.
    pub proxy: Option<String>,
    /// Whether to verify TLS certificates.
    pub verify: bool,
    /// Extra headers sent with every request. Per-call headers win.
    pub headers: HeaderMap,
    pub user_agent: String,
    /// Show a progress bar in [`Client::download`].
    pub progress: bool,
}

impl ClientConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            connect_timeout: None,
            proxy: None,
            verify: true,
            headers: HeaderMap::new(),
            user_agent: format!("premiumize-rs/{}", env!("CARGO_PKG_VERSION")),
            progress: true,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }
}

/// Client for the premiumize.me API.
///
/// Cheap to clone; clones share the connection pool. Operations are grouped
/// behind [`folder`](Client::folder), [`item`](Client::item),
/// [`transfer`](Client::transfer), [`account`](Client::account),
/// [`zip`](Client::zip), [`cache`](Client::cache) and
/// [`services`](Client::services).
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    token: String,
    pub(crate) progress: bool,
    pub(crate) http: HttpClient,
}

impl Client {
    /// Creates a client for `token` against the production API.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::new(token))
    }

    /// Creates a client from environment variables and/or `.premiumizerc`.
    ///
    /// This is equivalent to `Client::load(None, None, None)`.
    pub fn from_env() -> Result<Self> {
        Self::load(None, None, None)
    }

    /// Creates a client using (in order of precedence):
    /// - explicit `base_url`/`token`/`verify` arguments
    /// - environment variables `PREMIUMIZE_URL` / `PREMIUMIZE_API_KEY`
    /// - config file from `PREMIUMIZE_RC` or `.premiumizerc`
    pub fn load(
        base_url: Option<String>,
        token: Option<String>,
        verify: Option<bool>,
    ) -> Result<Self> {
        let cfg = load_config(base_url, token, verify)?;
        Self::with_config(cfg)
    }

    pub fn with_config(cfg: ClientConfig) -> Result<Self> {
        let mut default_headers = cfg.headers.clone();
        if !default_headers.contains_key(USER_AGENT) {
            default_headers.insert(
                USER_AGENT,
                HeaderValue::from_str(&cfg.user_agent)
                    .unwrap_or(HeaderValue::from_static("premiumize-rs")),
            );
        }

        let mut builder = HttpClient::builder().default_headers(default_headers);

        if let Some(timeout) = cfg.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = cfg.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(proxy) = &cfg.proxy {
            let proxy = reqwest::Proxy::all(proxy)
                .with_context(|| format!("invalid proxy URL {}", proxy))?;
            builder = builder.proxy(proxy);
        }
        if !cfg.verify {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder.build().context("failed to build HTTP client")?;

        Ok(Self {
            base_url: cfg.base_url,
            token: cfg.token,
            progress: cfg.progress,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn folder(&self) -> Folder<'_> {
        Folder::new(self)
    }

    pub fn item(&self) -> Item<'_> {
        Item::new(self)
    }

    pub fn transfer(&self) -> Transfer<'_> {
        Transfer::new(self)
    }

    pub fn account(&self) -> Account<'_> {
        Account::new(self)
    }

    pub fn zip(&self) -> Zip<'_> {
        Zip::new(self)
    }

    pub fn cache(&self) -> Cache<'_> {
        Cache::new(self)
    }

    pub fn services(&self) -> Services<'_> {
        Services::new(self)
    }

    /// Sends one request and unwraps the response envelope.
    ///
    /// Resolves with the parsed body unchanged, or `None` for a zero-length
    /// HTTP 200 response. A body of only whitespace is not empty; it fails to
    /// parse and gives [`Error::Decode`].
    pub async fn call(&self, request: ApiRequest) -> Result<Option<Value>> {
        let binary = request.binary;
        let endpoint = request.endpoint.clone();
        let request = self.prepare(request).await?;

        debug!(method = %request.method(), endpoint = %endpoint, "sending API request");
        let resp = self.http.execute(request).await?;
        let status = resp.status();
        debug!(endpoint = %endpoint, status = status.as_u16(), "API response");

        let body = if binary {
            resp.bytes().await?.to_vec()
        } else {
            resp.text().await?.into_bytes()
        };

        let result = interpret_response(status, &body);
        if let Err(Error::Unspecified) = &result {
            warn!(
                endpoint = %endpoint,
                status = status.as_u16(),
                "empty response with non-200 status"
            );
        }
        result
    }

    /// Merges the per-call descriptor with the client's settings into a fresh
    /// request. Nothing the caller passed is modified.
    pub(crate) async fn prepare(&self, request: ApiRequest) -> Result<Request> {
        let ApiRequest {
            method,
            endpoint,
            query,
            form,
            file,
            headers,
            timeout,
            binary: _,
        } = request;

        let url = format!("{}{}", self.base_url, endpoint);

        let mut query = query;
        query.remove("apikey");
        query.set("apikey", self.token.as_str());

        let mut builder = self
            .http
            .request(method, url)
            .query(&query.pairs())
            .headers(headers);

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        builder = match file {
            Some((name, source)) => {
                let mut multipart = Form::new();
                for (k, v) in form.pairs() {
                    multipart = multipart.text(k, v);
                }
                multipart = multipart.part(name, source.into_part().await?);
                builder.multipart(multipart)
            }
            None if !form.is_empty() => builder.form(&form.pairs()),
            None => builder,
        };

        Ok(builder.build()?)
    }
}

/// Applies the envelope rules to a finished response.
pub(crate) fn interpret_response(status: StatusCode, body: &[u8]) -> Result<Option<Value>> {
    if body.is_empty() {
        return if status == StatusCode::OK {
            Ok(None)
        } else {
            Err(Error::Unspecified)
        };
    }

    let body: Value =
        serde_json::from_slice(body).map_err(|source| Error::Decode { status, source })?;

    match api_error_from_envelope(&body) {
        Some(err) => Err(Error::Api(err)),
        None => Ok(Some(body)),
    }
}

/// Descriptor for a single API call.
///
/// The grouped operations build these internally; [`Client::call`] accepts
/// one directly for endpoints without a dedicated method.
#[derive(Debug)]
pub struct ApiRequest {
    method: Method,
    endpoint: String,
    query: Params,
    form: Params,
    file: Option<(String, FileSource)>,
    headers: HeaderMap,
    timeout: Option<Duration>,
    binary: bool,
}

impl ApiRequest {
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            query: Params::new(),
            form: Params::new(),
            file: None,
            headers: HeaderMap::new(),
            timeout: None,
            binary: false,
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::GET, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::POST, endpoint)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.query.set(key, value);
        self
    }

    pub fn form(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.form.set(key, value);
        self
    }

    /// Attaches a file part; the body becomes `multipart/form-data`.
    pub fn file(mut self, key: impl Into<String>, source: FileSource) -> Self {
        self.file = Some((key.into(), source));
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Reads the body as raw bytes before parsing it as JSON.
    pub fn binary(mut self, binary: bool) -> Self {
        self.binary = binary;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
