use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use indexmap::IndexMap;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use snafu::{ResultExt, ensure};
use url::Url;

use crate::error::{
    BuildClientSnafu, ClientResult, DecodeBodySnafu, EncodeBodySnafu, InvalidHeaderNameSnafu,
    InvalidHeaderValueSnafu, InvalidUrlSnafu, StatusSnafu, TimeoutSnafu, TransportSnafu,
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const CONTENT_TYPE: &str = "content-type";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Header names are stored lower-cased.
pub type Headers = IndexMap<String, String>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Only POST, PUT and PATCH carry a body.
    pub fn carries_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
            Method::Put => Self::PUT,
            Method::Patch => Self::PATCH,
            Method::Delete => Self::DELETE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpClientConfig {
    pub base_url: String,
    pub headers: Headers,
    pub timeout: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            headers: Headers::from([(CONTENT_TYPE.to_string(), JSON_CONTENT_TYPE.to_string())]),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl HttpClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// One outgoing request, as seen by request interceptors.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestConfig {
    pub method: Method,
    /// Relative to the base URL unless it starts with `http`.
    pub url: String,
    pub headers: Headers,
    pub data: Option<Value>,
}

impl RequestConfig {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Headers::new(),
            data: None,
        }
    }

    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_headers(mut self, headers: &Headers) -> Self {
        for (name, value) in headers {
            self.headers.insert(name.to_ascii_lowercase(), value.clone());
        }
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseData {
    Json(Value),
    Text(String),
}

impl ResponseData {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub data: ResponseData,
    pub status: u16,
    pub status_text: String,
    pub headers: Headers,
}

/// Transforms each request before it is sent. Interceptors run in registration order.
pub trait RequestInterceptor: Send + Sync {
    fn intercept(&self, request: RequestConfig) -> BoxFuture<'_, ClientResult<RequestConfig>>;
}

impl<F, Fut> RequestInterceptor for F
where
    F: Fn(RequestConfig) -> Fut + Send + Sync,
    Fut: Future<Output = ClientResult<RequestConfig>> + Send + 'static,
{
    fn intercept(&self, request: RequestConfig) -> BoxFuture<'_, ClientResult<RequestConfig>> {
        Box::pin(self(request))
    }
}

/// Transforms each successful response. Interceptors run in registration order.
pub trait ResponseInterceptor: Send + Sync {
    fn intercept(&self, response: HttpResponse) -> BoxFuture<'_, ClientResult<HttpResponse>>;
}

impl<F, Fut> ResponseInterceptor for F
where
    F: Fn(HttpResponse) -> Fut + Send + Sync,
    Fut: Future<Output = ClientResult<HttpResponse>> + Send + 'static,
{
    fn intercept(&self, response: HttpResponse) -> BoxFuture<'_, ClientResult<HttpResponse>> {
        Box::pin(self(response))
    }
}

/// Request/response wrapper with default headers, a per-request timeout and
/// interceptor chains. No retries.
pub struct HttpClient {
    config: HttpClientConfig,
    inner: reqwest::Client,
    request_interceptors: Vec<Box<dyn RequestInterceptor>>,
    response_interceptors: Vec<Box<dyn ResponseInterceptor>>,
}

impl HttpClient {
    pub fn new(config: HttpClientConfig) -> ClientResult<Self> {
        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context(BuildClientSnafu {
                stage: "build-http-client",
            })?;

        Ok(Self {
            config,
            inner,
            request_interceptors: Vec::new(),
            response_interceptors: Vec::new(),
        })
    }

    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    pub fn add_request_interceptor(&mut self, interceptor: impl RequestInterceptor + 'static) {
        self.request_interceptors.push(Box::new(interceptor));
    }

    pub fn add_response_interceptor(&mut self, interceptor: impl ResponseInterceptor + 'static) {
        self.response_interceptors.push(Box::new(interceptor));
    }

    /// Absolute URLs bypass the base URL.
    pub fn resolve_url(&self, url: &str) -> String {
        if url.starts_with("http") {
            url.to_string()
        } else {
            format!("{}{}", self.config.base_url, url)
        }
    }

    pub async fn request(&self, request: RequestConfig) -> ClientResult<HttpResponse> {
        let mut request = request;
        for interceptor in &self.request_interceptors {
            request = interceptor.intercept(request).await?;
        }

        let target = self.resolve_url(&request.url);
        let url = Url::parse(&target).context(InvalidUrlSnafu {
            stage: "parse-request-url",
            url: target.clone(),
        })?;

        let mut headers = self.config.headers.clone();
        headers.extend(
            request
                .headers
                .iter()
                .map(|(name, value)| (name.to_ascii_lowercase(), value.clone())),
        );

        let mut builder = self
            .inner
            .request(request.method.into(), url)
            .headers(header_map(&headers)?);

        if request.method.carries_body()
            && let Some(data) = &request.data
        {
            builder = builder.body(encode_body(&headers, data)?);
        }

        tracing::debug!(method = %request.method, url = %target, "sending HTTP request");
        let response = match builder.send().await {
            Ok(response) => response,
            Err(source) if source.is_timeout() => {
                return TimeoutSnafu {
                    stage: "send-request",
                    url: target,
                }
                .fail();
            }
            Err(source) => return Err(source).context(TransportSnafu { stage: "send-request" }),
        };

        let status = response.status();
        ensure!(
            status.is_success(),
            StatusSnafu {
                stage: "check-response-status",
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default(),
            }
        );

        let response_headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_ascii_lowercase(), value.to_string()))
            })
            .collect::<Headers>();

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(source) if source.is_timeout() => {
                return TimeoutSnafu {
                    stage: "read-response-body",
                    url: target,
                }
                .fail();
            }
            Err(source) => {
                return Err(source).context(TransportSnafu {
                    stage: "read-response-body",
                });
            }
        };

        let is_json = response_headers
            .get(CONTENT_TYPE)
            .is_some_and(|content_type| content_type.contains(JSON_CONTENT_TYPE));
        let data = if is_json {
            ResponseData::Json(serde_json::from_slice(&body).context(DecodeBodySnafu {
                stage: "decode-json-response",
            })?)
        } else {
            ResponseData::Text(String::from_utf8_lossy(&body).into_owned())
        };

        let mut response = HttpResponse {
            data,
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers: response_headers,
        };
        for interceptor in &self.response_interceptors {
            response = interceptor.intercept(response).await?;
        }
        Ok(response)
    }

    pub async fn get(&self, url: impl Into<String>) -> ClientResult<HttpResponse> {
        self.request(RequestConfig::new(Method::Get, url)).await
    }

    pub async fn post(&self, url: impl Into<String>, data: Value) -> ClientResult<HttpResponse> {
        self.request(RequestConfig::new(Method::Post, url).with_data(data))
            .await
    }

    pub async fn put(&self, url: impl Into<String>, data: Value) -> ClientResult<HttpResponse> {
        self.request(RequestConfig::new(Method::Put, url).with_data(data))
            .await
    }

    pub async fn patch(&self, url: impl Into<String>, data: Value) -> ClientResult<HttpResponse> {
        self.request(RequestConfig::new(Method::Patch, url).with_data(data))
            .await
    }

    pub async fn delete(&self, url: impl Into<String>) -> ClientResult<HttpResponse> {
        self.request(RequestConfig::new(Method::Delete, url)).await
    }
}

fn header_map(headers: &Headers) -> ClientResult<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes()).context(InvalidHeaderNameSnafu {
            stage: "build-request-headers",
            name: name.clone(),
        })?;
        let header_value = HeaderValue::from_str(value).context(InvalidHeaderValueSnafu {
            stage: "build-request-headers",
            name: name.clone(),
        })?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

/// JSON-encodes `data` when the request declares a JSON content type; otherwise
/// strings go out verbatim and other values as their JSON text.
fn encode_body(headers: &Headers, data: &Value) -> ClientResult<Vec<u8>> {
    let is_json = headers
        .get(CONTENT_TYPE)
        .is_some_and(|content_type| content_type.starts_with(JSON_CONTENT_TYPE));

    match data {
        _ if is_json => serde_json::to_vec(data).context(EncodeBodySnafu {
            stage: "encode-json-body",
        }),
        Value::String(text) => Ok(text.clone().into_bytes()),
        other => Ok(other.to_string().into_bytes()),
    }
}
