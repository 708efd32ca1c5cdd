//! JSON-over-HTTP request plumbing.
//!
//! Services describe a call as a [`Request`] and hand it to a [`Transport`].
//! [`HttpTransport`] is the production implementation; tests substitute an
//! in-memory one.

use std::fmt;

use reqwest::blocking::Client;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{Error, Result};

const API_PREFIX: [&str; 2] = ["api", "v1"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// One API call relative to `/api/v1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    /// Unencoded path segments; each is percent-encoded on the way out.
    pub path: Vec<String>,
    pub params: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl Request {
    pub fn new<I, S>(method: Method, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            method,
            path: path.into_iter().map(|s| s.as_ref().to_string()).collect(),
            params: Vec::new(),
            body: None,
        }
    }

    pub fn with_params(mut self, params: Vec<(String, String)>) -> Self {
        self.params = params;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Segments joined with `/`, unencoded.
    pub fn path_string(&self) -> String {
        self.path.join("/")
    }
}

/// Sends requests and returns the parsed JSON reply.
///
/// Implementations map non-2xx replies to [`Error::Server`] and an empty
/// reply body to `Value::Null`.
pub trait Transport {
    fn send(&self, request: &Request) -> Result<Value>;

    fn get(&self, path: &[&str], params: Vec<(String, String)>) -> Result<Value> {
        self.send(&Request::new(Method::Get, path).with_params(params))
    }

    fn post(&self, path: &[&str], body: Value) -> Result<Value> {
        self.send(&Request::new(Method::Post, path).with_body(body))
    }

    fn put(&self, path: &[&str], body: Value) -> Result<Value> {
        self.send(&Request::new(Method::Put, path).with_body(body))
    }

    fn patch(&self, path: &[&str], body: Value) -> Result<Value> {
        self.send(&Request::new(Method::Patch, path).with_body(body))
    }

    fn delete(&self, path: &[&str]) -> Result<Value> {
        self.send(&Request::new(Method::Delete, path))
    }
}

/// Blocking HTTP transport with basic authentication.
pub struct HttpTransport {
    base_url: Url,
    username: String,
    password: String,
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            Error::Config(format!("invalid base_url '{}': {}", config.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "base_url '{}' cannot carry a path",
                config.base_url
            )));
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()?;

        Ok(Self {
            base_url,
            username: config.username.clone(),
            password: config.password.clone(),
            client,
        })
    }

    /// Full URL of a request: `{base_url}/api/v1/{segments}?{params}`.
    pub fn url_for(&self, request: &Request) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("'{}' cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(API_PREFIX)
            .extend(&request.path);
        if !request.params.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.params);
        }
        Ok(url)
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &Request) -> Result<Value> {
        let url = self.url_for(request)?;
        debug!(method = %request.method, %url, "sending request");

        let mut builder = self
            .client
            .request(request.method.into(), url)
            .basic_auth(&self.username, Some(&self.password));
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send()?;
        let status = response.status();
        let text = response.text()?;

        if !status.is_success() {
            warn!(
                method = %request.method,
                path = %request.path_string(),
                status = status.as_u16(),
                "request failed"
            );
            return Err(Error::Server {
                status_code: status.as_u16(),
                body: text,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| Error::UnexpectedResponse(format!("reply is not JSON: {}", e)))
    }
}
