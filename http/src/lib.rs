#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeMap;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub use webhook_probe_http_models::{InvalidStatusCode, Method, StatusCode};

#[cfg(feature = "reqwest")]
pub mod reqwest;

#[cfg(feature = "simulator")]
pub mod simulator;

#[derive(Debug, Error)]
pub enum Error {
    #[cfg(feature = "reqwest")]
    #[error(transparent)]
    Reqwest(#[from] ::reqwest::Error),
    #[cfg(feature = "simulator")]
    #[error("{0}")]
    Simulated(String),
    #[error("Request already sent")]
    AlreadySent,
}

impl Error {
    /// The deepest non-empty description in this error's source chain, e.g.
    /// `Connection refused (os error 111)` rather than reqwest's
    /// "error sending request" wrapper.
    #[must_use]
    pub fn transport_reason(&self) -> String {
        deepest_reason(self)
    }
}

fn deepest_reason(error: &(dyn std::error::Error + 'static)) -> String {
    let mut reason = error.to_string();
    let mut source = error.source();

    while let Some(error) = source {
        let message = error.to_string();
        if !message.trim().is_empty() {
            reason = message;
        }
        source = error.source();
    }

    reason
}

pub trait GenericClient: Send + Sync {
    fn request(&self, method: Method, url: &str) -> RequestBuilder;

    fn get(&self, url: &str) -> RequestBuilder {
        self.request(Method::Get, url)
    }
}

#[async_trait]
pub trait GenericRequestBuilder: Send + Sync {
    fn header(&mut self, name: &str, value: &str);

    async fn send(&mut self) -> Result<Response, Error>;
}

#[async_trait]
pub trait GenericResponse: Send + Sync {
    fn status(&self) -> StatusCode;

    /// Reason phrase accompanying the status. Defaults to the registered
    /// phrase for the code.
    fn reason(&self) -> Option<String> {
        canonical_reason(self.status())
    }

    fn headers(&mut self) -> &BTreeMap<String, String>;

    async fn bytes(&mut self) -> Result<Bytes, Error>;
}

#[cfg(feature = "reqwest")]
fn canonical_reason(status: StatusCode) -> Option<String> {
    status.canonical_reason().map(ToString::to_string)
}

#[cfg(not(feature = "reqwest"))]
const fn canonical_reason(_status: StatusCode) -> Option<String> {
    None
}

pub struct RequestBuilder {
    builder: Box<dyn GenericRequestBuilder>,
}

impl RequestBuilder {
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.builder.header(name, value);
        self
    }

    /// # Errors
    ///
    /// * If no response could be obtained from the server
    pub async fn send(mut self) -> Result<Response, Error> {
        self.builder.send().await
    }
}

pub struct Response {
    inner: Box<dyn GenericResponse>,
}

impl Response {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    #[must_use]
    pub fn reason(&self) -> Option<String> {
        self.inner.reason()
    }

    #[must_use]
    pub fn headers(&mut self) -> &BTreeMap<String, String> {
        self.inner.headers()
    }

    /// # Errors
    ///
    /// * If the body fails to be read from the connection
    pub async fn bytes(mut self) -> Result<Bytes, Error> {
        self.inner.bytes().await
    }

    /// Reads the full body and decodes it as UTF-8, replacing invalid
    /// sequences with `U+FFFD`. The `Content-Type` charset is ignored.
    ///
    /// # Errors
    ///
    /// * If the body fails to be read from the connection
    pub async fn text(self) -> Result<String, Error> {
        let bytes = self.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

pub struct Client {
    client: Box<dyn GenericClient>,
}

impl Client {
    /// # Panics
    ///
    /// * If all HTTP backend features are disabled
    #[must_use]
    pub fn new() -> Self {
        if cfg!(feature = "reqwest") {
            #[cfg(feature = "reqwest")]
            {
                Self {
                    client: Box::new(reqwest::ReqwestClient::new(::reqwest::Client::new())),
                }
            }
            #[cfg(not(feature = "reqwest"))]
            unreachable!()
        } else {
            panic!("No HTTP backend feature enabled");
        }
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl GenericClient for Client {
    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client.request(method, url)
    }
}
