use std::collections::BTreeMap;

use async_trait::async_trait;
use bytes::Bytes;

use crate::{
    Error, GenericClient, GenericRequestBuilder, GenericResponse, Method, RequestBuilder, Response,
    StatusCode,
};

pub struct ReqwestClient(reqwest::Client);

impl ReqwestClient {
    #[must_use]
    pub const fn new(client: reqwest::Client) -> Self {
        Self(client)
    }
}

impl GenericClient for ReqwestClient {
    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        log::trace!("request: method={method} url={url}");
        RequestBuilder {
            builder: Box::new(ReqwestRequestBuilder(Some(
                self.0.request(method.into(), url),
            ))),
        }
    }
}

pub struct ReqwestRequestBuilder(Option<reqwest::RequestBuilder>);

#[async_trait]
impl GenericRequestBuilder for ReqwestRequestBuilder {
    fn header(&mut self, name: &str, value: &str) {
        if let Some(builder) = self.0.take() {
            self.0 = Some(builder.header(name, value));
        }
    }

    async fn send(&mut self) -> Result<Response, Error> {
        let Some(builder) = self.0.take() else {
            return Err(Error::AlreadySent);
        };
        let response = builder.send().await?;
        log::trace!(
            "send: received status={} version={:?}",
            response.status(),
            response.version()
        );

        // hyper only records the phrase when it differs from the registered one
        let reason = response
            .extensions()
            .get::<hyper::ext::ReasonPhrase>()
            .map(|x| String::from_utf8_lossy(x.as_bytes()).into_owned());

        Ok(Response {
            inner: Box::new(ReqwestResponse {
                status: response.status().into(),
                reason,
                headers: None,
                inner: Some(response),
            }),
        })
    }
}

pub struct ReqwestResponse {
    status: StatusCode,
    reason: Option<String>,
    headers: Option<BTreeMap<String, String>>,
    inner: Option<reqwest::Response>,
}

#[async_trait]
impl GenericResponse for ReqwestResponse {
    fn status(&self) -> StatusCode {
        self.status
    }

    fn reason(&self) -> Option<String> {
        self.reason
            .clone()
            .or_else(|| crate::canonical_reason(self.status))
    }

    fn headers(&mut self) -> &BTreeMap<String, String> {
        let inner = self.inner.as_ref();
        self.headers
            .get_or_insert_with(|| inner.map(|x| headers_to_btree(x.headers())).unwrap_or_default())
    }

    async fn bytes(&mut self) -> Result<Bytes, Error> {
        let Some(response) = self.inner.take() else {
            return Ok(Bytes::new());
        };
        Ok(response.bytes().await?)
    }
}

fn headers_to_btree(value: &reqwest::header::HeaderMap) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();

    for (key, value) in value {
        if let Ok(value) = value.to_str() {
            headers.insert(key.to_string(), value.to_string());
        } else {
            log::trace!("headers_to_btree: skipping non-ascii value for header '{key}'");
        }
    }

    headers
}
