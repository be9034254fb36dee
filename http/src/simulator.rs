use std::{
    collections::{BTreeMap, VecDeque},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use bytes::Bytes;

use crate::{
    Error, GenericClient, GenericRequestBuilder, GenericResponse, Method, RequestBuilder, Response,
    StatusCode,
};

/// One scripted answer to a `send()`.
#[derive(Debug, Clone)]
pub enum SimulatedExchange {
    Response(SimulatedResponse),
    /// A transport failure: no response is ever produced.
    Error(String),
}

#[derive(Debug, Clone)]
pub struct SimulatedResponse {
    pub status: StatusCode,
    pub reason: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub body: Bytes,
}

impl SimulatedResponse {
    /// # Panics
    ///
    /// * If `status` is `0`
    #[must_use]
    pub fn new(status: u16) -> Self {
        Self {
            status: StatusCode::try_from(status).unwrap(),
            reason: None,
            headers: BTreeMap::new(),
            body: Bytes::new(),
        }
    }

    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }
}

impl Default for SimulatedResponse {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            reason: None,
            headers: BTreeMap::new(),
            body: Bytes::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub headers: BTreeMap<String, String>,
}

/// In-memory client that answers from a FIFO script instead of the network.
///
/// Clones share the same script and request log. An exhausted script answers
/// `200` with an empty body.
#[derive(Default, Clone)]
pub struct SimulatorClient {
    script: Arc<Mutex<VecDeque<SimulatedExchange>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl SimulatorClient {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Panics
    ///
    /// * If the script `Mutex` fails to lock
    #[must_use]
    pub fn with_response(self, response: SimulatedResponse) -> Self {
        self.push(SimulatedExchange::Response(response));
        self
    }

    /// # Panics
    ///
    /// * If the script `Mutex` fails to lock
    #[must_use]
    pub fn with_error(self, reason: impl Into<String>) -> Self {
        self.push(SimulatedExchange::Error(reason.into()));
        self
    }

    /// # Panics
    ///
    /// * If the script `Mutex` fails to lock
    pub fn push(&self, exchange: SimulatedExchange) {
        self.script.lock().unwrap().push_back(exchange);
    }

    /// Every request sent through this client, oldest first.
    ///
    /// # Panics
    ///
    /// * If the requests `Mutex` fails to lock
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl GenericClient for SimulatorClient {
    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        RequestBuilder {
            builder: Box::new(SimulatorRequestBuilder {
                client: self.clone(),
                request: RecordedRequest {
                    method,
                    url: url.to_string(),
                    headers: BTreeMap::new(),
                },
            }),
        }
    }
}

pub struct SimulatorRequestBuilder {
    client: SimulatorClient,
    request: RecordedRequest,
}

#[async_trait]
impl GenericRequestBuilder for SimulatorRequestBuilder {
    fn header(&mut self, name: &str, value: &str) {
        self.request
            .headers
            .insert(name.to_string(), value.to_string());
    }

    async fn send(&mut self) -> Result<Response, Error> {
        self.client
            .requests
            .lock()
            .unwrap()
            .push(self.request.clone());

        let exchange = self.client.script.lock().unwrap().pop_front();
        log::trace!(
            "send: {} {} -> {exchange:?}",
            self.request.method,
            self.request.url
        );

        match exchange {
            Some(SimulatedExchange::Response(response)) => Ok(Response {
                inner: Box::new(SimulatorResponse(response)),
            }),
            Some(SimulatedExchange::Error(reason)) => Err(Error::Simulated(reason)),
            None => Ok(Response {
                inner: Box::new(SimulatorResponse::default()),
            }),
        }
    }
}

#[derive(Default)]
pub struct SimulatorResponse(SimulatedResponse);

#[async_trait]
impl GenericResponse for SimulatorResponse {
    fn status(&self) -> StatusCode {
        self.0.status
    }

    fn reason(&self) -> Option<String> {
        self.0
            .reason
            .clone()
            .or_else(|| crate::canonical_reason(self.0.status))
    }

    fn headers(&mut self) -> &BTreeMap<String, String> {
        &self.0.headers
    }

    async fn bytes(&mut self) -> Result<Bytes, Error> {
        Ok(std::mem::take(&mut self.0.body))
    }
}
