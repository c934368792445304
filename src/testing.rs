//! Test doubles for the transport seam.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value as JsonValue;

use crate::{Client, HttpRequest, HttpResponse, Transport, TransportError};

/// Transport that records every request and replies from a queue.
#[derive(Clone, Default)]
pub(crate) struct StubTransport {
    requests: Arc<Mutex<Vec<HttpRequest>>>,
    responses: Arc<Mutex<VecDeque<HttpResponse>>>,
}

impl StubTransport {
    pub(crate) fn respond(&self, status: u16, body: &str) -> &Self {
        self.responses.lock().unwrap().push_back(HttpResponse {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.to_string(),
        });
        self
    }

    pub(crate) fn respond_json(&self, status: u16, body: JsonValue) -> &Self {
        self.respond(status, &body.to_string())
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn last_request(&self) -> HttpRequest {
        self.requests().pop().expect("no request was sent")
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| TransportError::Other("connection refused".to_string()))
    }
}

/// Transport whose requests never complete.
pub(crate) struct HangingTransport;

#[async_trait]
impl Transport for HangingTransport {
    async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
        std::future::pending().await
    }
}

/// Client authenticated as `alice`/`secret` against a fake endpoint.
pub(crate) fn client(transport: &StubTransport) -> Client {
    Client::builder()
        .endpoint(&"https://dnsimple.test/".parse().unwrap())
        .username("alice")
        .password("secret")
        .transport(transport.clone())
        .build()
        .unwrap()
}
