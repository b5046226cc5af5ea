//! Shared test helpers: a transport that records calls and replays canned responses

#![allow(dead_code)]

use async_trait::async_trait;
use checkwriter::config::Edition;
use checkwriter::message::MailDefaults;
use checkwriter::{Client, Transport, TransportError, UploadForm};
use reqwest::Method;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;

/// One request seen by the [`RecordingTransport`]
#[derive(Debug, Clone)]
pub enum Call {
    Request {
        method: Method,
        path: String,
        body: Option<Value>,
    },
    Upload {
        path: String,
        form: UploadForm,
    },
}

impl Call {
    pub fn path(&self) -> &str {
        match self {
            Call::Request { path, .. } | Call::Upload { path, .. } => path,
        }
    }

    pub fn body(&self) -> Option<&Value> {
        match self {
            Call::Request { body, .. } => body.as_ref(),
            Call::Upload { .. } => None,
        }
    }
}

/// Records every call; answers from a queue, then with `{"success": true}`
#[derive(Debug, Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<Call>>,
    responses: Mutex<VecDeque<Result<Value, TransportError>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, response: Value) -> Self {
        self.responses.lock().unwrap().push_back(Ok(response));
        self
    }

    pub fn fail(self, status: u16, body: Value) -> Self {
        self.fail_raw(status, &body.to_string())
    }

    pub fn fail_raw(self, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(TransportError::Status {
                status,
                body: body.to_string(),
                retry_after: None,
            }));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.calls().iter().map(|c| c.path().to_string()).collect()
    }

    fn next(&self) -> Result<Value, TransportError> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(json!({ "success": true })))
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, TransportError> {
        self.calls.lock().unwrap().push(Call::Request {
            method,
            path: path.to_string(),
            body: body.cloned(),
        });
        self.next()
    }

    async fn upload(&self, path: &str, form: UploadForm) -> Result<Value, TransportError> {
        self.calls.lock().unwrap().push(Call::Upload {
            path: path.to_string(),
            form,
        });
        self.next()
    }
}

pub fn client(transport: RecordingTransport, edition: Edition) -> Client<RecordingTransport> {
    Client::with_transport(transport, MailDefaults::default(), edition)
}

pub fn client_with_defaults(
    transport: RecordingTransport,
    defaults: MailDefaults,
) -> Client<RecordingTransport> {
    Client::with_transport(transport, defaults, Edition::Quickpay)
}
