#![allow(dead_code)]

use async_trait::async_trait;
use healthcard_sync::{ApiRequest, ApiResponse, Prompt, RecordTransport, SyncError, SyncResult};
use healthcard_types::Envelope;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

pub enum Reply {
    Now(SyncResult<ApiResponse>),
    Later(oneshot::Receiver<ApiResponse>),
}

/// Transport that answers from a queue of scripted replies and records
/// every request it sees.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, body: Value) {
        self.push(Reply::Now(Ok(response(body))));
    }

    pub fn reply_with_status(&self, status: u16, body: Value) {
        let mut response = response(body);
        response.status = status;
        self.push(Reply::Now(Ok(response)));
    }

    pub fn fail(&self, error: SyncError) {
        self.push(Reply::Now(Err(error)));
    }

    /// Queues a reply that is sent later through the returned channel.
    pub fn defer(&self) -> oneshot::Sender<ApiResponse> {
        let (tx, rx) = oneshot::channel();
        self.push(Reply::Later(rx));
        tx
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Yields until `count` requests have been sent.
    pub async fn wait_for_requests(&self, count: usize) {
        while self.request_count() < count {
            tokio::task::yield_now().await;
        }
    }

    fn push(&self, reply: Reply) {
        self.replies.lock().unwrap().push_back(reply);
    }
}

#[async_trait]
impl RecordTransport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> SyncResult<ApiResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected request: {request:?}"));
        match reply {
            Reply::Now(result) => result,
            Reply::Later(rx) => rx
                .await
                .map_err(|_| SyncError::Network("reply dropped".to_string())),
        }
    }
}

pub fn response(body: Value) -> ApiResponse {
    let envelope: Envelope = serde_json::from_value(body).expect("envelope");
    ApiResponse::ok(envelope)
}

/// Prompt that answers every confirmation with a fixed choice and keeps
/// what it was asked and shown.
pub struct RecordingPrompt {
    answer: bool,
    confirms: Mutex<Vec<String>>,
    alerts: Mutex<Vec<String>>,
}

impl RecordingPrompt {
    pub fn accepting() -> Arc<Self> {
        Arc::new(Self::answering(true))
    }

    pub fn declining() -> Arc<Self> {
        Arc::new(Self::answering(false))
    }

    fn answering(answer: bool) -> Self {
        Self {
            answer,
            confirms: Mutex::new(Vec::new()),
            alerts: Mutex::new(Vec::new()),
        }
    }

    pub fn confirms(&self) -> Vec<String> {
        self.confirms.lock().unwrap().clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }
}

impl Prompt for RecordingPrompt {
    fn confirm(&self, message: &str) -> bool {
        self.confirms.lock().unwrap().push(message.to_string());
        self.answer
    }

    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}
