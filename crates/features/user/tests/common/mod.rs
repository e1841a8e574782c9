#![allow(dead_code, unreachable_pub)]

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use tessera_http::{HttpError, HttpRequest, HttpResponse, Transport};

/// Replies in order, whatever the path, and records every request.
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<HttpResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn with_replies(replies: impl IntoIterator<Item = (u16, Value)>) -> Arc<Self> {
        let replies =
            replies.into_iter().map(|(status, body)| HttpResponse::with_json(status, &body));
        Arc::new(Self { replies: Mutex::new(replies.collect()), requests: Mutex::default() })
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.requests.lock().push(request);
        self.replies.lock().pop_front().ok_or_else(|| "Transport script exhausted".into())
    }
}
