//! Scripted resource client.
//!
//! Responses are keyed by method and exact path (query included). One-shot
//! responses are consumed before the sticky one; an unscripted request gets
//! a 404. A [`Gate`] holds the next matching request until it is opened, which
//! is how tests interleave two cycles deterministically.

use async_trait::async_trait;
use futures::channel::oneshot;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};

use quillpad_app::{ApiRequest, Method, ResourceClient};
use quillpad_core::ApiError;

type Key = (Method, String);
type Reply = Result<Value, ApiError>;

/// Releases one held request.
pub struct Gate(oneshot::Sender<()>);

impl Gate {
    /// Let the held request complete.
    pub fn open(self) {
        let _ = self.0.send(());
    }
}

/// [`ResourceClient`] that replays scripted responses and logs every request.
#[derive(Default)]
pub struct ScriptedClient {
    sticky: Mutex<HashMap<Key, Reply>>,
    once: Mutex<HashMap<Key, VecDeque<Reply>>>,
    gates: Mutex<HashMap<Key, VecDeque<oneshot::Receiver<()>>>>,
    log: Mutex<Vec<ApiRequest>>,
}

impl ScriptedClient {
    /// Client with nothing scripted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every `method path` with `reply`.
    pub fn respond(&self, method: Method, path: &str, reply: Reply) {
        self.sticky.lock().insert((method, path.to_string()), reply);
    }

    /// Answer every `method path` with a JSON body.
    pub fn respond_json(&self, method: Method, path: &str, body: Value) {
        self.respond(method, path, Ok(body));
    }

    /// Answer every `method path` with an HTTP error.
    pub fn respond_error(&self, method: Method, path: &str, status: u16, body: &str) {
        let reason = match status {
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            _ => "Internal Server Error",
        };
        self.respond(method, path, Err(ApiError::from_response(status, reason, body)));
    }

    /// Answer the next `method path` with `reply`, ahead of the sticky answer.
    pub fn respond_once(&self, method: Method, path: &str, reply: Reply) {
        self.once
            .lock()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
    }

    /// Hold the next `method path` until the returned gate opens.
    pub fn gate(&self, method: Method, path: &str) -> Gate {
        let (tx, rx) = oneshot::channel();
        self.gates
            .lock()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(rx);
        Gate(tx)
    }

    /// Every request issued so far, in order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.log.lock().clone()
    }

    /// Requests to exactly `method path`.
    pub fn requests_to(&self, method: Method, path: &str) -> Vec<ApiRequest> {
        self.log
            .lock()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .cloned()
            .collect()
    }

    /// Number of requests to exactly `method path`.
    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests_to(method, path).len()
    }

    /// Number of requests whose path starts with `prefix`.
    pub fn count_prefix(&self, prefix: &str) -> usize {
        self.log
            .lock()
            .iter()
            .filter(|r| r.path.starts_with(prefix))
            .count()
    }

    /// Forget the request log.
    pub fn clear_log(&self) {
        self.log.lock().clear();
    }

    fn reply_for(&self, key: &Key) -> Reply {
        if let Some(reply) = self.once.lock().get_mut(key).and_then(VecDeque::pop_front) {
            return reply;
        }
        match self.sticky.lock().get(key) {
            Some(reply) => reply.clone(),
            None => Err(ApiError::from_response(404, "Not Found", "")),
        }
    }
}

#[async_trait]
impl ResourceClient for ScriptedClient {
    async fn request(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let key = (request.method, request.path.clone());
        self.log.lock().push(request);
        let gate = self.gates.lock().get_mut(&key).and_then(VecDeque::pop_front);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.reply_for(&key)
    }
}
