//! Scripted in-memory API for tests

use crate::api::traits::{AuthReply, DeviceApi};
use crate::error::{DeviceError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Replays queued replies and records every call.
///
/// An empty auth queue answers `Unreachable`; an empty post queue answers 200.
#[derive(Default)]
pub struct ScriptedApi {
    auth_replies: Mutex<VecDeque<Result<AuthReply>>>,
    post_replies: Mutex<VecDeque<Result<u16>>>,
    auth_calls: AtomicUsize,
    posts: Mutex<Vec<(String, f64)>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_auth(&self, reply: Result<AuthReply>) -> &Self {
        self.auth_replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn push_post(&self, reply: Result<u16>) -> &Self {
        self.post_replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn auth_calls(&self) -> usize {
        self.auth_calls.load(Ordering::SeqCst)
    }

    /// (bearer token, decibels) for each post, in order
    pub fn posts(&self) -> Vec<(String, f64)> {
        self.posts.lock().unwrap().clone()
    }
}

impl AuthReply {
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }
}

/// 200 with the token in the header
pub fn header_reply(token: &str) -> AuthReply {
    AuthReply {
        status: 200,
        header_token: Some(token.to_string()),
        body: Bytes::new(),
    }
}

/// Reply with no header token and the given body
pub fn body_reply(status: u16, body: &'static str) -> AuthReply {
    AuthReply {
        status,
        header_token: None,
        body: Bytes::from_static(body.as_bytes()),
    }
}

#[async_trait]
impl DeviceApi for ScriptedApi {
    async fn request_token(&self) -> Result<AuthReply> {
        self.auth_calls.fetch_add(1, Ordering::SeqCst);
        self.auth_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(DeviceError::Unreachable("no scripted auth reply".into())))
    }

    async fn post_reading(&self, token: &str, decibels: f64) -> Result<u16> {
        self.posts.lock().unwrap().push((token.to_string(), decibels));
        self.post_replies.lock().unwrap().pop_front().unwrap_or(Ok(200))
    }

    fn name(&self) -> &'static str {
        "Scripted"
    }
}
