#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use converter_llm::{ServiceError, TransformationService};

pub enum Reply {
    Text(String),
    Fail(String),
}

pub fn text(reply: &str) -> Reply {
    Reply::Text(reply.to_string())
}

pub fn fail(message: &str) -> Reply {
    Reply::Fail(message.to_string())
}

/// Hands out queued replies in call order and records every call.
#[derive(Default)]
pub struct ScriptedService {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedService {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().expect("lock").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("lock").len()
    }
}

#[async_trait]
impl TransformationService for ScriptedService {
    async fn invoke(&self, instruction: &str, payload: &str) -> converter_llm::Result<String> {
        self.calls
            .lock()
            .expect("lock")
            .push((instruction.to_string(), payload.to_string()));
        match self.replies.lock().expect("lock").pop_front() {
            Some(Reply::Text(reply)) => Ok(reply),
            Some(Reply::Fail(message)) => Err(ServiceError::Api(message)),
            None => Err(ServiceError::Api("no scripted reply left".to_string())),
        }
    }
}

/// Returns the payload it was given, after yielding so concurrent requests
/// interleave.
pub struct EchoService {
    delay: Duration,
}

impl EchoService {
    pub fn new() -> Self {
        Self {
            delay: Duration::from_millis(0),
        }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl TransformationService for EchoService {
    async fn invoke(&self, _instruction: &str, payload: &str) -> converter_llm::Result<String> {
        if self.delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.delay).await;
        }
        Ok(payload.to_string())
    }
}
