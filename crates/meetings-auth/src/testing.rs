//! Scripted transport for driving the flow without sockets.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

use crate::error::{AuthError, AuthResult};
use crate::transport::{BoxFuture, FormTransport, TransportResponse};

/// A request observed by [`ScriptedTransport`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub params: Vec<(String, String)>,
    /// When the request was issued (tokio clock, so paused time applies).
    pub at: Instant,
}

impl RecordedRequest {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Replies with queued responses in order, then with `fallback` forever.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<AuthResult<TransportResponse>>>,
    fallback: Option<TransportResponse>,
    delay: Duration,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<AuthResult<TransportResponse>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            ..Default::default()
        }
    }

    /// Answers every request with `response`.
    pub fn repeating(response: TransportResponse) -> Self {
        Self::new(Vec::new()).with_fallback(response)
    }

    pub fn with_fallback(mut self, response: TransportResponse) -> Self {
        self.fallback = Some(response);
        self
    }

    /// Holds every response back for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests whose URL ends with `suffix`.
    pub fn requests_to(&self, suffix: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.url.ends_with(suffix))
            .collect()
    }
}

impl FormTransport for ScriptedTransport {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        params: &'a [(&'a str, &'a str)],
    ) -> BoxFuture<'a, AuthResult<TransportResponse>> {
        Box::pin(async move {
            self.requests.lock().unwrap().push(RecordedRequest {
                url: url.to_string(),
                params: params
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                at: Instant::now(),
            });

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            let next = self.script.lock().unwrap().pop_front();
            match (next, &self.fallback) {
                (Some(result), _) => result,
                (None, Some(fallback)) => Ok(fallback.clone()),
                (None, None) => Err(AuthError::transport("script exhausted")),
            }
        })
    }
}
