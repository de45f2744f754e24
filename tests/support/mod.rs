//! Shared fakes for the scorefeed behaviour tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use scorefeed_core::{
    AuthError, AuthTokenProvider, Endpoint, HttpClient, HttpRequest, HttpResponse, LogDetail,
    LogSink, TransportError,
};
use tokio::time::Instant;

pub const SCORES_URL: &str = "https://scores.example.test/v1/latest";

pub fn endpoint() -> Endpoint {
    Endpoint::new(SCORES_URL, Duration::from_secs(10)).expect("test endpoint is valid")
}

pub fn valid_row() -> &'static str {
    r#"{"id": 42, "name": "ada", "score": 97.5, "timestamp": "2024-03-01T12:00:00Z"}"#
}

/// HTTP client answering from a fixed script and recording every call.
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    calls: Mutex<Vec<(Instant, HttpRequest)>>,
}

impl ScriptedClient {
    pub fn new(replies: Vec<Result<HttpResponse, TransportError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn statuses(statuses: &[(u16, &str)]) -> Arc<Self> {
        Self::new(
            statuses
                .iter()
                .map(|(status, body)| Ok(HttpResponse::new(*status, *body)))
                .collect(),
        )
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("calls lock").len()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.calls
            .lock()
            .expect("calls lock")
            .iter()
            .map(|(_, request)| request.clone())
            .collect()
    }

    /// Time elapsed between consecutive calls.
    pub fn gaps(&self) -> Vec<Duration> {
        let calls = self.calls.lock().expect("calls lock");
        calls
            .windows(2)
            .map(|pair| pair[1].0.duration_since(pair[0].0))
            .collect()
    }
}

impl HttpClient for ScriptedClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + Send + 'a>> {
        self.calls
            .lock()
            .expect("calls lock")
            .push((Instant::now(), request));
        let reply = self
            .replies
            .lock()
            .expect("replies lock")
            .pop_front()
            .expect("script has a reply for every call");
        Box::pin(async move { reply })
    }
}

/// Log sink keeping every record in memory.
#[derive(Default)]
pub struct RecordingLogSink {
    errors: Mutex<Vec<LogDetail>>,
    successes: Mutex<Vec<LogDetail>>,
}

impl RecordingLogSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn errors(&self) -> Vec<LogDetail> {
        self.errors.lock().expect("errors lock").clone()
    }

    pub fn successes(&self) -> Vec<LogDetail> {
        self.successes.lock().expect("successes lock").clone()
    }

    pub fn total_writes(&self) -> usize {
        self.errors().len() + self.successes().len()
    }
}

impl LogSink for RecordingLogSink {
    fn log_error(&self, detail: &LogDetail) {
        self.errors.lock().expect("errors lock").push(detail.clone());
    }

    fn log_success(&self, detail: &LogDetail) {
        self.successes
            .lock()
            .expect("successes lock")
            .push(detail.clone());
    }
}

/// Token provider handing out `token-1`, `token-2`, ... and optionally
/// failing on the first `fail_first` calls.
#[derive(Default)]
pub struct RotatingToken {
    issued: AtomicUsize,
    fail_first: usize,
}

impl RotatingToken {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_first(fail_first: usize) -> Arc<Self> {
        Arc::new(Self {
            issued: AtomicUsize::new(0),
            fail_first,
        })
    }

    pub fn issued(&self) -> usize {
        self.issued.load(Ordering::SeqCst)
    }
}

impl AuthTokenProvider for RotatingToken {
    fn token(&self) -> Result<String, AuthError> {
        let call = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        if call <= self.fail_first {
            return Err(AuthError::Provider(format!("token service down (call {call})")));
        }
        Ok(format!("token-{call}"))
    }
}
