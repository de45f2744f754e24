//! Authenticated GET with bounded retries.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::auth::AuthTokenProvider;
use crate::endpoint::Endpoint;
use crate::error::{FetchError, TransientFailure};
use crate::http_client::{HttpClient, HttpRequest, HttpResponse};
use crate::retry::RetryPolicy;

/// Result of one attempt, as seen by the retry loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// 2xx response.
    Success(HttpResponse),
    /// Token, transport or status failure worth another attempt.
    RetryableFailure(TransientFailure),
    /// Non-2xx status the policy does not retry. Handed to the decoder as is.
    TerminalFailure(HttpResponse),
}

impl AttemptOutcome {
    pub fn classify(response: HttpResponse, policy: &RetryPolicy) -> Self {
        if policy.is_retryable_status(response.status) {
            Self::RetryableFailure(TransientFailure::Status {
                status: response.status,
                body: response.body,
            })
        } else if response.is_success() {
            Self::Success(response)
        } else {
            Self::TerminalFailure(response)
        }
    }
}

/// Issues the request, sleeping between attempts per the [`RetryPolicy`].
#[derive(Clone)]
pub struct RequestExecutor {
    client: Arc<dyn HttpClient>,
}

impl RequestExecutor {
    pub fn new(client: Arc<dyn HttpClient>) -> Self {
        Self { client }
    }

    /// Run attempts until one yields a response that is not retryable.
    ///
    /// Non-2xx terminal responses are returned as `Ok`; classifying them is
    /// the decoder's job. When every attempt fails with a retryable failure
    /// the last one is returned inside [`FetchError::RetriesExhausted`].
    pub async fn execute(
        &self,
        endpoint: &Endpoint,
        policy: &RetryPolicy,
        auth: &dyn AuthTokenProvider,
    ) -> Result<HttpResponse, FetchError> {
        let max_attempts = policy.max_attempts();
        let mut attempt = 1;

        loop {
            debug!(attempt, max_attempts, url = %endpoint, "issuing request");

            let failure = match self.attempt(endpoint, policy, auth).await {
                AttemptOutcome::Success(response) | AttemptOutcome::TerminalFailure(response) => {
                    debug!(attempt, status = response.status, "request completed");
                    return Ok(response);
                }
                AttemptOutcome::RetryableFailure(failure) => failure,
            };

            if attempt >= max_attempts {
                warn!(attempt, error = %failure, "retry budget exhausted");
                return Err(FetchError::RetriesExhausted {
                    attempts: attempt,
                    last: failure,
                });
            }

            let delay = policy.delay_after_attempt(attempt);
            warn!(
                attempt,
                max_attempts,
                delay_ms = delay.as_millis() as u64,
                error = %failure,
                "retryable failure, backing off"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    async fn attempt(
        &self,
        endpoint: &Endpoint,
        policy: &RetryPolicy,
        auth: &dyn AuthTokenProvider,
    ) -> AttemptOutcome {
        let token = match auth.token() {
            Ok(token) => token,
            Err(error) => return AttemptOutcome::RetryableFailure(error.into()),
        };

        let request = HttpRequest::get(endpoint.as_str())
            .with_bearer_token(&token)
            .with_header("content-type", "application/json")
            .with_timeout(endpoint.timeout());

        match self.client.execute(request).await {
            Ok(response) => AttemptOutcome::classify(response, policy),
            Err(error) => AttemptOutcome::RetryableFailure(error.into()),
        }
    }
}
