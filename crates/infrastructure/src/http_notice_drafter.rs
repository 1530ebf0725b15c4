//! HTTP generative-text notice drafter with bounded retries.

use std::time::Duration;

use async_trait::async_trait;
use schooldesk_application::{NoticeDraftGenerator, NoticeDraftRequest};
use schooldesk_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Serialize)]
struct DraftPayload<'a> {
    title: &'a str,
    target_audience: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    class_details: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct DraftResponse {
    content: String,
}

/// Notice drafter calling an external text generation endpoint.
///
/// The endpoint receives `{title, target_audience, class_details}` and answers
/// with `{content}`. Server errors and rate limiting are retried with a linear
/// backoff.
pub struct HttpNoticeDrafter {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    max_attempts: u8,
    retry_backoff_ms: u64,
}

impl HttpNoticeDrafter {
    /// Creates a new HTTP drafter.
    #[must_use]
    pub fn new(
        http_client: reqwest::Client,
        endpoint: impl Into<String>,
        api_key: Option<String>,
        max_attempts: u8,
        retry_backoff_ms: u64,
    ) -> Self {
        Self {
            http_client,
            endpoint: endpoint.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            max_attempts: max_attempts.max(1),
            retry_backoff_ms: retry_backoff_ms.max(50),
        }
    }

    async fn post_with_retry(&self, payload: &DraftPayload<'_>) -> AppResult<DraftResponse> {
        let mut attempt = 0_u8;
        let mut last_error: Option<String> = None;

        while attempt < self.max_attempts {
            attempt = attempt.saturating_add(1);
            let mut builder = self.http_client.post(self.endpoint.as_str()).json(payload);
            if let Some(api_key) = &self.api_key {
                builder = builder.bearer_auth(api_key);
            }

            match builder.send().await {
                Ok(response) if response.status().is_success() => {
                    return response.json::<DraftResponse>().await.map_err(|error| {
                        AppError::Internal(format!("notice drafter returned invalid JSON: {error}"))
                    });
                }
                Ok(response)
                    if response.status().is_server_error()
                        || response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS =>
                {
                    last_error = Some(format!(
                        "transient HTTP status {} from notice drafter",
                        response.status()
                    ));
                }
                Ok(response) => {
                    let status = response.status();
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "<response body unavailable>".to_owned());
                    return Err(AppError::Internal(format!(
                        "notice drafter failed with status {status}: {body}"
                    )));
                }
                Err(error) => {
                    last_error = Some(format!("notice drafter transport error: {error}"));
                }
            }

            if attempt < self.max_attempts {
                warn!(attempt, "retrying notice drafter request");
                let delay = self.retry_backoff_ms.saturating_mul(u64::from(attempt));
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
        }

        Err(AppError::Internal(last_error.unwrap_or_else(|| {
            "notice drafter exhausted retries".to_owned()
        })))
    }
}

#[async_trait]
impl NoticeDraftGenerator for HttpNoticeDrafter {
    async fn generate(&self, request: &NoticeDraftRequest) -> AppResult<String> {
        let payload = DraftPayload {
            title: request.title.trim(),
            target_audience: request.audience.as_str(),
            class_details: request.class_details.as_deref(),
        };

        Ok(self.post_with_retry(&payload).await?.content)
    }
}
