//! Genart Client Implementation

use crate::error::{Result, SdkError};
use crate::types::{
    ErrorBody, GeneratorList, Health, Image, JobRow, JobState, JobStatus, JobsTable, LoadOutcome,
    SubmitResponse,
};
use reqwest::header::{HeaderMap, CACHE_CONTROL, CONTENT_TYPE, RETRY_AFTER};
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const JOB_FAILED: &str = "JOB_FAILED";

/// Genart job service client
///
/// Provides a high-level interface to the HTTP API.
///
/// # Example
///
/// ```no_run
/// use genart_sdk::GenartClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = GenartClient::new("http://127.0.0.1:8080")?;
/// let job = client.submit("maze").await?;
/// let image = client.wait_for(&job.id, std::time::Duration::from_millis(500), None).await?;
/// std::fs::write("maze.png", &image.bytes)?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct GenartClient {
    http: reqwest::Client,
    base_url: String,
    base: Url,
}

impl GenartClient {
    /// Create a client for the service at `base_url` (e.g. `http://127.0.0.1:8080`)
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Same as [`GenartClient::new`] with a custom per-request timeout
    pub fn with_timeout(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.as_ref().trim().trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(SdkError::InvalidUrl(format!(
                "{} (expected http:// or https://)",
                base_url
            )));
        }

        let base = Url::parse(base_url)
            .map_err(|e| SdkError::InvalidUrl(format!("{} ({})", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(SdkError::InvalidUrl(base_url.to_string()));
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.to_string(),
            base,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Known generator names, sorted
    pub async fn generators(&self) -> Result<Vec<String>> {
        let list: GeneratorList = self.get_json(&["list", "simple"]).await?;
        Ok(list.generators)
    }

    /// Queue a render; returns immediately with the job id and polling URL
    pub async fn submit(&self, generator: &str) -> Result<SubmitResponse> {
        self.get_json(&["new", generator]).await
    }

    pub async fn status(&self, id: &str) -> Result<JobStatus> {
        self.get_json(&["new", "status", id]).await
    }

    /// Poll the job once
    ///
    /// A 200 carrying a no-cache directive is the placeholder; a failed job
    /// is reported as [`LoadOutcome::Failed`] rather than an error.
    pub async fn load(&self, id: &str) -> Result<LoadOutcome> {
        let response = self
            .http
            .get(self.url(&["new", "load", id])?)
            .send()
            .await?;

        if response.status().is_success() {
            let pending = is_uncached(response.headers());
            let image = read_image(response).await?;
            return Ok(if pending {
                LoadOutcome::Pending(image)
            } else {
                LoadOutcome::Ready(image)
            });
        }

        match api_error(response).await {
            SdkError::Api { code, message, .. } if code == JOB_FAILED => {
                Ok(LoadOutcome::Failed(message))
            }
            other => Err(other),
        }
    }

    /// Poll until the job is ready and return the artifact
    ///
    /// # Errors
    /// - SdkError::JobFailed if the job finished with a failure
    /// - SdkError::Timeout if `timeout` elapses first (`None` waits forever)
    pub async fn wait_for(
        &self,
        id: &str,
        interval: Duration,
        timeout: Option<Duration>,
    ) -> Result<Image> {
        let started = Instant::now();
        loop {
            let status = self.status(id).await?;
            match status.state {
                JobState::Ready => match self.load(id).await? {
                    LoadOutcome::Ready(image) => return Ok(image),
                    LoadOutcome::Failed(reason) => {
                        return Err(SdkError::JobFailed {
                            id: id.to_string(),
                            reason,
                        })
                    }
                    LoadOutcome::Pending(_) => {}
                },
                JobState::Failed => {
                    return Err(SdkError::JobFailed {
                        id: id.to_string(),
                        reason: status.error.unwrap_or_default(),
                    })
                }
                JobState::Pending => {}
            }

            if timeout.is_some_and(|limit| started.elapsed() >= limit) {
                return Err(SdkError::Timeout(id.to_string()));
            }
            tokio::time::sleep(interval).await;
        }
    }

    /// Render synchronously, bypassing the queue
    pub async fn draw(&self, generator: &str) -> Result<Image> {
        let response = self.get(&["image", generator]).await?;
        read_image(response).await
    }

    /// Every accepted submission in submission order
    pub async fn jobs(&self) -> Result<Vec<JobRow>> {
        let table: JobsTable = self.get_json(&["generated-images-table"]).await?;
        Ok(table.jobs)
    }

    pub async fn health(&self) -> Result<Health> {
        self.get_json(&["health"]).await
    }

    /// Base URL with `segments` appended, each one percent-encoded
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| SdkError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get(&self, segments: &[&str]) -> Result<reqwest::Response> {
        let response = self.http.get(self.url(segments)?).send().await?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(api_error(response).await)
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let bytes = self.get(segments).await?.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn is_uncached(headers: &HeaderMap) -> bool {
    headers
        .get(CACHE_CONTROL)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("no-cache") || v.contains("no-store"))
        .unwrap_or(false)
}

async fn read_image(response: reqwest::Response) -> Result<Image> {
    let media_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();
    let bytes = response.bytes().await?.to_vec();
    Ok(Image { bytes, media_type })
}

/// Turn a non-success response into [`SdkError::Api`]
async fn api_error(response: reqwest::Response) -> SdkError {
    let status = response.status().as_u16();
    let retry_after = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok());

    let text = match response.text().await {
        Ok(text) => text,
        Err(e) => return SdkError::Transport(e),
    };
    let (code, message) = parse_error_body(&text);

    SdkError::Api {
        status,
        code,
        message,
        retry_after,
    }
}

fn parse_error_body(text: &str) -> (String, String) {
    match serde_json::from_str::<ErrorBody>(text) {
        Ok(body) => (body.code, body.error),
        Err(_) => ("UNKNOWN".to_string(), text.trim().to_string()),
    }
}
