//! HTTP backend abstraction for the source APIs.
//!
//! This module provides a trait-based HTTP backend that allows for
//! dependency injection and easy testing. The production implementation
//! uses reqwest with automatic retry logic for transient errors.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use spdl_core::ProgressCallback;
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::config::SourcesConfig;
use crate::error::{SourceError, SourceResult};

/// A file written by [`HttpBackend::download`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    /// Final location of the file.
    pub path: PathBuf,
    /// Bytes written.
    pub bytes: u64,
    /// `Content-Type` of the response, if sent.
    pub content_type: Option<String>,
}

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Trait for HTTP backends used by the source clients.
///
/// This is an implementation detail - external code should use the port traits.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// Fetch JSON from a URL and deserialize it.
    async fn get_json<T: DeserializeOwned + Send>(&self, url: &Url) -> SourceResult<T>;

    /// Fetch JSON with a bearer token.
    async fn get_json_authorized<T: DeserializeOwned + Send>(
        &self,
        url: &Url,
        token: &str,
    ) -> SourceResult<T>;

    /// POST a form with HTTP basic auth and deserialize the JSON answer.
    async fn post_form<T: DeserializeOwned + Send>(
        &self,
        url: &Url,
        basic_auth: (&str, &str),
        form: &[(&str, &str)],
    ) -> SourceResult<T>;

    /// Stream a URL to `dest`.
    ///
    /// When `expect_content_type` is set, a response whose `Content-Type` does
    /// not contain it is rejected before anything is written.
    async fn download(
        &self,
        url: &Url,
        dest: &Path,
        expect_content_type: Option<&str>,
        progress: ProgressCallback,
    ) -> SourceResult<DownloadedFile>;

    /// Return the HTTP status of a GET request (no retries).
    async fn status(&self, url: &Url) -> SourceResult<u16>;
}

/// `<dest>.part`, the temporary file a download is streamed into.
pub fn part_path(dest: &Path) -> PathBuf {
    let mut name: OsString = dest.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production HTTP backend using reqwest with retry logic.
///
/// Implements exponential backoff for transient server errors (5xx)
/// and network errors.
pub struct ReqwestBackend {
    client: reqwest::Client,
    max_retries: u8,
    retry_base_delay: Duration,
    /// Deadline for API calls, and the longest gap allowed between two
    /// body chunks of a download.
    timeout: Duration,
}

impl ReqwestBackend {
    /// Create a new reqwest backend with the given configuration.
    pub fn new(config: &SourcesConfig) -> SourceResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            max_retries: config.max_retries,
            retry_base_delay: config.retry_base_delay,
            timeout: config.timeout,
        })
    }

    /// Send a request with automatic retry for transient errors.
    async fn send_with_retry<F>(&self, url: &Url, build: F) -> SourceResult<reqwest::Response>
    where
        F: Fn() -> reqwest::RequestBuilder + Send + Sync,
    {
        let mut last_error: Option<SourceError> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.retry_base_delay * 2u32.pow(u32::from(attempt) - 1);
                tracing::debug!(%url, attempt, ?delay, "Retrying request");
                tokio::time::sleep(delay).await;
            }

            let sent = match tokio::time::timeout(self.timeout, build().send()).await {
                Ok(sent) => sent.map_err(SourceError::from),
                Err(_) => Err(SourceError::Io(std::io::Error::new(
                    std::io::ErrorKind::TimedOut,
                    format!("no response from {url}"),
                ))),
            };

            match sent {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }

                    // 5xx errors are retryable (server-side issues)
                    if status.is_server_error() && attempt < self.max_retries {
                        last_error = Some(SourceError::HttpStatus {
                            status: status.as_u16(),
                            url: url.to_string(),
                        });
                        continue;
                    }

                    // 4xx errors or final attempt - fail immediately
                    return Err(SourceError::HttpStatus {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }
                Err(e) => {
                    // Network errors and header timeouts are retryable
                    if attempt < self.max_retries {
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            SourceError::invalid_response("Unknown error during fetch".to_string())
        }))
    }

    /// Write the response body to `part`.
    ///
    /// The body has no overall deadline; only a silent gap longer than
    /// `idle_timeout` aborts it.
    async fn stream_to_file(
        response: reqwest::Response,
        part: &Path,
        idle_timeout: Duration,
        progress: &ProgressCallback,
    ) -> SourceResult<u64> {
        let total = response.content_length().unwrap_or(0);
        let mut file = tokio::fs::File::create(part).await?;
        let mut downloaded: u64 = 0;

        let mut stream = response.bytes_stream();
        loop {
            let next = tokio::time::timeout(idle_timeout, stream.next())
                .await
                .map_err(|_| {
                    std::io::Error::new(
                        std::io::ErrorKind::TimedOut,
                        format!("no data received for {}s", idle_timeout.as_secs_f32()),
                    )
                })?;
            let Some(chunk) = next else {
                break;
            };
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;
            progress(downloaded, total);
        }
        file.flush().await?;

        Ok(downloaded)
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn get_json<T: DeserializeOwned + Send>(&self, url: &Url) -> SourceResult<T> {
        let response = self
            .send_with_retry(url, || self.client.get(url.as_str()).timeout(self.timeout))
            .await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn get_json_authorized<T: DeserializeOwned + Send>(
        &self,
        url: &Url,
        token: &str,
    ) -> SourceResult<T> {
        let response = self
            .send_with_retry(url, || {
                self.client
                    .get(url.as_str())
                    .timeout(self.timeout)
                    .bearer_auth(token)
            })
            .await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn post_form<T: DeserializeOwned + Send>(
        &self,
        url: &Url,
        basic_auth: (&str, &str),
        form: &[(&str, &str)],
    ) -> SourceResult<T> {
        let (user, password) = basic_auth;
        let response = self
            .send_with_retry(url, || {
                self.client
                    .post(url.as_str())
                    .timeout(self.timeout)
                    .basic_auth(user, Some(password))
                    .form(form)
            })
            .await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn download(
        &self,
        url: &Url,
        dest: &Path,
        expect_content_type: Option<&str>,
        progress: ProgressCallback,
    ) -> SourceResult<DownloadedFile> {
        let response = self
            .send_with_retry(url, || self.client.get(url.as_str()))
            .await?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if let Some(expected) = expect_content_type {
            let actual = content_type.clone().unwrap_or_default();
            if !actual.contains(expected) {
                return Err(SourceError::NotAudio {
                    content_type: actual,
                });
            }
        }

        let part = part_path(dest);
        let bytes = match Self::stream_to_file(response, &part, self.timeout, &progress).await {
            Ok(bytes) => bytes,
            Err(e) => {
                let _ = tokio::fs::remove_file(&part).await;
                return Err(e);
            }
        };
        tokio::fs::rename(&part, dest).await?;

        tracing::debug!(%url, path = %dest.display(), bytes, "Download finished");
        Ok(DownloadedFile {
            path: dest.to_path_buf(),
            bytes,
            content_type,
        })
    }

    async fn status(&self, url: &Url) -> SourceResult<u16> {
        let response = self
            .client
            .get(url.as_str())
            .timeout(Duration::from_secs(5))
            .send()
            .await?;
        Ok(response.status().as_u16())
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================
