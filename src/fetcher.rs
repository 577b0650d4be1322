use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, anyhow};
use bytes::Bytes;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use url::Url;

use crate::progress::Progress;

#[derive(Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    semaphore: Arc<Semaphore>,
    progress: Option<Arc<Progress>>,
}

impl Fetcher {
    pub fn new(
        user_agent: &str,
        max_concurrency: usize,
        progress: Option<Arc<Progress>>,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("build reqwest client")?;
        Ok(Self {
            client,
            semaphore: Arc::new(Semaphore::new(max_concurrency.max(1))),
            progress,
        })
    }

    pub async fn get_bytes(&self, url: Url) -> anyhow::Result<(Bytes, HeaderMap)> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .context("acquire download permit")?;

        if let Some(p) = &self.progress {
            p.http_started(&url);
        }
        let res = self.get_with_backoff(&url).await;
        if let Some(p) = &self.progress {
            p.http_finished(res.as_ref().map(|(b, _)| b.len()).unwrap_or(0));
        }
        res
    }

    async fn get_with_backoff(&self, url: &Url) -> anyhow::Result<(Bytes, HeaderMap)> {
        let mut backoff = Duration::from_millis(250);
        let max_attempts = 5usize;

        for attempt in 1..=max_attempts {
            let resp = self
                .client
                .get(url.clone())
                .send()
                .await
                .with_context(|| format!("GET {}", url))?;

            let status = resp.status();
            let headers = resp.headers().clone();

            if status.is_success() {
                let bytes = resp.bytes().await.context("read response body")?;
                return Ok((bytes, headers));
            }

            if status.as_u16() == 429 || status.as_u16() == 503 {
                let wait = retry_after_duration(&headers).unwrap_or(backoff);
                tracing::warn!(
                    %status,
                    attempt,
                    wait_ms = wait.as_millis(),
                    "throttled; backing off"
                );
                tokio::time::sleep(wait).await;
                backoff = (backoff * 2).min(Duration::from_secs(10));
                continue;
            }

            return Err(anyhow!("GET {} failed with status {}", url, status));
        }

        Err(anyhow!("GET {} failed after retries", url))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> anyhow::Result<T> {
        let (bytes, _headers) = self.get_bytes(url.clone()).await?;
        serde_json::from_slice(&bytes).with_context(|| format!("parse json from {}", url))
    }
}

fn retry_after_duration(headers: &HeaderMap) -> Option<Duration> {
    let v = headers.get(RETRY_AFTER)?;
    let s = v.to_str().ok()?.trim();
    let seconds: u64 = s.parse().ok()?;
    Some(Duration::from_secs(seconds))
}

#[derive(Clone)]
pub enum DataSource {
    Remote { fetcher: Fetcher, page_url: Url },
    Local(PathBuf),
}

impl DataSource {
    pub async fn load<T: DeserializeOwned>(
        &self,
        base_path: &str,
        path: &str,
    ) -> anyhow::Result<T> {
        match self {
            DataSource::Remote { fetcher, page_url } => {
                let url = page_url
                    .join(&format!("{base_path}{path}"))
                    .with_context(|| format!("resolve {base_path}{path} against {page_url}"))?;
                tracing::debug!(%url, "fetching data");
                fetcher.get_json(url).await
            }
            DataSource::Local(root) => {
                let file = root.join(path);
                let bytes =
                    std::fs::read(&file).with_context(|| format!("read {}", file.display()))?;
                serde_json::from_slice(&bytes)
                    .with_context(|| format!("parse json from {}", file.display()))
            }
        }
    }
}
