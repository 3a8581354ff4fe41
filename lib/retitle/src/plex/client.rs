use super::models::{DirectoryContainer, Envelope, MetadataContainer};
use crate::{
    error::{Result, RetitleError},
    traits::Catalog,
};
use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use shared::catalog::{CatalogItem, CatalogPage, ItemKind, Section};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

const PRODUCT_NAME: &str = "retitle";

/// Bounded fixed-delay retry for transient transport failures.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts per request, including the first
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlexClient {
    base_url: Url,
    token: String,
    client_id: String,
    client: Client,
    retry: RetryPolicy,
}

#[derive(Default)]
pub struct PlexClientBuilder {
    base_url: Option<String>,
    token: Option<String>,
    retry: Option<RetryPolicy>,
    request_timeout_secs: Option<u64>,
}

impl PlexClientBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = Some(url.to_string());
        self
    }

    pub fn token(mut self, token: &str) -> Self {
        self.token = Some(token.trim().to_string());
        self
    }

    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }

    pub fn request_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = Some(seconds);
        self
    }

    pub fn build(self) -> Result<PlexClient> {
        let base_url_str = self
            .base_url
            .ok_or(RetitleError::NotConfigured("server url"))?;
        let token = self
            .token
            .filter(|t| !t.is_empty())
            .ok_or(RetitleError::NotConfigured("token"))?;
        // Trailing slash so that `join` appends rather than replaces the last segment.
        let base_url = Url::parse(&format!("{}/", base_url_str.trim_end_matches('/')))?;

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(2))
            .timeout(Duration::from_secs(self.request_timeout_secs.unwrap_or(30)))
            .build()?;

        let mut retry = self.retry.unwrap_or_default();
        retry.max_attempts = retry.max_attempts.max(1);

        Ok(PlexClient {
            base_url,
            token,
            client_id: Uuid::new_v4().to_string(),
            client,
            retry,
        })
    }
}

impl PlexClient {
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url> {
        let mut url = self.base_url.join(path.trim_start_matches('/'))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    async fn send_once(&self, method: Method, url: Url) -> Result<String> {
        debug!("Request: {} {}", method, url.path());
        let response = self
            .client
            .request(method, url)
            .header("X-Plex-Token", &self.token)
            .header("X-Plex-Client-Identifier", &self.client_id)
            .header("X-Plex-Product", PRODUCT_NAME)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(response.text().await?)
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error body".to_string());
            Err(RetitleError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }

    /// Send a request and read its whole body, retrying transient failures.
    ///
    /// The body read is part of the retried attempt: a connection dropped mid-body
    /// is resent like any other transport failure.
    async fn send(&self, method: Method, path: &str, query: &[(&str, String)]) -> Result<String> {
        let url = self.endpoint(path, query)?;
        let mut attempt = 1;
        loop {
            match self.send_once(method.clone(), url.clone()).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_transient() && attempt < self.retry.max_attempts => {
                    warn!(
                        "{} {} failed (attempt {}/{}), retrying in {}ms: {}",
                        method,
                        url.path(),
                        attempt,
                        self.retry.max_attempts,
                        self.retry.delay.as_millis(),
                        e
                    );
                    tokio::time::sleep(self.retry.delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let text = self.send(Method::GET, path, query).await?;
        let envelope: Envelope<T> = serde_json::from_str(&text)?;
        Ok(envelope.media_container)
    }
}

#[async_trait]
impl Catalog for PlexClient {
    fn id(&self) -> &'static str {
        "plex"
    }

    fn name(&self) -> &'static str {
        "Plex Media Server"
    }

    async fn sections(&self) -> Result<Vec<Section>> {
        let container: DirectoryContainer = self.get_json("library/sections", &[]).await?;
        Ok(container.directory.into_iter().map(Section::from).collect())
    }

    async fn list_page(
        &self,
        section_id: &str,
        kind: ItemKind,
        offset: usize,
        size: usize,
    ) -> Result<CatalogPage> {
        let container: MetadataContainer = self
            .get_json(
                &format!("library/sections/{section_id}/all"),
                &[
                    ("type", kind.type_code().to_string()),
                    ("X-Plex-Container-Start", offset.to_string()),
                    ("X-Plex-Container-Size", size.to_string()),
                ],
            )
            .await?;
        Ok(container.into())
    }

    async fn children(&self, item_id: &str) -> Result<Vec<CatalogItem>> {
        let container: MetadataContainer = self
            .get_json(&format!("library/metadata/{item_id}/children"), &[])
            .await?;
        Ok(CatalogPage::from(container).items)
    }

    async fn set_locked_title(&self, item_id: &str, title: &str) -> Result<()> {
        self.send(
            Method::PUT,
            &format!("library/metadata/{item_id}"),
            &[
                ("title.value", title.to_string()),
                ("title.locked", "1".to_string()),
            ],
        )
        .await?;
        Ok(())
    }

    async fn refresh_section(&self, section_id: &str) -> Result<()> {
        info!("Requesting refresh of section {}", section_id);
        self.send(
            Method::GET,
            &format!("library/sections/{section_id}/refresh"),
            &[],
        )
        .await?;
        Ok(())
    }
}
