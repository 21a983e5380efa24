//! Authenticated fetch client
//!
//! The loader only needs `GET(reference) -> bytes + content type`. That
//! contract is the [`FetchClient`] trait; [`AuthenticatedClient`] is the
//! reqwest implementation that attaches the session's bearer token and tenant
//! header to every request.

use std::future::Future;

use bytes::{Bytes, BytesMut};
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use tracing::{debug, instrument};

use crate::config::{ClientConfig, TENANT_HEADER};
use crate::error::{MediaError, MediaResult};
use crate::kind::ContentType;

/// Successful response body plus its declared content type
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchResponse {
    pub bytes: Bytes,
    pub content_type: ContentType,
}

impl FetchResponse {
    pub fn new(bytes: impl Into<Bytes>, content_type: Option<&str>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: ContentType::parse(content_type),
        }
    }
}

/// Performs the protected GET for a resource reference.
///
/// Implementations fail on transport errors and non-2xx statuses.
pub trait FetchClient {
    fn fetch(&self, reference: &str) -> impl Future<Output = MediaResult<FetchResponse>>;
}

/// reqwest-backed [`FetchClient`] carrying the session credentials
#[derive(Debug, Clone)]
pub struct AuthenticatedClient {
    config: ClientConfig,
    base: Url,
    client: reqwest::Client,
}

impl AuthenticatedClient {
    /// Build a client from validated configuration.
    #[instrument(skip(config), fields(base_url = %config.base_url, tenant = ?config.tenant_id))]
    pub fn new(config: ClientConfig) -> MediaResult<Self> {
        config.validate()?;

        let mut base = Url::parse(&config.base_url)
            .map_err(|e| MediaError::Config(format!("Invalid base_url: {}", e)))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()?;

        debug!("Created authenticated media client");
        Ok(Self {
            config,
            base,
            client,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Turn a resource reference into the URL that will be requested.
    ///
    /// Absolute http(s) URLs are used as they are; anything without a scheme
    /// is joined onto the base URL. Other schemes are refused.
    pub fn resolve(&self, reference: &str) -> MediaResult<Url> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(MediaError::InvalidReference("empty reference".to_string()));
        }

        match Url::parse(reference) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(url),
            Ok(url) => Err(MediaError::InvalidReference(format!(
                "unsupported scheme '{}'",
                url.scheme()
            ))),
            Err(_) => self
                .base
                .join(reference)
                .map_err(|e| MediaError::InvalidReference(format!("{}: {}", reference, e))),
        }
    }
}

impl FetchClient for AuthenticatedClient {
    #[instrument(skip(self))]
    async fn fetch(&self, reference: &str) -> MediaResult<FetchResponse> {
        let url = self.resolve(reference)?;
        let limit = self.config.max_payload_bytes;

        let mut request = self.client.get(url);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }
        if let Some(tenant) = &self.config.tenant_id {
            request = request.header(TENANT_HEADER, tenant);
        }

        let mut response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MediaError::Status {
                status: status.as_u16(),
                reference: reference.to_string(),
            });
        }

        if let Some(size) = response.content_length() {
            if size > limit {
                return Err(MediaError::TooLarge { size, limit });
            }
        }

        let content_type = ContentType::parse(
            response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok()),
        );

        let mut body = BytesMut::new();
        while let Some(chunk) = response.chunk().await? {
            let size = (body.len() + chunk.len()) as u64;
            if size > limit {
                return Err(MediaError::TooLarge { size, limit });
            }
            body.extend_from_slice(&chunk);
        }

        debug!(size = body.len(), %content_type, "Fetched media payload");
        Ok(FetchResponse {
            bytes: body.freeze(),
            content_type,
        })
    }
}
