//! HTTP implementation of [`MetricsStore`].

use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use gaugeport_core::StoreConfig;

use crate::error::{StoreError, StoreResult};
use crate::model::{DataPoint, DefinitionRecord, Tenant};
use crate::{BoxFuture, MetricsStore};

/// Header scoping a request to one tenant.
pub const TENANT_HEADER: &str = "Hawkular-Tenant";

/// Metrics store client over HTTP(S).
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: reqwest::Client,
    base: Url,
    token: String,
}

impl HttpStore {
    /// Build a client for the configured store, presenting `token` on
    /// every request.
    pub fn new(config: &StoreConfig, token: impl Into<String>) -> StoreResult<Self> {
        let base_url = config.base_url();
        let base = Url::parse(&base_url).map_err(|e| StoreError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(StoreError::InvalidUrl(base_url));
        }

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent("gaugeport/0.1")
            .build()?;

        Ok(Self {
            client,
            base,
            token: token.into(),
        })
    }

    /// Base URL joined with `segments`, each percent-encoded as one segment.
    fn endpoint(&self, segments: &[&str]) -> StoreResult<Url> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| StoreError::InvalidUrl(self.base.to_string()))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        url: Url,
        tenant: Option<&str>,
        query: &[(&str, String)],
    ) -> StoreResult<Vec<T>> {
        let mut request = self
            .client
            .get(url.clone())
            .bearer_auth(&self.token)
            .query(query);
        if let Some(tenant) = tenant {
            request = request.header(TENANT_HEADER, tenant);
        }

        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            debug!(%url, "store returned no content");
            return Ok(Vec::new());
        }
        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        if body.is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_slice(&body)?)
    }
}

impl MetricsStore for HttpStore {
    fn list_tenants(&self) -> BoxFuture<'_, StoreResult<Vec<Tenant>>> {
        Box::pin(async move {
            let url = self.endpoint(&["tenants"])?;
            self.get_list(url, None, &[]).await
        })
    }

    fn list_metric_definitions<'a>(
        &'a self,
        tenant: &'a str,
    ) -> BoxFuture<'a, StoreResult<Vec<DefinitionRecord>>> {
        Box::pin(async move {
            let url = self.endpoint(&["metrics"])?;
            self.get_list(url, Some(tenant), &[("type", "gauge".to_string())])
                .await
        })
    }

    fn query_latest_gauge_sample<'a>(
        &'a self,
        metric_id: &'a str,
        tenant: &'a str,
        limit: usize,
    ) -> BoxFuture<'a, StoreResult<Vec<DataPoint>>> {
        Box::pin(async move {
            let url = self.endpoint(&["gauges", metric_id, "raw"])?;
            let query = [("limit", limit.to_string()), ("order", "DESC".to_string())];
            self.get_list(url, Some(tenant), &query).await
        })
    }
}
