//! Catalog gateway - product listing and search
//!
//! Both endpoints accept a cancellation token; a cancelled call resolves
//! to [`ClientError::Cancelled`] without ever invoking success handling.

use async_trait::async_trait;
use reqwest::Client;
use shared::client::ProductPage;
use shared::models::{SortField, SortOrder};
use tokio_util::sync::CancellationToken;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

const LISTING_FAILURE_MESSAGE: &str = "Failed to load products";
const SEARCH_FAILURE_MESSAGE: &str = "Search failed";

/// Query parameters for the product listing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    pub limit: u32,
    pub skip: u64,
    /// When unset, the sort parameters are omitted entirely and the
    /// server's default order applies.
    pub sort_by: Option<SortField>,
    pub order: SortOrder,
}

/// Catalog endpoint collaborator consumed by the catalog engine.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Fetch one page of the product listing.
    async fn fetch_page(
        &self,
        query: &ListQuery,
        cancel: &CancellationToken,
    ) -> ClientResult<ProductPage>;

    /// Full-text product search. The search endpoint defines its own
    /// ordering; sort parameters do not apply.
    async fn search(
        &self,
        q: &str,
        limit: u32,
        skip: u64,
        cancel: &CancellationToken,
    ) -> ClientResult<ProductPage>;
}

/// HTTP implementation of [`CatalogApi`].
#[derive(Debug, Clone)]
pub struct HttpCatalogGateway {
    client: Client,
    base_url: String,
}

impl HttpCatalogGateway {
    /// Create a new catalog gateway from configuration.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
        failure_message: &str,
    ) -> ClientResult<ProductPage> {
        let response = request.send().await?;

        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), "Catalog request rejected");
            return Err(ClientError::Rejected(failure_message.to_string()));
        }

        response.json().await.map_err(Into::into)
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogGateway {
    async fn fetch_page(
        &self,
        query: &ListQuery,
        cancel: &CancellationToken,
    ) -> ClientResult<ProductPage> {
        let mut params = vec![
            ("limit", query.limit.to_string()),
            ("skip", query.skip.to_string()),
        ];
        if let Some(field) = query.sort_by {
            params.push(("sortBy", field.as_str().to_string()));
            params.push(("order", query.order.as_str().to_string()));
        }

        let request = self
            .client
            .get(format!("{}/products", self.base_url))
            .query(&params);

        tokio::select! {
            _ = cancel.cancelled() => Err(ClientError::Cancelled),
            result = self.execute(request, LISTING_FAILURE_MESSAGE) => result,
        }
    }

    async fn search(
        &self,
        q: &str,
        limit: u32,
        skip: u64,
        cancel: &CancellationToken,
    ) -> ClientResult<ProductPage> {
        let params = [
            ("q", q.to_string()),
            ("limit", limit.to_string()),
            ("skip", skip.to_string()),
        ];

        let request = self
            .client
            .get(format!("{}/products/search", self.base_url))
            .query(&params);

        tokio::select! {
            _ = cancel.cancelled() => Err(ClientError::Cancelled),
            result = self.execute(request, SEARCH_FAILURE_MESSAGE) => result,
        }
    }
}
