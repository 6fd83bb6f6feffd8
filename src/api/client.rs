use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::api::wire::{CategoryPayload, CategoryWire, ItemPayload, ItemWire, Listing, OrderPage};
use crate::domain::{Order, OrderPatch, OrderPayload};
use crate::error::ApiError;

/// Thin typed client for the order-management backend. Cheap to clone; the
/// underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Reads the body before checking the status so HTTP errors carry the
    /// server's message.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::Http { status, body });
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn expect_success(response: reqwest::Response) -> Result<(), ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Http { status, body });
        }
        Ok(())
    }

    // --- Catalog ---

    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<CategoryWire>, ApiError> {
        debug!("Sending request");
        let response = self.http.get(self.url("categories")).send().await?;
        let listing: Listing<CategoryWire> = Self::decode(response).await?;
        Ok(listing.into_rows())
    }

    #[instrument(skip(self))]
    pub async fn list_items(&self, limit: u32) -> Result<Vec<ItemWire>, ApiError> {
        debug!("Sending request");
        let response = self
            .http
            .get(self.url("items"))
            .query(&[("limit", limit.to_string())])
            .send()
            .await?;
        let listing: Listing<ItemWire> = Self::decode(response).await?;
        Ok(listing.into_rows())
    }

    #[instrument(skip(self, payload), fields(item_name = %payload.item_name))]
    pub async fn create_item(&self, payload: &ItemPayload) -> Result<(), ApiError> {
        debug!("Sending request");
        let response = self.http.post(self.url("items")).json(payload).send().await?;
        Self::expect_success(response).await
    }

    #[instrument(skip(self, payload))]
    pub async fn update_item(&self, id: &str, payload: &ItemPayload) -> Result<(), ApiError> {
        debug!("Sending request");
        let response = self
            .http
            .put(self.url(&format!("items/{id}")))
            .json(payload)
            .send()
            .await?;
        Self::expect_success(response).await
    }

    #[instrument(skip(self))]
    pub async fn delete_item(&self, id: &str) -> Result<(), ApiError> {
        debug!("Sending request");
        let response = self.http.delete(self.url(&format!("items/{id}"))).send().await?;
        Self::expect_success(response).await
    }

    #[instrument(skip(self))]
    pub async fn create_category(&self, category_name: &str) -> Result<(), ApiError> {
        debug!("Sending request");
        let response = self
            .http
            .post(self.url("categories"))
            .json(&CategoryPayload { category_name })
            .send()
            .await?;
        Self::expect_success(response).await
    }

    // --- Orders ---

    /// The `search` parameter is always sent, blank included, so the
    /// request shape does not vary with the term.
    #[instrument(skip(self))]
    pub async fn list_orders(
        &self,
        page: u32,
        limit: u32,
        search: &str,
    ) -> Result<OrderPage, ApiError> {
        debug!("Sending request");
        let query = [
            ("page", page.to_string()),
            ("limit", limit.to_string()),
            ("search", search.to_string()),
        ];
        let response = self.http.get(self.url("orders")).query(&query).send().await?;
        let listing: Listing<Order> = Self::decode(response).await?;
        Ok(OrderPage::from(listing))
    }

    /// Unpaginated fetch used for aggregate statistics.
    #[instrument(skip(self))]
    pub async fn list_all_orders(&self, limit: u32) -> Result<Vec<Order>, ApiError> {
        debug!("Sending request");
        let response = self
            .http
            .get(self.url("orders"))
            .query(&[("limit", limit.to_string())])
            .send()
            .await?;
        let listing: Listing<Order> = Self::decode(response).await?;
        Ok(listing.into_rows())
    }

    #[instrument(skip(self, payload), fields(total = %payload.total_amount))]
    pub async fn create_order(&self, payload: &OrderPayload) -> Result<Order, ApiError> {
        debug!("Sending request");
        let response = self.http.post(self.url("orders")).json(payload).send().await?;
        Self::decode(response).await
    }

    #[instrument(skip(self, patch))]
    pub async fn update_order(&self, id: &str, patch: &OrderPatch) -> Result<(), ApiError> {
        debug!("Sending request");
        let response = self
            .http
            .put(self.url(&format!("orders/{id}")))
            .json(patch)
            .send()
            .await?;
        Self::expect_success(response).await
    }

    #[instrument(skip(self))]
    pub async fn delete_order(&self, id: &str) -> Result<(), ApiError> {
        debug!("Sending request");
        let response = self.http.delete(self.url(&format!("orders/{id}"))).send().await?;
        Self::expect_success(response).await
    }
}
