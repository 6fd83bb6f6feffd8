//! Paginated, searchable projection over the backend's orders.
//!
//! The view holds whatever the backend last returned for the current page
//! and search term. Status changes go through the backend and are followed
//! by a full re-fetch rather than an optimistic local edit.

use std::time::Duration;

use tracing::{info, instrument, warn};

use crate::api::{ApiClient, OrderPage};
use crate::domain::{Order, OrderStatus, PaymentMethod};
use crate::error::HistoryError;

/// Limit used for the unpaginated statistics fetch. Large enough to cover
/// any realistic day of orders.
const STATS_LIMIT: u32 = 10_000;

/// Aggregates computed from a full order fetch. Revenue counts completed
/// orders only.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrderStats {
    pub total_orders: usize,
    pub pending: usize,
    pub completed: usize,
    pub cancelled: usize,
    pub total_revenue: f64,
    pub cash_revenue: f64,
    pub online_revenue: f64,
}

impl OrderStats {
    pub fn from_orders(orders: &[Order]) -> Self {
        let mut stats = OrderStats {
            total_orders: orders.len(),
            ..OrderStats::default()
        };
        for order in orders {
            match order.status() {
                OrderStatus::Pending => stats.pending += 1,
                OrderStatus::Cancelled => stats.cancelled += 1,
                OrderStatus::Completed => {
                    stats.completed += 1;
                    let total = order.total();
                    stats.total_revenue += total;
                    match order.payment_method() {
                        PaymentMethod::Cash => stats.cash_revenue += total,
                        PaymentMethod::Online => stats.online_revenue += total,
                    }
                }
            }
        }
        stats
    }
}

#[derive(Debug)]
pub struct OrderHistory {
    api: ApiClient,
    page: u32,
    total_pages: u32,
    search: String,
    orders: Vec<Order>,
    stats: OrderStats,
    page_size: u32,
    search_debounce: Duration,
    // Bumped on every page or search change. A fetch started under an
    // older generation is discarded on arrival instead of overwriting
    // newer state.
    generation: u64,
}

impl OrderHistory {
    pub fn new(api: ApiClient, page_size: u32, search_debounce: Duration) -> Self {
        OrderHistory {
            api,
            page: 1,
            total_pages: 1,
            search: String::new(),
            orders: Vec::new(),
            stats: OrderStats::default(),
            page_size,
            search_debounce,
            generation: 0,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn stats(&self) -> OrderStats {
        self.stats
    }

    /// Records a new search term and resets to the first page. Returns
    /// true when the term actually changed and a debounced refresh is due.
    pub fn set_search(&mut self, term: impl Into<String>) -> bool {
        let term = term.into();
        if term == self.search {
            return false;
        }
        self.search = term;
        self.page = 1;
        self.generation += 1;
        true
    }

    /// Moves to `page`, clamped to the known range. Search is untouched.
    pub fn set_page(&mut self, page: u32) {
        let page = page.clamp(1, self.total_pages.max(1));
        if page != self.page {
            self.page = page;
            self.generation += 1;
        }
    }

    /// Fetches the current page and recomputes statistics.
    pub async fn refresh(&mut self) -> Result<(), HistoryError> {
        let (generation, page) = self.fetch_current_page().await?;
        self.apply_page(generation, page);
        self.refresh_stats().await
    }

    /// Same as [`refresh`](Self::refresh) but waits out the search
    /// debounce first, so a burst of keystrokes costs one request.
    pub async fn refresh_debounced(&mut self) -> Result<(), HistoryError> {
        tokio::time::sleep(self.search_debounce).await;
        self.refresh().await
    }

    /// Starts a page fetch under the current generation. The result must
    /// be fed back through [`apply_page`](Self::apply_page).
    #[instrument(skip(self), fields(page = self.page, search = %self.search))]
    pub async fn fetch_current_page(&self) -> Result<(u64, OrderPage), HistoryError> {
        let page = self
            .api
            .list_orders(self.page, self.page_size, &self.search)
            .await?;
        Ok((self.generation, page))
    }

    /// Publishes a fetched page unless it has been superseded.
    pub fn apply_page(&mut self, generation: u64, page: OrderPage) {
        if generation != self.generation {
            warn!(
                stale = generation,
                current = self.generation,
                "Discarding superseded order page"
            );
            return;
        }
        self.total_pages = match page.total_pages {
            Some(tp) => tp.max(1),
            // Bare-array fallback: the backend sent everything in one
            // response, so the page count is derived locally.
            None => (page.orders.len() as u32).div_ceil(self.page_size).max(1),
        };
        self.orders = page.orders;
        info!(
            rows = self.orders.len(),
            total_pages = self.total_pages,
            "Order page loaded"
        );
    }

    async fn refresh_stats(&mut self) -> Result<(), HistoryError> {
        let all = self.api.list_all_orders(STATS_LIMIT).await?;
        self.stats = OrderStats::from_orders(&all);
        Ok(())
    }

    /// Marks an order completed on the backend, then re-fetches. Rejected
    /// when the order is already in a final state.
    pub async fn complete_order(&mut self, id: &str) -> Result<(), HistoryError> {
        self.transition_order(id, OrderStatus::Completed).await
    }

    /// Marks an order cancelled on the backend, then re-fetches. Rejected
    /// when the order is already in a final state.
    pub async fn cancel_order(&mut self, id: &str) -> Result<(), HistoryError> {
        self.transition_order(id, OrderStatus::Cancelled).await
    }

    #[instrument(skip(self))]
    async fn transition_order(&mut self, id: &str, status: OrderStatus) -> Result<(), HistoryError> {
        self.guard_not_final(id)?;
        self.api
            .update_order(id, &crate::domain::OrderPatch::status(status))
            .await?;
        info!(order_id = %id, status = %status, "Order status updated");
        self.refresh().await
    }

    /// Hard-deletes an order on the backend, then re-fetches.
    #[instrument(skip(self))]
    pub async fn delete_order(&mut self, id: &str) -> Result<(), HistoryError> {
        self.api.delete_order(id).await?;
        info!(order_id = %id, "Order deleted");
        self.refresh().await
    }

    fn guard_not_final(&self, id: &str) -> Result<(), HistoryError> {
        if let Some(order) = self.orders.iter().find(|o| o.id == id) {
            let status = order.status();
            if status.is_final() {
                return Err(HistoryError::OrderFinal {
                    id: id.to_string(),
                    status,
                });
            }
        }
        Ok(())
    }
}
