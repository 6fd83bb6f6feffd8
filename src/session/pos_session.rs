//! Session coordinator.
//!
//! One [`PosSession`] per active terminal. It owns the cart, the checkout
//! machine, the catalog cache, the order history view and the ticket
//! spooler, and wires them to a shared [`ApiClient`]. Nothing here is
//! global; callers construct a session and pass it where it is needed.

use tracing::{info, warn};

use crate::api::ApiClient;
use crate::cart::{CartCommand, CartSession};
use crate::catalog::{Catalog, CatalogCache};
use crate::checkout::{Checkout, OrderReceipt, SubmissionState};
use crate::config::Config;
use crate::domain::PaymentMethod;
use crate::error::{ApiError, CheckoutError, HistoryError, PrintError};
use crate::history::OrderHistory;
use crate::kot::{PrintSpooler, Ticket, TicketPrinter};

pub struct PosSession<P> {
    config: Config,
    api: ApiClient,
    cart: CartSession,
    checkout: Checkout,
    catalog: CatalogCache,
    history: OrderHistory,
    spooler: PrintSpooler<P>,
}

impl<P: TicketPrinter> PosSession<P> {
    pub fn new(config: Config, printer: P) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.base_url, config.http_timeout)?;
        info!(base_url = %config.base_url, "POS session started");
        Ok(PosSession {
            api: api.clone(),
            cart: CartSession::default(),
            checkout: Checkout::default(),
            catalog: CatalogCache::new(api.clone(), config.item_limit),
            history: OrderHistory::new(api, config.page_size, config.search_debounce),
            spooler: PrintSpooler::new(printer, config.print_copies, config.print_pause),
            config,
        })
    }

    pub fn cart(&self) -> &CartSession {
        &self.cart
    }

    pub fn dispatch(&mut self, command: CartCommand) {
        self.cart.dispatch(command);
    }

    pub fn submission_state(&self) -> SubmissionState {
        self.checkout.state()
    }

    pub fn catalog(&self) -> &Catalog {
        self.catalog.snapshot()
    }

    pub fn catalog_mut(&mut self) -> &mut CatalogCache {
        &mut self.catalog
    }

    pub async fn refresh_catalog(&mut self) -> Result<(), ApiError> {
        self.catalog.refresh().await
    }

    pub fn history(&self) -> &OrderHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut OrderHistory {
        &mut self.history
    }

    /// Submits the cart and, on success, spools the kitchen ticket. A
    /// printer fault never fails an already-placed order.
    pub async fn place_order(
        &mut self,
        payment_method: PaymentMethod,
    ) -> Result<OrderReceipt, CheckoutError> {
        let receipt = self
            .checkout
            .submit(&self.api, &mut self.cart, payment_method)
            .await?;

        let ticket = Ticket::for_receipt(&self.config.restaurant_name, &receipt);
        if let Err(e) = self.spooler.spool(&ticket).await {
            warn!(error = %e, order_id = %receipt.order_id, "KOT print failed");
        }
        Ok(receipt)
    }

    /// Waits out the message display delay and returns checkout to idle.
    pub async fn settle(&mut self) {
        self.checkout.settle(self.config.message_delay).await;
    }

    /// Reprints the ticket for an order on the current history page.
    pub async fn reprint(&mut self, order_id: &str) -> Result<(), PrintError> {
        let Some(order) = self.history.orders().iter().find(|o| o.id == order_id) else {
            warn!(order_id = %order_id, "Reprint requested for unknown order");
            return Ok(());
        };
        let ticket = Ticket::for_order(&self.config.restaurant_name, order);
        self.spooler.spool(&ticket).await
    }

    pub async fn complete_order(&mut self, id: &str) -> Result<(), HistoryError> {
        self.history.complete_order(id).await
    }

    pub async fn cancel_order(&mut self, id: &str) -> Result<(), HistoryError> {
        self.history.cancel_order(id).await
    }

    pub async fn delete_order(&mut self, id: &str) -> Result<(), HistoryError> {
        self.history.delete_order(id).await
    }

    #[cfg(test)]
    pub fn printer(&self) -> &P {
        self.spooler.printer()
    }
}
