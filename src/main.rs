//! POS terminal client for the restaurant order-management backend.
//!
//! The binary runs a short demonstration flow against the configured
//! backend: load the catalog, ring up an order, print its kitchen ticket
//! and show the history view with aggregate statistics.

mod api;
mod cart;
mod catalog;
mod checkout;
mod config;
mod domain;
mod error;
mod history;
mod kot;
mod session;

#[cfg(test)]
mod integration_tests;

use tracing::{error, info};

use crate::cart::CartCommand;
use crate::config::Config;
use crate::domain::PaymentMethod;
use crate::kot::StdoutPrinter;
use crate::session::{setup_tracing, PosSession};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = Config::from_env().map_err(|e| e.to_string())?;
    info!(restaurant = %config.restaurant_name, "Starting POS terminal");

    let mut session = PosSession::new(config, StdoutPrinter)
        .map_err(|e| format!("Failed to start session: {e}"))?;

    session
        .refresh_catalog()
        .await
        .map_err(|e| format!("Failed to load catalog: {e}"))?;
    let catalog = session.catalog();
    info!(
        items = catalog.items.len(),
        categories = catalog.categories.len(),
        "Catalog loaded"
    );

    // Ring up the first two available items as a smoke order.
    let picks: Vec<_> = catalog
        .items
        .iter()
        .filter(|item| item.available)
        .take(2)
        .cloned()
        .collect();
    if picks.is_empty() {
        return Err("No available menu items to order".to_string());
    }
    for item in picks {
        info!(name = %item.name, price = item.price, "Adding to cart");
        session.dispatch(CartCommand::Add { item });
    }
    session.dispatch(CartCommand::UpdateCustomer {
        name: Some("Walk-in".to_string()),
        mobile: None,
    });
    info!(total = session.cart().total(), "Cart ready");

    match session.place_order(PaymentMethod::Cash).await {
        Ok(receipt) => {
            info!(order_id = %receipt.order_id, "{}", receipt.message);
        }
        Err(e) => {
            error!(error = %e, "Order was not placed");
        }
    }
    session.settle().await;

    session
        .history_mut()
        .refresh()
        .await
        .map_err(|e| format!("Failed to load order history: {e}"))?;
    let history = session.history();
    let stats = history.stats();
    info!(
        page = history.page(),
        total_pages = history.total_pages(),
        rows = history.orders().len(),
        "Order history loaded"
    );
    info!(
        orders = stats.total_orders,
        completed = stats.completed,
        revenue = stats.total_revenue,
        cash = stats.cash_revenue,
        online = stats.online_revenue,
        "Today's numbers"
    );

    Ok(())
}
