use reqwest::StatusCode;
use thiserror::Error;

use crate::domain::OrderStatus;

/// Errors surfaced by the backend API client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Http { status: StatusCode, body: String },
    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors from the order submission flow.
///
/// On any of these the cart is left untouched so the operator can retry.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cannot place an order with an empty cart")]
    EmptyCart,
    #[error("an order submission is already in flight")]
    SubmissionInFlight,
    #[error("failed to place order: {0}")]
    Api(#[from] ApiError),
}

/// Errors from order history actions.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("order {id} is already {status}")]
    OrderFinal { id: String, status: OrderStatus },
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Error)]
#[error("printer error: {0}")]
pub struct PrintError(#[from] std::io::Error);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    MissingVar(&'static str),
    #[error("invalid value {value:?} for {var}")]
    InvalidVar { var: &'static str, value: String },
}
