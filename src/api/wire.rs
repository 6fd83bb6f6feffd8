//! Wire shapes for the backend's JSON, including the compatibility shim
//! for its two list-response conventions: a bare array, or an envelope
//! `{data|orders: [...], totalPages}`. The envelope is the formal contract;
//! the bare array is tolerated and flagged so callers can paginate locally.

use serde::{Deserialize, Serialize};

use crate::domain::Order;

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryWire {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(rename = "categoryName")]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemWire {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(rename = "itemName")]
    pub name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(rename = "isAvailable", default = "default_true")]
    pub available: bool,
}

fn default_true() -> bool {
    true
}

/// Body for `POST /items` and `PUT /items/{id}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPayload {
    pub item_name: String,
    pub category_id: String,
    pub price: f64,
    pub is_available: bool,
}

#[derive(Debug, Serialize)]
pub struct CategoryPayload<'a> {
    #[serde(rename = "categoryName")]
    pub category_name: &'a str,
}

/// Either list-response convention.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Envelope {
        #[serde(alias = "orders")]
        data: Vec<T>,
        #[serde(rename = "totalPages", default)]
        total_pages: Option<u32>,
    },
    Bare(Vec<T>),
}

impl<T> Listing<T> {
    pub fn into_rows(self) -> Vec<T> {
        match self {
            Listing::Envelope { data, .. } => data,
            Listing::Bare(rows) => rows,
        }
    }
}

/// One page of orders. `total_pages` is `None` when the backend answered
/// with a bare array, in which case the caller paginates locally.
#[derive(Debug)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub total_pages: Option<u32>,
}

impl From<Listing<Order>> for OrderPage {
    fn from(listing: Listing<Order>) -> Self {
        match listing {
            Listing::Envelope { data, total_pages } => Self {
                orders: data,
                total_pages: Some(total_pages.unwrap_or(1)),
            },
            Listing::Bare(orders) => Self {
                orders,
                total_pages: None,
            },
        }
    }
}
