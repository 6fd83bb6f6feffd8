//! Typed client for the order-management REST backend.

pub mod client;
pub mod wire;

pub use client::*;
pub use wire::*;
