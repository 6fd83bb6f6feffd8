//! Business domain entities, free of transport and UI concerns.

pub mod item;
pub mod order;

pub use item::*;
pub use order::*;
