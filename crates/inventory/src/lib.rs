//! Inventory domain module: the flower catalogue and its stock.
//!
//! Flowers carry the only compound state transition outside the sale workflow:
//! stock adjustment, which also drives the availability flag.

pub mod flower;
pub mod service;

pub use flower::Flower;
pub use service::FlowerService;
