//! Sales domain module.
//!
//! A sale is built while `Open` and becomes permanent once `Finalized`, at which
//! point stock, the customer's purchase history and the seller's commission are
//! updated together.

pub mod sale;
pub mod service;

pub use sale::{Sale, SaleItem, SaleStatus, SaleUpdate};
pub use service::SaleService;
