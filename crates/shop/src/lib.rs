//! Composition root: configuration and the wired-up shop.

pub mod config;
pub mod shop;

pub use config::ShopConfig;
pub use shop::FlowerShop;
