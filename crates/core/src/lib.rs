//! `bloomshop-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by every module:
//! errors, typed ids, money, the shop policy and the generic repository.

pub mod entity;
pub mod error;
pub mod id;
pub mod policy;
pub mod query;
pub mod repository;
pub mod value_object;

pub use entity::Entity;
pub use error::{ShopError, ShopResult, require_non_empty};
pub use id::{CustomerId, EmployeeId, FlowerId, SaleId, SequentialId, SupplierId};
pub use policy::ShopPolicy;
pub use repository::{InMemoryRepository, Repository};
pub use value_object::{Money, ValueObject};
