//! Strongly-typed identifiers used across the domain.
//!
//! Ids are positive integers handed out by the owning repository at insertion
//! time. The zero value marks an entity that has not been stored yet.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::ShopError;

/// Identifier backed by a repository sequence.
pub trait SequentialId: Copy + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display {
    fn from_raw(raw: u64) -> Self;
}

/// Identifier of a flower.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlowerId(u64);

/// Identifier of a customer.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(u64);

/// Identifier of a supplier.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SupplierId(u64);

/// Identifier of an employee.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(u64);

/// Identifier of a sale.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaleId(u64);

macro_rules! impl_sequential_id {
    ($t:ty, $name:literal) => {
        impl $t {
            pub const fn from_raw(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl SequentialId for $t {
            fn from_raw(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<u64> for $t {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for u64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = ShopError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = s
                    .trim()
                    .parse::<u64>()
                    .map_err(|e| ShopError::validation(format!("{}: {}", $name, e)))?;
                if raw == 0 {
                    return Err(ShopError::validation(format!("{}: must be positive", $name)));
                }
                Ok(Self(raw))
            }
        }
    };
}

impl_sequential_id!(FlowerId, "FlowerId");
impl_sequential_id!(CustomerId, "CustomerId");
impl_sequential_id!(SupplierId, "SupplierId");
impl_sequential_id!(EmployeeId, "EmployeeId");
impl_sequential_id!(SaleId, "SaleId");
