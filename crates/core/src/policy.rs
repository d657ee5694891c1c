//! Business constants shared by the services.

use serde::{Deserialize, Serialize};

use crate::error::{ShopError, ShopResult};
use crate::value_object::{BPS_SCALE, Money};

/// Commercial rules: VIP threshold, VIP discount and sales commission.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopPolicy {
    /// Cumulative spend at which a customer becomes VIP.
    pub vip_threshold: Money,
    /// Discount granted to VIP customers, in basis points.
    pub vip_discount_bps: u32,
    /// Share of each finalized sale credited to the seller, in basis points.
    pub commission_bps: u32,
}

impl Default for ShopPolicy {
    fn default() -> Self {
        Self {
            vip_threshold: Money::new(1000, 0),
            vip_discount_bps: 1_000,
            commission_bps: 500,
        }
    }
}

impl ShopPolicy {
    pub fn validate(&self) -> ShopResult<()> {
        if self.vip_discount_bps > BPS_SCALE {
            return Err(ShopError::validation("vip_discount_bps cannot exceed 10000"));
        }
        if self.commission_bps > BPS_SCALE {
            return Err(ShopError::validation("commission_bps cannot exceed 10000"));
        }
        Ok(())
    }

    pub fn commission_on(&self, sale_total: Money) -> Money {
        sale_total.apply_rate(self.commission_bps)
    }

    pub fn vip_discount_on(&self, amount: Money) -> Money {
        amount.apply_rate(self.vip_discount_bps)
    }
}
