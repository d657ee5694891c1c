//! Process configuration read from the environment.

use std::str::FromStr;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use bloomshop_core::{Money, ShopPolicy};
use bloomshop_observability::{LogConfig, LogFormat};

pub const VIP_THRESHOLD_CENTS: &str = "BLOOMSHOP_VIP_THRESHOLD_CENTS";
pub const VIP_DISCOUNT_BPS: &str = "BLOOMSHOP_VIP_DISCOUNT_BPS";
pub const COMMISSION_BPS: &str = "BLOOMSHOP_COMMISSION_BPS";
pub const LOG_FORMAT: &str = "BLOOMSHOP_LOG_FORMAT";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopConfig {
    pub policy: ShopPolicy,
    pub log: LogConfig,
}

impl ShopConfig {
    /// Read the configuration from process environment variables.
    ///
    /// Unset variables keep their defaults; malformed ones are an error naming
    /// the variable.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = ShopPolicy::default();
        let policy = ShopPolicy {
            vip_threshold: Money::from_cents(parse_or(
                &lookup,
                VIP_THRESHOLD_CENTS,
                defaults.vip_threshold.cents(),
            )?),
            vip_discount_bps: parse_or(&lookup, VIP_DISCOUNT_BPS, defaults.vip_discount_bps)?,
            commission_bps: parse_or(&lookup, COMMISSION_BPS, defaults.commission_bps)?,
        };
        policy.validate().context("invalid shop policy")?;

        let log = LogConfig {
            format: parse_or(&lookup, LOG_FORMAT, LogFormat::default())?,
            ..LogConfig::default()
        };

        Ok(Self { policy, log })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(name) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} has invalid value {raw:?}")),
        _ => Ok(default),
    }
}
