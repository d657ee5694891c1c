use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use bloomshop_core::{Entity, FlowerId, Money, ShopError, ShopResult, require_non_empty};

/// Entity: Flower.
///
/// Stock and availability are bookkeeping fields: they only move through
/// [`Flower::add_stock`] / [`Flower::reduce_stock`], never through a plain update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flower {
    id: FlowerId,
    pub name: String,
    pub species: String,
    pub color: String,
    pub price: Money,
    stock: u32,
    pub planting_date: Option<NaiveDate>,
    pub description: String,
    available: bool,
}

impl Flower {
    /// Build an unsaved flower. The repository assigns the id on registration.
    pub fn new(
        name: impl Into<String>,
        species: impl Into<String>,
        color: impl Into<String>,
        price: Money,
        stock: u32,
    ) -> Self {
        Self {
            id: FlowerId::default(),
            name: name.into(),
            species: species.into(),
            color: color.into(),
            price,
            stock,
            planting_date: None,
            description: String::new(),
            available: stock > 0,
        }
    }

    pub fn with_planting_date(mut self, date: NaiveDate) -> Self {
        self.planting_date = Some(date);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn stock(&self) -> u32 {
        self.stock
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Sellable right now: flagged available with something on hand.
    pub fn is_available_for_sale(&self) -> bool {
        self.available && self.stock > 0
    }

    /// Whether `quantity` units can be taken from this flower.
    pub fn can_supply(&self, quantity: u64) -> bool {
        self.is_available_for_sale() && u64::from(self.stock) >= quantity
    }

    pub fn validate(&self) -> ShopResult<()> {
        require_non_empty("name", &self.name)?;
        require_non_empty("species", &self.species)?;
        require_non_empty("color", &self.color)?;
        Ok(())
    }

    /// Restock. Re-enables the flower once it has units again.
    ///
    /// Fails without change if the new stock would not fit.
    pub fn add_stock(&mut self, quantity: u64) -> ShopResult<()> {
        if quantity == 0 {
            return Ok(());
        }
        let stock = u64::from(self.stock)
            .checked_add(quantity)
            .and_then(|total| u32::try_from(total).ok())
            .ok_or_else(|| {
                ShopError::validation(format!(
                    "restocking {quantity} units would exceed the stock capacity of {} (current {})",
                    u32::MAX,
                    self.stock
                ))
            })?;
        self.stock = stock;
        self.available = true;
        Ok(())
    }

    /// Take units out of stock; disables the flower when it hits zero.
    pub fn reduce_stock(&mut self, quantity: u32) -> ShopResult<()> {
        if quantity > self.stock {
            return Err(ShopError::insufficient_stock(
                self.id,
                u64::from(quantity),
                self.stock,
            ));
        }
        self.stock -= quantity;
        if self.stock == 0 {
            self.available = false;
        }
        Ok(())
    }

    /// Copy the descriptive fields of `other`, keeping stock and availability.
    pub fn merge_details(&mut self, other: Flower) {
        self.name = other.name;
        self.species = other.species;
        self.color = other.color;
        self.price = other.price;
        self.planting_date = other.planting_date;
        self.description = other.description;
    }

    pub fn describe(&self) -> String {
        format!(
            "#{} {} ({}, {}) - R$ {} - stock {}{}",
            self.id,
            self.name,
            self.species,
            self.color,
            self.price,
            self.stock,
            if self.available { "" } else { " [unavailable]" },
        )
    }
}

impl Entity for Flower {
    type Id = FlowerId;

    fn id(&self) -> FlowerId {
        self.id
    }

    fn assign_id(&mut self, id: FlowerId) {
        self.id = id;
    }
}
