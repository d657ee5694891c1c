use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bloomshop_core::{CustomerId, EmployeeId, Entity, FlowerId, Money, SaleId, ShopError, ShopResult};

/// Sale status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    Open,
    Finalized,
}

/// Sale line: flower, quantity and the price snapshot taken when it was added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleItem {
    flower_id: FlowerId,
    flower_name: String,
    quantity: u32,
    unit_price: Money,
    subtotal: Money,
}

impl SaleItem {
    pub fn new(
        flower_id: FlowerId,
        flower_name: impl Into<String>,
        quantity: u32,
        unit_price: Money,
    ) -> Self {
        Self {
            flower_id,
            flower_name: flower_name.into(),
            quantity,
            unit_price,
            subtotal: unit_price.times(quantity),
        }
    }

    pub fn flower_id(&self) -> FlowerId {
        self.flower_id
    }

    pub fn flower_name(&self) -> &str {
        &self.flower_name
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
        self.subtotal = self.unit_price.times(quantity);
    }

    pub fn set_unit_price(&mut self, unit_price: Money) {
        self.unit_price = unit_price;
        self.subtotal = unit_price.times(self.quantity);
    }
}

/// Partial edit of an open sale's header. `None` leaves the field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleUpdate {
    pub customer_id: Option<CustomerId>,
    pub employee_id: Option<EmployeeId>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

/// Entity: Sale.
///
/// `total` is never set directly; every mutation that touches items or the
/// discount recomputes it as gross minus discount, floored at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    id: SaleId,
    customer_id: CustomerId,
    employee_id: EmployeeId,
    sold_at: DateTime<Utc>,
    items: Vec<SaleItem>,
    discount: Money,
    total: Money,
    payment_method: Option<String>,
    notes: Option<String>,
    status: SaleStatus,
}

impl Sale {
    pub fn new(customer_id: CustomerId, employee_id: EmployeeId, sold_at: DateTime<Utc>) -> Self {
        Self {
            id: SaleId::default(),
            customer_id,
            employee_id,
            sold_at,
            items: Vec::new(),
            discount: Money::ZERO,
            total: Money::ZERO,
            payment_method: None,
            notes: None,
            status: SaleStatus::Open,
        }
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn employee_id(&self) -> EmployeeId {
        self.employee_id
    }

    pub fn sold_at(&self) -> DateTime<Utc> {
        self.sold_at
    }

    pub fn items(&self) -> &[SaleItem] {
        &self.items
    }

    pub fn discount(&self) -> Money {
        self.discount
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn payment_method(&self) -> Option<&str> {
        self.payment_method.as_deref()
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn status(&self) -> SaleStatus {
        self.status
    }

    pub fn is_modifiable(&self) -> bool {
        matches!(self.status, SaleStatus::Open)
    }

    pub fn is_finalized(&self) -> bool {
        matches!(self.status, SaleStatus::Finalized)
    }

    /// Sum of item subtotals, before discount.
    pub fn gross(&self) -> Money {
        self.items.iter().map(SaleItem::subtotal).sum()
    }

    /// Units requested per flower, summed across items.
    pub fn demand(&self) -> BTreeMap<FlowerId, u64> {
        let mut demand = BTreeMap::new();
        for item in &self.items {
            *demand.entry(item.flower_id).or_insert(0) += u64::from(item.quantity);
        }
        demand
    }

    pub fn add_item(&mut self, item: SaleItem) -> ShopResult<()> {
        self.ensure_open("add items to")?;
        if item.quantity == 0 {
            return Err(ShopError::validation("quantity must be positive"));
        }
        self.items.push(item);
        self.recompute_total();
        Ok(())
    }

    /// Removes the first item for `flower_id`.
    pub fn remove_item(&mut self, flower_id: FlowerId) -> ShopResult<SaleItem> {
        self.ensure_open("remove items from")?;
        let pos = self
            .items
            .iter()
            .position(|i| i.flower_id == flower_id)
            .ok_or_else(|| {
                ShopError::not_found(format!("flower {flower_id} is not in sale {}", self.id))
            })?;
        let removed = self.items.remove(pos);
        self.recompute_total();
        Ok(removed)
    }

    /// Replace the discount. It does not accumulate.
    pub fn set_discount(&mut self, discount: Money) -> ShopResult<()> {
        self.ensure_open("discount")?;
        self.discount = discount;
        self.recompute_total();
        Ok(())
    }

    pub fn apply_update(&mut self, update: SaleUpdate) -> ShopResult<()> {
        self.ensure_open("update")?;
        if let Some(customer_id) = update.customer_id {
            self.customer_id = customer_id;
        }
        if let Some(employee_id) = update.employee_id {
            self.employee_id = employee_id;
        }
        if let Some(payment_method) = update.payment_method {
            self.payment_method = Some(payment_method);
        }
        if let Some(notes) = update.notes {
            self.notes = Some(notes);
        }
        Ok(())
    }

    /// Open -> Finalized. Only the sale itself is checked here; stock and
    /// party bookkeeping belong to the caller.
    pub fn mark_finalized(&mut self) -> ShopResult<()> {
        self.ensure_open("finalize")?;
        if self.items.is_empty() {
            return Err(ShopError::EmptySale(self.id));
        }
        self.status = SaleStatus::Finalized;
        Ok(())
    }

    pub fn recompute_total(&mut self) {
        self.total = self.gross().saturating_sub(self.discount);
    }

    pub fn describe(&self) -> String {
        format!(
            "sale #{} - customer {} - employee {} - {} item(s) - discount R$ {} - total R$ {} - {:?}",
            self.id,
            self.customer_id,
            self.employee_id,
            self.items.len(),
            self.discount,
            self.total,
            self.status,
        )
    }

    fn ensure_open(&self, action: &str) -> ShopResult<()> {
        if !self.is_modifiable() {
            return Err(ShopError::invalid_state(format!(
                "cannot {action} sale {} once it is finalized",
                self.id
            )));
        }
        Ok(())
    }
}

impl Entity for Sale {
    type Id = SaleId;

    fn id(&self) -> SaleId {
        self.id
    }

    fn assign_id(&mut self, id: SaleId) {
        self.id = id;
    }
}
