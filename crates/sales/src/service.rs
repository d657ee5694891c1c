//! Sale workflow: building an open sale, then finalizing it against stock,
//! the customer's history and the seller's commission.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use bloomshop_core::query::require_range;
use bloomshop_core::{
    CustomerId, EmployeeId, Entity, FlowerId, InMemoryRepository, Money, Repository, SaleId,
    ShopError, ShopPolicy, ShopResult,
};
use bloomshop_inventory::FlowerService;
use bloomshop_parties::{CustomerService, EmployeeService};

use crate::sale::{Sale, SaleItem, SaleUpdate};

/// Orchestrates sales across the flower, customer and employee services.
///
/// Finalization runs a read-only check pass before touching anything, so a
/// rejected sale leaves stock and party bookkeeping as they were. The services
/// are shared handles; nothing here locks across them.
pub struct SaleService<R = InMemoryRepository<Sale>> {
    repo: R,
    flowers: Arc<FlowerService>,
    customers: Arc<CustomerService>,
    employees: Arc<EmployeeService>,
    policy: ShopPolicy,
}

impl SaleService {
    pub fn in_memory(
        flowers: Arc<FlowerService>,
        customers: Arc<CustomerService>,
        employees: Arc<EmployeeService>,
        policy: ShopPolicy,
    ) -> Self {
        Self::new(InMemoryRepository::new(), flowers, customers, employees, policy)
    }
}

impl<R> SaleService<R>
where
    R: Repository<Sale>,
{
    pub fn new(
        repo: R,
        flowers: Arc<FlowerService>,
        customers: Arc<CustomerService>,
        employees: Arc<EmployeeService>,
        policy: ShopPolicy,
    ) -> Self {
        Self {
            repo,
            flowers,
            customers,
            employees,
            policy,
        }
    }

    pub fn create_sale(&self, customer_id: CustomerId, employee_id: EmployeeId) -> ShopResult<SaleId> {
        self.create_sale_at(customer_id, employee_id, Utc::now())
    }

    pub fn create_sale_at(
        &self,
        customer_id: CustomerId,
        employee_id: EmployeeId,
        sold_at: DateTime<Utc>,
    ) -> ShopResult<SaleId> {
        self.ensure_parties(customer_id, employee_id)?;
        let id = self.repo.create(Sale::new(customer_id, employee_id, sold_at));
        tracing::info!(sale_id = %id, customer_id = %customer_id, employee_id = %employee_id, "sale created");
        Ok(id)
    }

    /// Add a line priced at the flower's current price.
    ///
    /// Stock is only checked here; it is taken on finalize.
    pub fn add_item(&self, sale_id: SaleId, flower_id: FlowerId, quantity: u32) -> ShopResult<Sale> {
        if quantity == 0 {
            return Err(ShopError::validation("quantity must be positive"));
        }
        let mut sale = self.get(sale_id)?;
        if !sale.is_modifiable() {
            return Err(ShopError::invalid_state(format!(
                "cannot add items to sale {sale_id} once it is finalized"
            )));
        }
        let flower = self.flowers.get(flower_id)?;
        if !flower.can_supply(u64::from(quantity)) {
            return Err(ShopError::insufficient_stock(
                flower_id,
                u64::from(quantity),
                flower.stock(),
            ));
        }

        sale.add_item(SaleItem::new(flower_id, flower.name.clone(), quantity, flower.price))?;
        self.persist(&sale)?;
        tracing::debug!(sale_id = %sale_id, flower_id = %flower_id, quantity, total = %sale.total(), "item added");
        Ok(sale)
    }

    pub fn remove_item(&self, sale_id: SaleId, flower_id: FlowerId) -> ShopResult<Sale> {
        let mut sale = self.get(sale_id)?;
        sale.remove_item(flower_id)?;
        self.persist(&sale)?;
        tracing::debug!(sale_id = %sale_id, flower_id = %flower_id, total = %sale.total(), "item removed");
        Ok(sale)
    }

    /// Close the sale: take the stock, book the purchase and credit the seller.
    pub fn finalize_sale(&self, sale_id: SaleId) -> ShopResult<Sale> {
        let mut sale = self.get(sale_id)?;
        if let Err(err) = self.check_finalizable(&sale) {
            tracing::warn!(sale_id = %sale_id, error = %err, "sale finalization rejected");
            return Err(err);
        }

        for (flower_id, quantity) in sale.demand() {
            let delta = i64::try_from(quantity)
                .map_err(|_| ShopError::validation(format!("quantity {quantity} is too large")))?;
            self.flowers.adjust_stock(flower_id, -delta)?;
        }
        self.customers
            .record_purchase(sale.customer_id(), sale_id, sale.total())?;
        self.employees
            .record_sale(sale.employee_id(), sale_id, sale.total())?;

        sale.mark_finalized()?;
        self.persist(&sale)?;
        tracing::info!(sale_id = %sale_id, total = %sale.total(), items = sale.items().len(), "sale finalized");
        Ok(sale)
    }

    /// Set the discount to `percent` of the gross amount, replacing any previous one.
    pub fn apply_discount(&self, sale_id: SaleId, percent: f64) -> ShopResult<Sale> {
        if !percent.is_finite() || percent <= 0.0 || percent > 100.0 {
            return Err(ShopError::validation(format!(
                "discount percent must be in (0, 100], got {percent}"
            )));
        }
        // Rates are kept in basis points, so precision is 0.01%. Bounded to
        // [0, 10000] by the check above.
        let bps = (percent * 100.0).round() as u32;
        if bps == 0 {
            return Err(ShopError::validation(format!(
                "discount percent {percent} is below the 0.01% precision"
            )));
        }
        self.discount_by_rate(sale_id, bps)
    }

    /// Apply the policy VIP rate. The customer must already be VIP.
    pub fn apply_vip_discount(&self, sale_id: SaleId) -> ShopResult<Sale> {
        let sale = self.get(sale_id)?;
        let customer = self.customers.get(sale.customer_id())?;
        if !customer.is_vip() {
            return Err(ShopError::validation(format!(
                "customer {} is not VIP",
                customer.id()
            )));
        }
        self.discount_by_rate(sale_id, self.policy.vip_discount_bps)
    }

    pub fn update_sale(&self, sale_id: SaleId, update: SaleUpdate) -> ShopResult<Sale> {
        let mut sale = self.get(sale_id)?;
        if !sale.is_modifiable() {
            return Err(ShopError::invalid_state(format!(
                "cannot update sale {sale_id} once it is finalized"
            )));
        }
        self.ensure_parties(
            update.customer_id.unwrap_or(sale.customer_id()),
            update.employee_id.unwrap_or(sale.employee_id()),
        )?;
        sale.apply_update(update)?;
        self.persist(&sale)?;
        Ok(sale)
    }

    /// Delete an open sale. Finalized sales are permanent.
    pub fn remove_sale(&self, sale_id: SaleId) -> ShopResult<()> {
        let sale = self.get(sale_id)?;
        if !sale.is_modifiable() {
            return Err(ShopError::invalid_state(format!(
                "cannot remove sale {sale_id} once it is finalized"
            )));
        }
        if !self.repo.remove(sale_id) {
            return Err(not_found(sale_id));
        }
        tracing::info!(sale_id = %sale_id, "sale removed");
        Ok(())
    }

    pub fn find_by_id(&self, id: SaleId) -> Option<Sale> {
        self.repo.find_by_id(id)
    }

    pub fn get(&self, id: SaleId) -> ShopResult<Sale> {
        self.repo.find_by_id(id).ok_or_else(|| not_found(id))
    }

    pub fn list_all(&self) -> Vec<Sale> {
        self.repo.list_all()
    }

    pub fn count(&self) -> usize {
        self.repo.count()
    }

    pub fn list_by_customer(&self, customer_id: CustomerId) -> Vec<Sale> {
        self.repo.find_where(&|s| s.customer_id() == customer_id)
    }

    pub fn list_by_employee(&self, employee_id: EmployeeId) -> Vec<Sale> {
        self.repo.find_where(&|s| s.employee_id() == employee_id)
    }

    /// Sales on the given UTC calendar day.
    pub fn list_by_date(&self, date: NaiveDate) -> Vec<Sale> {
        self.repo.find_where(&|s| s.sold_at().date_naive() == date)
    }

    /// Sales with `start <= sold_at <= end`.
    pub fn list_by_period(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> ShopResult<Vec<Sale>> {
        require_range("period", start, end)?;
        Ok(self
            .repo
            .find_where(&|s| s.sold_at() >= start && s.sold_at() <= end))
    }

    pub fn list_finalized(&self) -> Vec<Sale> {
        self.repo.find_where(&|s| s.is_finalized())
    }

    pub fn list_pending(&self) -> Vec<Sale> {
        self.repo.find_where(&|s| s.is_modifiable())
    }

    /// Sum of totals over the period, open sales included.
    pub fn total_sales(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> ShopResult<Money> {
        Ok(self
            .list_by_period(start, end)?
            .iter()
            .map(Sale::total)
            .sum())
    }

    fn check_finalizable(&self, sale: &Sale) -> ShopResult<()> {
        if !sale.is_modifiable() {
            return Err(ShopError::invalid_state(format!(
                "sale {} is already finalized",
                sale.id()
            )));
        }
        if sale.items().is_empty() {
            return Err(ShopError::EmptySale(sale.id()));
        }
        for (flower_id, quantity) in sale.demand() {
            let flower = self.flowers.get(flower_id)?;
            if !flower.can_supply(quantity) {
                return Err(ShopError::insufficient_stock(flower_id, quantity, flower.stock()));
            }
        }
        self.ensure_parties(sale.customer_id(), sale.employee_id())
    }

    fn discount_by_rate(&self, sale_id: SaleId, bps: u32) -> ShopResult<Sale> {
        let mut sale = self.get(sale_id)?;
        let discount = sale.gross().apply_rate(bps);
        sale.set_discount(discount)?;
        self.persist(&sale)?;
        tracing::debug!(sale_id = %sale_id, discount = %discount, total = %sale.total(), "discount applied");
        Ok(sale)
    }

    fn ensure_parties(&self, customer_id: CustomerId, employee_id: EmployeeId) -> ShopResult<()> {
        if !self.customers.exists(customer_id) {
            return Err(ShopError::not_found(format!("customer {customer_id}")));
        }
        if !self.employees.exists(employee_id) {
            return Err(ShopError::not_found(format!("employee {employee_id}")));
        }
        Ok(())
    }

    fn persist(&self, sale: &Sale) -> ShopResult<()> {
        if self.repo.update(sale.clone()) {
            Ok(())
        } else {
            Err(not_found(sale.id()))
        }
    }
}

fn not_found(id: SaleId) -> ShopError {
    ShopError::not_found(format!("sale {id}"))
}
