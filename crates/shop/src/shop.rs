use std::sync::Arc;

use bloomshop_core::{FlowerId, ShopError, ShopPolicy, ShopResult, SupplierId};
use bloomshop_inventory::{Flower, FlowerService};
use bloomshop_parties::{CustomerService, EmployeeService, Supplier, SupplierService};
use bloomshop_sales::SaleService;

use crate::config::ShopConfig;

/// Every service of the shop, wired over in-memory repositories.
///
/// The flower, customer and employee services are shared with the sale
/// workflow, so changes made through either handle are seen by both.
pub struct FlowerShop {
    policy: ShopPolicy,
    flowers: Arc<FlowerService>,
    customers: Arc<CustomerService>,
    employees: Arc<EmployeeService>,
    suppliers: SupplierService,
    sales: SaleService,
}

impl FlowerShop {
    pub fn new(policy: ShopPolicy) -> Self {
        let flowers = Arc::new(FlowerService::in_memory());
        let customers = Arc::new(CustomerService::in_memory(policy));
        let employees = Arc::new(EmployeeService::in_memory(policy));
        let sales = SaleService::in_memory(
            Arc::clone(&flowers),
            Arc::clone(&customers),
            Arc::clone(&employees),
            policy,
        );

        Self {
            policy,
            flowers,
            customers,
            employees,
            suppliers: SupplierService::in_memory(),
            sales,
        }
    }

    pub fn from_config(config: &ShopConfig) -> Self {
        Self::new(config.policy)
    }

    pub fn policy(&self) -> &ShopPolicy {
        &self.policy
    }

    pub fn flowers(&self) -> &FlowerService {
        &self.flowers
    }

    pub fn customers(&self) -> &CustomerService {
        &self.customers
    }

    pub fn employees(&self) -> &EmployeeService {
        &self.employees
    }

    pub fn suppliers(&self) -> &SupplierService {
        &self.suppliers
    }

    pub fn sales(&self) -> &SaleService {
        &self.sales
    }

    /// Record that `supplier_id` supplies `flower_id`. Both must exist.
    pub fn link_supplier_flower(
        &self,
        supplier_id: SupplierId,
        flower_id: FlowerId,
    ) -> ShopResult<Supplier> {
        if !self.flowers.exists(flower_id) {
            return Err(ShopError::not_found(format!("flower {flower_id}")));
        }
        self.suppliers.add_supplied_flower(supplier_id, flower_id)
    }

    pub fn unlink_supplier_flower(
        &self,
        supplier_id: SupplierId,
        flower_id: FlowerId,
    ) -> ShopResult<Supplier> {
        self.suppliers.remove_supplied_flower(supplier_id, flower_id)
    }

    /// Flowers listed by a supplier that are still in the catalogue.
    pub fn flowers_supplied_by(&self, supplier_id: SupplierId) -> ShopResult<Vec<Flower>> {
        let supplier = self.suppliers.get(supplier_id)?;
        Ok(supplier
            .supplied_flowers()
            .iter()
            .filter_map(|id| self.flowers.find_by_id(*id))
            .collect())
    }

    pub fn suppliers_of(&self, flower_id: FlowerId) -> Vec<Supplier> {
        self.suppliers.list_supplying(flower_id)
    }
}

impl Default for FlowerShop {
    fn default() -> Self {
        Self::new(ShopPolicy::default())
    }
}
