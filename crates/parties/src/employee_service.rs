//! Staff registry, activation and commission bookkeeping.

use bloomshop_core::query::{contains_ignore_case, search_term};
use bloomshop_core::{
    EmployeeId, Entity, InMemoryRepository, Money, Repository, SaleId, ShopError, ShopPolicy,
    ShopResult,
};

use crate::contact::Person;
use crate::document::{same_document, validate_cpf};
use crate::employee::Employee;

#[derive(Debug)]
pub struct EmployeeService<R = InMemoryRepository<Employee>> {
    repo: R,
    policy: ShopPolicy,
}

impl EmployeeService {
    pub fn in_memory(policy: ShopPolicy) -> Self {
        Self::new(InMemoryRepository::new(), policy)
    }
}

impl<R> EmployeeService<R>
where
    R: Repository<Employee>,
{
    pub fn new(repo: R, policy: ShopPolicy) -> Self {
        Self { repo, policy }
    }

    pub fn register(&self, employee: Employee) -> ShopResult<EmployeeId> {
        employee.validate()?;
        self.ensure_cpf_free(&employee.cpf, None)?;
        let id = self.repo.create(employee);
        tracing::info!(employee_id = %id, "employee registered");
        Ok(id)
    }

    /// Replace the descriptive fields, keeping sales history, commission and activation.
    pub fn update(&self, employee: Employee) -> ShopResult<Employee> {
        employee.validate()?;
        let mut stored = self.get(employee.id())?;
        self.ensure_cpf_free(&employee.cpf, Some(stored.id()))?;
        stored.merge_details(employee);
        self.persist(&stored)?;
        Ok(stored)
    }

    pub fn remove(&self, id: EmployeeId) -> ShopResult<()> {
        if !self.repo.remove(id) {
            return Err(not_found(id));
        }
        tracing::info!(employee_id = %id, "employee removed");
        Ok(())
    }

    pub fn find_by_id(&self, id: EmployeeId) -> Option<Employee> {
        self.repo.find_by_id(id)
    }

    pub fn get(&self, id: EmployeeId) -> ShopResult<Employee> {
        self.repo.find_by_id(id).ok_or_else(|| not_found(id))
    }

    pub fn exists(&self, id: EmployeeId) -> bool {
        self.repo.exists(id)
    }

    pub fn list_all(&self) -> Vec<Employee> {
        self.repo.list_all()
    }

    pub fn count(&self) -> usize {
        self.repo.count()
    }

    pub fn find_by_cpf(&self, cpf: &str) -> ShopResult<Option<Employee>> {
        validate_cpf(cpf)?;
        Ok(self
            .repo
            .find_where(&|e| same_document(&e.cpf, cpf))
            .into_iter()
            .next())
    }

    pub fn exists_by_cpf(&self, cpf: &str) -> ShopResult<bool> {
        Ok(self.find_by_cpf(cpf)?.is_some())
    }

    pub fn search_by_name(&self, name: &str) -> ShopResult<Vec<Employee>> {
        let term = search_term("name", name)?;
        Ok(self.repo.find_where(&|e| contains_ignore_case(&e.name, term)))
    }

    pub fn list_active(&self) -> Vec<Employee> {
        self.repo.find_where(&|e| e.is_active())
    }

    pub fn list_inactive(&self) -> Vec<Employee> {
        self.repo.find_where(&|e| !e.is_active())
    }

    pub fn list_by_role(&self, role: &str) -> ShopResult<Vec<Employee>> {
        let term = search_term("role", role)?;
        Ok(self.repo.find_where(&|e| contains_ignore_case(&e.role, term)))
    }

    pub fn list_salespeople(&self) -> Vec<Employee> {
        self.repo.find_where(&|e| e.is_salesperson())
    }

    pub fn activate(&self, id: EmployeeId) -> ShopResult<Employee> {
        self.set_active(id, true)
    }

    pub fn deactivate(&self, id: EmployeeId) -> ShopResult<Employee> {
        self.set_active(id, false)
    }

    /// Commission accumulated so far.
    pub fn commission(&self, id: EmployeeId) -> ShopResult<Money> {
        Ok(self.get(id)?.total_commission())
    }

    /// Credit a finalized sale to the seller under the shop commission rate.
    pub fn record_sale(
        &self,
        id: EmployeeId,
        sale_id: SaleId,
        sale_total: Money,
    ) -> ShopResult<Employee> {
        let mut employee = self.get(id)?;
        let commission = self.policy.commission_on(sale_total);
        employee.record_sale(sale_id, commission);
        self.persist(&employee)?;
        tracing::debug!(employee_id = %id, sale_id = %sale_id, commission = %commission, "commission credited");
        Ok(employee)
    }

    fn set_active(&self, id: EmployeeId, active: bool) -> ShopResult<Employee> {
        let mut employee = self.get(id)?;
        employee.set_active(active);
        self.persist(&employee)?;
        tracing::info!(employee_id = %id, active, "employee activation changed");
        Ok(employee)
    }

    fn ensure_cpf_free(&self, cpf: &str, exclude: Option<EmployeeId>) -> ShopResult<()> {
        let taken = self
            .repo
            .find_where(&|e| Some(e.id()) != exclude && same_document(&e.cpf, cpf));
        if let Some(other) = taken.first() {
            return Err(ShopError::duplicate_key(format!(
                "cpf {cpf} already registered to employee {}",
                other.id()
            )));
        }
        Ok(())
    }

    fn persist(&self, employee: &Employee) -> ShopResult<()> {
        if self.repo.update(employee.clone()) {
            Ok(())
        } else {
            Err(not_found(employee.id()))
        }
    }
}

fn not_found(id: EmployeeId) -> ShopError {
    ShopError::not_found(format!("employee {id}"))
}
