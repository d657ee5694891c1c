//! Customer registry, CPF uniqueness and VIP bookkeeping.

use bloomshop_core::query::{contains_ignore_case, require_range, search_term};
use bloomshop_core::{
    CustomerId, Entity, InMemoryRepository, Money, Repository, SaleId, ShopError, ShopPolicy,
    ShopResult,
};

use crate::contact::Person;
use crate::customer::Customer;
use crate::document::{same_document, validate_cpf};

#[derive(Debug)]
pub struct CustomerService<R = InMemoryRepository<Customer>> {
    repo: R,
    policy: ShopPolicy,
}

impl CustomerService {
    pub fn in_memory(policy: ShopPolicy) -> Self {
        Self::new(InMemoryRepository::new(), policy)
    }
}

impl<R> CustomerService<R>
where
    R: Repository<Customer>,
{
    pub fn new(repo: R, policy: ShopPolicy) -> Self {
        Self { repo, policy }
    }

    pub fn register(&self, customer: Customer) -> ShopResult<CustomerId> {
        customer.validate()?;
        self.ensure_cpf_free(&customer.cpf, None)?;
        let id = self.repo.create(customer);
        tracing::info!(customer_id = %id, "customer registered");
        Ok(id)
    }

    /// Replace the descriptive fields, keeping history, total spent and VIP status.
    pub fn update(&self, customer: Customer) -> ShopResult<Customer> {
        customer.validate()?;
        let mut stored = self.get(customer.id())?;
        self.ensure_cpf_free(&customer.cpf, Some(stored.id()))?;
        stored.merge_details(customer);
        self.persist(&stored)?;
        Ok(stored)
    }

    pub fn remove(&self, id: CustomerId) -> ShopResult<()> {
        if !self.repo.remove(id) {
            return Err(not_found(id));
        }
        tracing::info!(customer_id = %id, "customer removed");
        Ok(())
    }

    pub fn find_by_id(&self, id: CustomerId) -> Option<Customer> {
        self.repo.find_by_id(id)
    }

    pub fn get(&self, id: CustomerId) -> ShopResult<Customer> {
        self.repo.find_by_id(id).ok_or_else(|| not_found(id))
    }

    pub fn exists(&self, id: CustomerId) -> bool {
        self.repo.exists(id)
    }

    pub fn list_all(&self) -> Vec<Customer> {
        self.repo.list_all()
    }

    pub fn count(&self) -> usize {
        self.repo.count()
    }

    pub fn find_by_cpf(&self, cpf: &str) -> ShopResult<Option<Customer>> {
        validate_cpf(cpf)?;
        Ok(self
            .repo
            .find_where(&|c| same_document(&c.cpf, cpf))
            .into_iter()
            .next())
    }

    pub fn exists_by_cpf(&self, cpf: &str) -> ShopResult<bool> {
        Ok(self.find_by_cpf(cpf)?.is_some())
    }

    pub fn search_by_name(&self, name: &str) -> ShopResult<Vec<Customer>> {
        let term = search_term("name", name)?;
        Ok(self.repo.find_where(&|c| contains_ignore_case(&c.name, term)))
    }

    pub fn list_vip(&self) -> Vec<Customer> {
        self.repo.find_where(&|c| c.is_vip())
    }

    pub fn list_by_spending_range(&self, min: Money, max: Money) -> ShopResult<Vec<Customer>> {
        require_range("total spent", min, max)?;
        Ok(self
            .repo
            .find_where(&|c| c.total_spent() >= min && c.total_spent() <= max))
    }

    pub fn promote_to_vip(&self, id: CustomerId) -> ShopResult<Customer> {
        let mut customer = self.get(id)?;
        customer.promote_to_vip();
        self.persist(&customer)?;
        tracing::info!(customer_id = %id, "customer promoted to VIP");
        Ok(customer)
    }

    /// Discount the customer is entitled to on `amount` under the shop policy.
    pub fn vip_discount(&self, id: CustomerId, amount: Money) -> ShopResult<Money> {
        if self.get(id)?.is_vip() {
            Ok(self.policy.vip_discount_on(amount))
        } else {
            Ok(Money::ZERO)
        }
    }

    /// Book a finalized sale against the customer and re-evaluate VIP status.
    pub fn record_purchase(
        &self,
        id: CustomerId,
        sale_id: SaleId,
        amount: Money,
    ) -> ShopResult<Customer> {
        let mut customer = self.get(id)?;
        if customer.record_purchase(sale_id, amount, self.policy.vip_threshold) {
            tracing::info!(
                customer_id = %id,
                total_spent = %customer.total_spent(),
                "customer reached VIP threshold"
            );
        }
        self.persist(&customer)?;
        Ok(customer)
    }

    fn ensure_cpf_free(&self, cpf: &str, exclude: Option<CustomerId>) -> ShopResult<()> {
        let taken = self
            .repo
            .find_where(&|c| Some(c.id()) != exclude && same_document(&c.cpf, cpf));
        if let Some(other) = taken.first() {
            return Err(ShopError::duplicate_key(format!(
                "cpf {cpf} already registered to customer {}",
                other.id()
            )));
        }
        Ok(())
    }

    fn persist(&self, customer: &Customer) -> ShopResult<()> {
        if self.repo.update(customer.clone()) {
            Ok(())
        } else {
            Err(not_found(customer.id()))
        }
    }
}

fn not_found(id: CustomerId) -> ShopError {
    ShopError::not_found(format!("customer {id}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::ContactInfo;

    fn customer(name: &str, cpf: &str) -> Customer {
        Customer::new(
            name,
            cpf,
            ContactInfo::new("(11) 90000-0000", "cliente@example.com", ""),
        )
    }

    #[test]
    fn duplicate_cpf_is_rejected_across_formats() {
        let service = CustomerService::in_memory(ShopPolicy::default());
        service.register(customer("Ana", "123.456.789-01")).unwrap();
        let err = service.register(customer("Bia", "12345678901")).unwrap_err();
        assert!(matches!(err, ShopError::DuplicateKey(_)));
        assert_eq!(service.count(), 1);
    }

    #[test]
    fn update_may_keep_own_cpf_but_not_take_anothers() {
        let service = CustomerService::in_memory(ShopPolicy::default());
        let ana = service.register(customer("Ana", "123.456.789-01")).unwrap();
        service.register(customer("Bia", "987.654.321-00")).unwrap();

        let mut edited = service.get(ana).unwrap();
        edited.name = "Ana Paula".to_string();
        assert_eq!(service.update(edited.clone()).unwrap().name, "Ana Paula");

        edited.cpf = "987.654.321-00".to_string();
        assert!(matches!(service.update(edited), Err(ShopError::DuplicateKey(_))));
    }

    #[test]
    fn update_keeps_purchase_bookkeeping() {
        let service = CustomerService::in_memory(ShopPolicy::default());
        let id = service.register(customer("Ana", "123.456.789-01")).unwrap();
        let stale = service.get(id).unwrap();

        service
            .record_purchase(id, SaleId::from_raw(1), Money::new(1200, 0))
            .unwrap();
        let updated = service.update(stale).unwrap();
        assert!(updated.is_vip());
        assert_eq!(updated.total_spent(), Money::new(1200, 0));
        assert_eq!(updated.purchase_history(), &[SaleId::from_raw(1)]);
    }

    #[test]
    fn promote_and_discount() {
        let service = CustomerService::in_memory(ShopPolicy::default());
        let id = service.register(customer("Ana", "123.456.789-01")).unwrap();
        assert_eq!(service.vip_discount(id, Money::new(50, 0)).unwrap(), Money::ZERO);

        service.promote_to_vip(id).unwrap();
        assert_eq!(service.list_vip().len(), 1);
        assert_eq!(service.vip_discount(id, Money::new(50, 0)).unwrap(), Money::new(5, 0));
        assert!(matches!(
            service.promote_to_vip(CustomerId::from_raw(42)),
            Err(ShopError::NotFound(_))
        ));
    }

    #[test]
    fn lookups_by_cpf_name_and_spending() {
        let service = CustomerService::in_memory(ShopPolicy::default());
        let id = service.register(customer("Ana Souza", "123.456.789-01")).unwrap();
        service
            .record_purchase(id, SaleId::from_raw(1), Money::new(300, 0))
            .unwrap();

        assert_eq!(service.find_by_cpf("12345678901").unwrap().map(|c| c.id()), Some(id));
        assert!(!service.exists_by_cpf("987.654.321-00").unwrap());
        assert!(service.find_by_cpf("42").is_err());
        assert_eq!(service.search_by_name("souza").unwrap().len(), 1);
        assert_eq!(
            service
                .list_by_spending_range(Money::new(100, 0), Money::new(500, 0))
                .unwrap()
                .len(),
            1
        );
        assert!(
            service
                .list_by_spending_range(Money::new(500, 0), Money::new(100, 0))
                .is_err()
        );
    }
}
