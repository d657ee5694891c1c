//! Supplier registry and CNPJ uniqueness.

use bloomshop_core::query::{contains_ignore_case, search_term};
use bloomshop_core::{
    Entity, FlowerId, InMemoryRepository, Repository, ShopError, ShopResult, SupplierId,
};

use crate::document::{same_document, validate_cnpj};
use crate::supplier::Supplier;

#[derive(Debug)]
pub struct SupplierService<R = InMemoryRepository<Supplier>> {
    repo: R,
}

impl SupplierService {
    pub fn in_memory() -> Self {
        Self::new(InMemoryRepository::new())
    }
}

impl<R> SupplierService<R>
where
    R: Repository<Supplier>,
{
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn register(&self, supplier: Supplier) -> ShopResult<SupplierId> {
        supplier.validate()?;
        self.ensure_cnpj_free(&supplier.cnpj, None)?;
        let id = self.repo.create(supplier);
        tracing::info!(supplier_id = %id, "supplier registered");
        Ok(id)
    }

    /// Replace the descriptive fields, keeping the flower list and activation.
    pub fn update(&self, supplier: Supplier) -> ShopResult<Supplier> {
        supplier.validate()?;
        let mut stored = self.get(supplier.id())?;
        self.ensure_cnpj_free(&supplier.cnpj, Some(stored.id()))?;
        stored.merge_details(supplier);
        self.persist(&stored)?;
        Ok(stored)
    }

    pub fn remove(&self, id: SupplierId) -> ShopResult<()> {
        if !self.repo.remove(id) {
            return Err(not_found(id));
        }
        tracing::info!(supplier_id = %id, "supplier removed");
        Ok(())
    }

    pub fn find_by_id(&self, id: SupplierId) -> Option<Supplier> {
        self.repo.find_by_id(id)
    }

    pub fn get(&self, id: SupplierId) -> ShopResult<Supplier> {
        self.repo.find_by_id(id).ok_or_else(|| not_found(id))
    }

    pub fn exists(&self, id: SupplierId) -> bool {
        self.repo.exists(id)
    }

    pub fn list_all(&self) -> Vec<Supplier> {
        self.repo.list_all()
    }

    pub fn count(&self) -> usize {
        self.repo.count()
    }

    pub fn find_by_cnpj(&self, cnpj: &str) -> ShopResult<Option<Supplier>> {
        validate_cnpj(cnpj)?;
        Ok(self
            .repo
            .find_where(&|s| same_document(&s.cnpj, cnpj))
            .into_iter()
            .next())
    }

    pub fn exists_by_cnpj(&self, cnpj: &str) -> ShopResult<bool> {
        Ok(self.find_by_cnpj(cnpj)?.is_some())
    }

    pub fn search_by_name(&self, name: &str) -> ShopResult<Vec<Supplier>> {
        let term = search_term("name", name)?;
        Ok(self.repo.find_where(&|s| contains_ignore_case(&s.name, term)))
    }

    pub fn list_active(&self) -> Vec<Supplier> {
        self.repo.find_where(&|s| s.is_active())
    }

    pub fn list_inactive(&self) -> Vec<Supplier> {
        self.repo.find_where(&|s| !s.is_active())
    }

    pub fn activate(&self, id: SupplierId) -> ShopResult<Supplier> {
        self.set_active(id, true)
    }

    pub fn deactivate(&self, id: SupplierId) -> ShopResult<Supplier> {
        self.set_active(id, false)
    }

    /// List a flower as supplied. Adding one already listed is a no-op.
    ///
    /// The flower's existence is not checked here; callers holding the flower
    /// catalogue do that.
    pub fn add_supplied_flower(&self, id: SupplierId, flower_id: FlowerId) -> ShopResult<Supplier> {
        let mut supplier = self.get(id)?;
        if supplier.add_flower(flower_id) {
            self.persist(&supplier)?;
            tracing::debug!(supplier_id = %id, flower_id = %flower_id, "flower linked to supplier");
        }
        Ok(supplier)
    }

    pub fn remove_supplied_flower(
        &self,
        id: SupplierId,
        flower_id: FlowerId,
    ) -> ShopResult<Supplier> {
        let mut supplier = self.get(id)?;
        if !supplier.remove_flower(flower_id) {
            return Err(ShopError::not_found(format!(
                "flower {flower_id} is not supplied by supplier {id}"
            )));
        }
        self.persist(&supplier)?;
        Ok(supplier)
    }

    /// Suppliers listing `flower_id`.
    pub fn list_supplying(&self, flower_id: FlowerId) -> Vec<Supplier> {
        self.repo.find_where(&|s| s.supplies(flower_id))
    }

    fn set_active(&self, id: SupplierId, active: bool) -> ShopResult<Supplier> {
        let mut supplier = self.get(id)?;
        supplier.set_active(active);
        self.persist(&supplier)?;
        tracing::info!(supplier_id = %id, active, "supplier activation changed");
        Ok(supplier)
    }

    fn ensure_cnpj_free(&self, cnpj: &str, exclude: Option<SupplierId>) -> ShopResult<()> {
        let taken = self
            .repo
            .find_where(&|s| Some(s.id()) != exclude && same_document(&s.cnpj, cnpj));
        if let Some(other) = taken.first() {
            return Err(ShopError::duplicate_key(format!(
                "cnpj {cnpj} already registered to supplier {}",
                other.id()
            )));
        }
        Ok(())
    }

    fn persist(&self, supplier: &Supplier) -> ShopResult<()> {
        if self.repo.update(supplier.clone()) {
            Ok(())
        } else {
            Err(not_found(supplier.id()))
        }
    }
}

fn not_found(id: SupplierId) -> ShopError {
    ShopError::not_found(format!("supplier {id}"))
}
