//! Flower catalogue and stock rules.

use bloomshop_core::query::{contains_ignore_case, require_range, search_term};
use bloomshop_core::{
    Entity, FlowerId, InMemoryRepository, Money, Repository, ShopError, ShopResult,
};

use crate::flower::Flower;

/// Business rules for flowers on top of a repository.
#[derive(Debug)]
pub struct FlowerService<R = InMemoryRepository<Flower>> {
    repo: R,
}

impl FlowerService {
    pub fn in_memory() -> Self {
        Self::new(InMemoryRepository::new())
    }
}

impl<R> FlowerService<R>
where
    R: Repository<Flower>,
{
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn register(&self, flower: Flower) -> ShopResult<FlowerId> {
        flower.validate()?;
        let name = flower.name.clone();
        let id = self.repo.create(flower);
        tracing::info!(flower_id = %id, name = %name, "flower registered");
        Ok(id)
    }

    /// Replace the descriptive fields; stock and availability stay as stored.
    pub fn update(&self, flower: Flower) -> ShopResult<Flower> {
        flower.validate()?;
        let mut stored = self.get(flower.id())?;
        stored.merge_details(flower);
        self.persist(&stored)?;
        Ok(stored)
    }

    pub fn remove(&self, id: FlowerId) -> ShopResult<()> {
        if !self.repo.remove(id) {
            return Err(not_found(id));
        }
        tracing::info!(flower_id = %id, "flower removed");
        Ok(())
    }

    pub fn find_by_id(&self, id: FlowerId) -> Option<Flower> {
        self.repo.find_by_id(id)
    }

    pub fn get(&self, id: FlowerId) -> ShopResult<Flower> {
        self.repo.find_by_id(id).ok_or_else(|| not_found(id))
    }

    pub fn exists(&self, id: FlowerId) -> bool {
        self.repo.exists(id)
    }

    pub fn list_all(&self) -> Vec<Flower> {
        self.repo.list_all()
    }

    pub fn count(&self) -> usize {
        self.repo.count()
    }

    pub fn search_by_name(&self, name: &str) -> ShopResult<Vec<Flower>> {
        let term = search_term("name", name)?;
        Ok(self.repo.find_where(&|f| contains_ignore_case(&f.name, term)))
    }

    pub fn search_by_species(&self, species: &str) -> ShopResult<Vec<Flower>> {
        let term = search_term("species", species)?;
        Ok(self.repo.find_where(&|f| contains_ignore_case(&f.species, term)))
    }

    pub fn search_by_color(&self, color: &str) -> ShopResult<Vec<Flower>> {
        let term = search_term("color", color)?;
        Ok(self.repo.find_where(&|f| contains_ignore_case(&f.color, term)))
    }

    pub fn list_available(&self) -> Vec<Flower> {
        self.repo.find_where(&|f| f.is_available_for_sale())
    }

    /// Flowers with `stock <= limit`.
    pub fn list_low_stock(&self, limit: u32) -> Vec<Flower> {
        self.repo.find_where(&|f| f.stock() <= limit)
    }

    pub fn search_by_price_range(&self, min: Money, max: Money) -> ShopResult<Vec<Flower>> {
        require_range("price", min, max)?;
        Ok(self.repo.find_where(&|f| f.price >= min && f.price <= max))
    }

    /// Apply a signed stock delta.
    ///
    /// Positive deltas re-enable the flower; one that would push stock past
    /// `u32::MAX` fails. A reduction larger than the current stock fails. Either
    /// failure leaves the flower untouched.
    pub fn adjust_stock(&self, id: FlowerId, delta: i64) -> ShopResult<Flower> {
        let mut flower = self.get(id)?;
        if delta > 0 {
            flower.add_stock(delta.unsigned_abs())?;
        } else if delta < 0 {
            let quantity = delta.unsigned_abs();
            if quantity > u64::from(flower.stock()) {
                return Err(ShopError::insufficient_stock(id, quantity, flower.stock()));
            }
            // Bounded by the current stock, so it fits in u32.
            flower.reduce_stock(quantity as u32)?;
        } else {
            return Ok(flower);
        }

        self.persist(&flower)?;
        tracing::info!(
            flower_id = %id,
            delta,
            stock = flower.stock(),
            available = flower.is_available(),
            "stock adjusted"
        );
        Ok(flower)
    }

    /// Whether `quantity` units are on hand and sellable.
    pub fn check_availability(&self, id: FlowerId, quantity: u32) -> ShopResult<bool> {
        if quantity == 0 {
            return Err(ShopError::validation("quantity must be positive"));
        }
        Ok(self.get(id)?.can_supply(u64::from(quantity)))
    }

    fn persist(&self, flower: &Flower) -> ShopResult<()> {
        if self.repo.update(flower.clone()) {
            Ok(())
        } else {
            Err(not_found(flower.id()))
        }
    }
}

fn not_found(id: FlowerId) -> ShopError {
    ShopError::not_found(format!("flower {id}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn service_with(stock: u32) -> (FlowerService, FlowerId) {
        let service = FlowerService::in_memory();
        let id = service
            .register(Flower::new("Rosa", "Rosa gallica", "Vermelha", Money::new(15, 90), stock))
            .unwrap();
        (service, id)
    }

    #[test]
    fn register_rejects_blank_fields() {
        let service = FlowerService::in_memory();
        let err = service
            .register(Flower::new("", "Tulipa", "Amarela", Money::new(5, 0), 1))
            .unwrap_err();
        assert!(matches!(err, ShopError::Validation(_)));
        assert_eq!(service.count(), 0);
    }

    #[test]
    fn negative_adjustment_beyond_stock_fails() {
        let (service, id) = service_with(4);
        let err = service.adjust_stock(id, -5).unwrap_err();
        assert_eq!(err, ShopError::insufficient_stock(id, 5, 4));
        assert_eq!(service.get(id).unwrap().stock(), 4);
    }

    #[test]
    fn depleting_then_restocking_toggles_availability() {
        let (service, id) = service_with(4);
        let flower = service.adjust_stock(id, -4).unwrap();
        assert_eq!(flower.stock(), 0);
        assert!(!flower.is_available());
        assert!(service.list_available().is_empty());

        let flower = service.adjust_stock(id, 10).unwrap();
        assert_eq!(flower.stock(), 10);
        assert!(flower.is_available());
    }

    #[test]
    fn restock_overflow_is_rejected_not_clamped() {
        let (service, id) = service_with(u32::MAX - 1);
        assert!(matches!(service.adjust_stock(id, 10), Err(ShopError::Validation(_))));
        assert_eq!(service.get(id).unwrap().stock(), u32::MAX - 1);

        let (service, id) = service_with(0);
        assert!(matches!(
            service.adjust_stock(id, i64::from(u32::MAX) + 1),
            Err(ShopError::Validation(_))
        ));
        assert_eq!(service.get(id).unwrap().stock(), 0);
        assert_eq!(service.adjust_stock(id, i64::from(u32::MAX)).unwrap().stock(), u32::MAX);
    }

    #[test]
    fn adjusting_unknown_flower_is_not_found() {
        let service = FlowerService::in_memory();
        let err = service.adjust_stock(FlowerId::from_raw(9), 1).unwrap_err();
        assert!(matches!(err, ShopError::NotFound(_)));
    }

    #[test]
    fn update_keeps_stock_from_store() {
        let (service, id) = service_with(7);
        let mut edited = service.get(id).unwrap();
        service.adjust_stock(id, -2).unwrap();

        edited.price = Money::new(18, 0);
        let updated = service.update(edited).unwrap();
        assert_eq!(updated.price, Money::new(18, 0));
        assert_eq!(updated.stock(), 5);
    }

    #[test]
    fn queries_filter_by_text_and_range() {
        let service = FlowerService::in_memory();
        service
            .register(Flower::new("Rosa Vermelha", "Rosa", "Vermelha", Money::new(15, 90), 10))
            .unwrap();
        service
            .register(Flower::new("Girassol", "Helianthus", "Amarela", Money::new(8, 0), 2))
            .unwrap();

        assert_eq!(service.search_by_name("rosa").unwrap().len(), 1);
        assert_eq!(service.search_by_color("AMAR").unwrap().len(), 1);
        assert_eq!(service.search_by_species("heli").unwrap().len(), 1);
        assert_eq!(service.list_low_stock(2).len(), 1);
        assert_eq!(
            service
                .search_by_price_range(Money::new(10, 0), Money::new(20, 0))
                .unwrap()
                .len(),
            1
        );
        assert!(service.search_by_name(" ").is_err());
        assert!(
            service
                .search_by_price_range(Money::new(20, 0), Money::new(10, 0))
                .is_err()
        );
    }

    #[test]
    fn availability_check_requires_positive_quantity() {
        let (service, id) = service_with(3);
        assert!(service.check_availability(id, 3).unwrap());
        assert!(!service.check_availability(id, 4).unwrap());
        assert!(matches!(
            service.check_availability(id, 0),
            Err(ShopError::Validation(_))
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: stock tracks the accepted deltas and availability follows it.
        #[test]
        fn stock_never_goes_negative(
            initial in 0u32..50,
            deltas in prop::collection::vec(-60i64..60i64, 1..30)
        ) {
            let (service, id) = service_with(initial);
            let mut expected = i64::from(initial);

            for delta in deltas {
                let result = service.adjust_stock(id, delta);
                if expected + delta < 0 {
                    prop_assert!(
                        matches!(result, Err(ShopError::InsufficientStock { .. })),
                        "expected insufficient stock error"
                    );
                } else {
                    prop_assert!(result.is_ok());
                    expected += delta;
                }

                let flower = service.get(id).unwrap();
                prop_assert_eq!(i64::from(flower.stock()), expected);
                if flower.stock() == 0 && delta < 0 && result.is_ok() {
                    prop_assert!(!flower.is_available());
                }
                if delta > 0 {
                    prop_assert!(flower.is_available());
                }
            }
        }
    }
}
