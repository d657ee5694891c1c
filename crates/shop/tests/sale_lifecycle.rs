//! End-to-end sale flows through the composition root.

use chrono::NaiveDate;

use bloomshop_core::{CustomerId, EmployeeId, FlowerId, Money, ShopError};
use bloomshop_inventory::Flower;
use bloomshop_parties::{ContactInfo, Customer, Employee};
use bloomshop_sales::SaleStatus;
use bloomshop_shop::FlowerShop;

struct Setup {
    shop: FlowerShop,
    rose: FlowerId,
    customer: CustomerId,
    seller: EmployeeId,
}

fn setup(stock: u32) -> Setup {
    let shop = FlowerShop::default();
    let rose = shop
        .flowers()
        .register(Flower::new("Rosa", "Rosa gallica", "Vermelha", Money::new(15, 90), stock))
        .unwrap();
    let customer = shop
        .customers()
        .register(Customer::new(
            "Ana Souza",
            "123.456.789-01",
            ContactInfo::new("(11) 90000-0000", "ana@example.com", ""),
        ))
        .unwrap();
    let seller = shop
        .employees()
        .register(Employee::new(
            "João Lima",
            "987.654.321-00",
            ContactInfo::new("(11) 98888-0000", "joao@example.com", ""),
            "Sales associate",
            Money::new(2500, 0),
            NaiveDate::from_ymd_opt(2020, 3, 1).unwrap(),
        ))
        .unwrap();
    Setup {
        shop,
        rose,
        customer,
        seller,
    }
}

#[test]
fn ten_roses_at_fifteen_ninety() {
    let s = setup(50);
    let sale = s.shop.sales().create_sale(s.customer, s.seller).unwrap();
    s.shop.sales().add_item(sale, s.rose, 10).unwrap();
    let finalized = s.shop.sales().finalize_sale(sale).unwrap();

    assert_eq!(finalized.status(), SaleStatus::Finalized);
    assert_eq!(finalized.total(), Money::new(159, 0));
    assert_eq!(s.shop.flowers().get(s.rose).unwrap().stock(), 40);

    let customer = s.shop.customers().get(s.customer).unwrap();
    assert_eq!(customer.total_spent(), Money::new(159, 0));
    assert_eq!(customer.purchase_history(), &[sale]);
    assert!(!customer.is_vip());

    let seller = s.shop.employees().get(s.seller).unwrap();
    assert_eq!(seller.total_commission(), Money::new(7, 95));
    assert_eq!(seller.sales_history(), &[sale]);
}

#[test]
fn customer_becomes_vip_on_the_ninth_sale_and_stays_vip() {
    let s = setup(200);
    for n in 1..=9 {
        let sale = s.shop.sales().create_sale(s.customer, s.seller).unwrap();
        s.shop.sales().add_item(sale, s.rose, 10).unwrap();
        s.shop.sales().finalize_sale(sale).unwrap();

        let customer = s.shop.customers().get(s.customer).unwrap();
        // 6 × 159.00 = 954.00 is still below the 1000.00 threshold.
        assert_eq!(customer.is_vip(), n >= 7, "after sale {n}");
    }

    let customer = s.shop.customers().get(s.customer).unwrap();
    assert_eq!(customer.total_spent(), Money::new(1431, 0));
    assert!(customer.is_vip());
    assert_eq!(s.shop.customers().list_vip().len(), 1);

    // A discounted sale afterwards does not undo VIP.
    let sale = s.shop.sales().create_sale(s.customer, s.seller).unwrap();
    s.shop.sales().add_item(sale, s.rose, 1).unwrap();
    let discounted = s.shop.sales().apply_vip_discount(sale).unwrap();
    assert_eq!(discounted.total(), Money::new(14, 31));
    s.shop.sales().finalize_sale(sale).unwrap();
    assert!(s.shop.customers().get(s.customer).unwrap().is_vip());
}

#[test]
fn quantity_equal_to_stock_is_the_boundary() {
    let s = setup(7);
    let sale = s.shop.sales().create_sale(s.customer, s.seller).unwrap();
    assert!(matches!(
        s.shop.sales().add_item(sale, s.rose, 8),
        Err(ShopError::InsufficientStock { requested: 8, available: 7, .. })
    ));
    s.shop.sales().add_item(sale, s.rose, 7).unwrap();
    s.shop.sales().finalize_sale(sale).unwrap();

    let rose = s.shop.flowers().get(s.rose).unwrap();
    assert_eq!(rose.stock(), 0);
    assert!(!rose.is_available());
    assert!(s.shop.flowers().list_available().is_empty());

    s.shop.flowers().adjust_stock(s.rose, 3).unwrap();
    assert!(s.shop.flowers().get(s.rose).unwrap().is_available());
}

#[test]
fn second_finalize_has_no_side_effects() {
    let s = setup(50);
    let sale = s.shop.sales().create_sale(s.customer, s.seller).unwrap();
    s.shop.sales().add_item(sale, s.rose, 10).unwrap();
    s.shop.sales().finalize_sale(sale).unwrap();

    let err = s.shop.sales().finalize_sale(sale).unwrap_err();
    assert!(matches!(err, ShopError::InvalidState(_)));
    assert_eq!(s.shop.flowers().get(s.rose).unwrap().stock(), 40);
    assert_eq!(
        s.shop.customers().get(s.customer).unwrap().total_spent(),
        Money::new(159, 0)
    );
    assert_eq!(s.shop.employees().commission(s.seller).unwrap(), Money::new(7, 95));
}

#[test]
fn stock_taken_after_add_item_fails_finalize_atomically() {
    let s = setup(10);
    let sale = s.shop.sales().create_sale(s.customer, s.seller).unwrap();
    s.shop.sales().add_item(sale, s.rose, 8).unwrap();
    s.shop.flowers().adjust_stock(s.rose, -5).unwrap();

    let err = s.shop.sales().finalize_sale(sale).unwrap_err();
    assert_eq!(
        err,
        ShopError::InsufficientStock {
            flower_id: s.rose,
            requested: 8,
            available: 5,
        }
    );
    assert_eq!(s.shop.flowers().get(s.rose).unwrap().stock(), 5);
    assert_eq!(s.shop.customers().get(s.customer).unwrap().total_spent(), Money::ZERO);
    assert_eq!(s.shop.employees().commission(s.seller).unwrap(), Money::ZERO);
    assert_eq!(s.shop.sales().list_pending().len(), 1);
}

#[test]
fn empty_sale_cannot_be_finalized() {
    let s = setup(10);
    let sale = s.shop.sales().create_sale(s.customer, s.seller).unwrap();
    assert_eq!(
        s.shop.sales().finalize_sale(sale).unwrap_err(),
        ShopError::EmptySale(sale)
    );
}

#[test]
fn ids_are_never_reused_after_removal() {
    let s = setup(10);
    let first = s.shop.sales().create_sale(s.customer, s.seller).unwrap();
    s.shop.sales().remove_sale(first).unwrap();
    let second = s.shop.sales().create_sale(s.customer, s.seller).unwrap();
    assert!(second > first);
    assert_eq!(s.shop.sales().count(), 1);
}
