use anyhow::Context;
use chrono::NaiveDate;
use serde_json::json;

use bloomshop_core::Money;
use bloomshop_inventory::Flower;
use bloomshop_parties::{ContactInfo, Customer, Employee, Supplier};
use bloomshop_shop::{FlowerShop, ShopConfig};

fn main() -> anyhow::Result<()> {
    let config = ShopConfig::from_env()?;
    bloomshop_observability::init_with(&config.log);

    let shop = FlowerShop::from_config(&config);
    tracing::info!(policy = ?shop.policy(), "flower shop ready");

    let rose = shop.flowers().register(
        Flower::new("Rosa", "Rosa gallica", "Vermelha", Money::new(15, 90), 50)
            .with_description("Rosa colombiana de haste longa"),
    )?;
    shop.flowers().register(Flower::new(
        "Girassol",
        "Helianthus annuus",
        "Amarelo",
        Money::new(12, 0),
        20,
    ))?;

    let supplier = shop.suppliers().register(
        Supplier::new(
            "Flores do Campo",
            "12.345.678/0001-90",
            ContactInfo::new("(11) 3333-0000", "vendas@campo.example", "Ceasa, box 12"),
        )
        .with_contact_person("Carlos"),
    )?;
    shop.link_supplier_flower(supplier, rose)?;

    let customer = shop.customers().register(Customer::new(
        "Ana Souza",
        "123.456.789-01",
        ContactInfo::new("(11) 90000-0000", "ana@example.com", "Rua das Flores, 10"),
    ))?;
    let hire_date = NaiveDate::from_ymd_opt(2020, 3, 1).context("invalid hire date")?;
    let seller = shop.employees().register(Employee::new(
        "João Lima",
        "987.654.321-00",
        ContactInfo::new("(11) 98888-0000", "joao@example.com", ""),
        "Sales associate",
        Money::new(2500, 0),
        hire_date,
    ))?;

    let sale_id = shop.sales().create_sale(customer, seller)?;
    shop.sales().add_item(sale_id, rose, 10)?;
    let sale = shop.sales().finalize_sale(sale_id)?;

    let summary = json!({
        "sale": sale,
        "rose_stock": shop.flowers().get(rose)?.stock(),
        "customer_total_spent": shop.customers().get(customer)?.total_spent(),
        "seller_commission": shop.employees().commission(seller)?,
    });
    tracing::info!(summary = %summary, "demo sale completed");

    for flower in shop.flowers().list_low_stock(45) {
        tracing::info!(flower = %flower.describe(), "low stock");
    }

    Ok(())
}
