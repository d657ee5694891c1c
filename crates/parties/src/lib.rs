//! Parties domain module: customers, employees and suppliers.
//!
//! Customers and employees share the `Person` capabilities; suppliers are
//! companies identified by CNPJ.

pub mod contact;
pub mod customer;
pub mod customer_service;
pub mod document;
pub mod employee;
pub mod employee_service;
pub mod supplier;
pub mod supplier_service;

pub use contact::{ContactInfo, Person};
pub use customer::Customer;
pub use customer_service::CustomerService;
pub use employee::Employee;
pub use employee_service::EmployeeService;
pub use supplier::Supplier;
pub use supplier_service::SupplierService;
