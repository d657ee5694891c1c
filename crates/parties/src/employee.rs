use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use bloomshop_core::query::contains_ignore_case;
use bloomshop_core::{EmployeeId, Entity, Money, SaleId, ShopError, ShopResult, require_non_empty};

use crate::contact::{ContactInfo, Person, validate_person_basics};

/// Entity: Employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    id: EmployeeId,
    pub name: String,
    pub cpf: String,
    pub contact: ContactInfo,
    pub role: String,
    pub salary: Money,
    pub hire_date: NaiveDate,
    pub birth_date: Option<NaiveDate>,
    sales_history: Vec<SaleId>,
    total_commission: Money,
    active: bool,
}

impl Employee {
    pub fn new(
        name: impl Into<String>,
        cpf: impl Into<String>,
        contact: ContactInfo,
        role: impl Into<String>,
        salary: Money,
        hire_date: NaiveDate,
    ) -> Self {
        Self {
            id: EmployeeId::default(),
            name: name.into(),
            cpf: cpf.into(),
            contact,
            role: role.into(),
            salary,
            hire_date,
            birth_date: None,
            sales_history: Vec::new(),
            total_commission: Money::ZERO,
            active: true,
        }
    }

    pub fn with_birth_date(mut self, date: NaiveDate) -> Self {
        self.birth_date = Some(date);
        self
    }

    pub fn sales_history(&self) -> &[SaleId] {
        &self.sales_history
    }

    pub fn total_commission(&self) -> Money {
        self.total_commission
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn is_salesperson(&self) -> bool {
        contains_ignore_case(&self.role, "sales")
    }

    /// Credit a finalized sale and its commission.
    pub fn record_sale(&mut self, sale_id: SaleId, commission: Money) {
        self.sales_history.push(sale_id);
        self.total_commission += commission;
    }

    /// Full years since hiring, as of `today`.
    pub fn tenure_years(&self, today: NaiveDate) -> u32 {
        today.years_since(self.hire_date).unwrap_or(0)
    }

    /// Age in full years, if the birth date is known.
    pub fn age(&self, today: NaiveDate) -> Option<u32> {
        self.birth_date.and_then(|born| today.years_since(born))
    }

    pub fn merge_details(&mut self, other: Employee) {
        self.name = other.name;
        self.cpf = other.cpf;
        self.contact = other.contact;
        self.role = other.role;
        self.salary = other.salary;
        self.hire_date = other.hire_date;
        self.birth_date = other.birth_date;
    }
}

impl Person for Employee {
    fn name(&self) -> &str {
        &self.name
    }

    fn cpf(&self) -> &str {
        &self.cpf
    }

    fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    fn validate(&self) -> ShopResult<()> {
        validate_person_basics(self)?;
        require_non_empty("role", &self.role)?;
        if self.salary.is_zero() {
            return Err(ShopError::validation("salary must be positive"));
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!(
            "#{} {} - CPF {} - {} - salary R$ {} - hired {} - {} sale(s) - commission R$ {}{}",
            self.id,
            self.name,
            self.cpf,
            self.role,
            self.salary,
            self.hire_date,
            self.sales_history.len(),
            self.total_commission,
            if self.active { "" } else { " [inactive]" },
        )
    }
}

impl Entity for Employee {
    type Id = EmployeeId;

    fn id(&self) -> EmployeeId {
        self.id
    }

    fn assign_id(&mut self, id: EmployeeId) {
        self.id = id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn employee() -> Employee {
        Employee::new(
            "João Lima",
            "987.654.321-00",
            ContactInfo::new("(11) 98888-0000", "joao@example.com", ""),
            "Sales associate",
            Money::new(2500, 0),
            date(2020, 3, 1),
        )
        .with_birth_date(date(1990, 6, 15))
    }

    #[test]
    fn zero_salary_and_blank_role_are_rejected() {
        let mut e = employee();
        assert!(e.validate().is_ok());

        e.salary = Money::ZERO;
        assert_eq!(
            e.validate(),
            Err(ShopError::Validation("salary must be positive".to_string()))
        );

        let mut e = employee();
        e.role = String::new();
        assert!(matches!(e.validate(), Err(ShopError::Validation(_))));
    }

    #[test]
    fn age_and_tenure_count_full_years() {
        let e = employee();
        assert_eq!(e.age(date(2026, 6, 14)), Some(35));
        assert_eq!(e.age(date(2026, 6, 15)), Some(36));
        assert_eq!(e.tenure_years(date(2026, 2, 28)), 5);
    }

    #[test]
    fn record_sale_accumulates_commission() {
        let mut e = employee();
        e.record_sale(SaleId::from_raw(1), Money::new(7, 95));
        e.record_sale(SaleId::from_raw(2), Money::new(7, 95));
        assert_eq!(e.total_commission(), Money::new(15, 90));
        assert_eq!(e.sales_history().len(), 2);
        assert!(e.is_salesperson());
    }
}
