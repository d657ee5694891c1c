use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use bloomshop_core::{Entity, FlowerId, ShopResult, SupplierId, require_non_empty};

use crate::contact::ContactInfo;
use crate::document::validate_cnpj;

/// Entity: Supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    id: SupplierId,
    pub name: String,
    pub cnpj: String,
    pub contact: ContactInfo,
    pub contact_person: String,
    pub registered_on: NaiveDate,
    supplied_flowers: Vec<FlowerId>,
    active: bool,
}

impl Supplier {
    pub fn new(name: impl Into<String>, cnpj: impl Into<String>, contact: ContactInfo) -> Self {
        Self {
            id: SupplierId::default(),
            name: name.into(),
            cnpj: cnpj.into(),
            contact,
            contact_person: String::new(),
            registered_on: Utc::now().date_naive(),
            supplied_flowers: Vec::new(),
            active: true,
        }
    }

    pub fn with_contact_person(mut self, person: impl Into<String>) -> Self {
        self.contact_person = person.into();
        self
    }

    pub fn supplied_flowers(&self) -> &[FlowerId] {
        &self.supplied_flowers
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn supplies(&self, flower_id: FlowerId) -> bool {
        self.supplied_flowers.contains(&flower_id)
    }

    /// Returns false if the flower was already listed.
    pub fn add_flower(&mut self, flower_id: FlowerId) -> bool {
        if self.supplies(flower_id) {
            return false;
        }
        self.supplied_flowers.push(flower_id);
        true
    }

    pub fn remove_flower(&mut self, flower_id: FlowerId) -> bool {
        let before = self.supplied_flowers.len();
        self.supplied_flowers.retain(|f| *f != flower_id);
        self.supplied_flowers.len() != before
    }

    pub fn validate(&self) -> ShopResult<()> {
        require_non_empty("name", &self.name)?;
        self.contact.validate()?;
        validate_cnpj(&self.cnpj)
    }

    pub fn merge_details(&mut self, other: Supplier) {
        self.name = other.name;
        self.cnpj = other.cnpj;
        self.contact = other.contact;
        self.contact_person = other.contact_person;
        self.registered_on = other.registered_on;
    }

    pub fn describe(&self) -> String {
        format!(
            "#{} {} - CNPJ {} - contact {} - {} flower(s){}",
            self.id,
            self.name,
            self.cnpj,
            if self.contact_person.is_empty() { "-" } else { &self.contact_person },
            self.supplied_flowers.len(),
            if self.active { "" } else { " [inactive]" },
        )
    }
}

impl Entity for Supplier {
    type Id = SupplierId;

    fn id(&self) -> SupplierId {
        self.id
    }

    fn assign_id(&mut self, id: SupplierId) {
        self.id = id;
    }
}
