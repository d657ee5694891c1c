use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use bloomshop_core::{CustomerId, Entity, Money, SaleId, ShopResult};

use crate::contact::{ContactInfo, Person, validate_person_basics};

/// Entity: Customer.
///
/// Purchase history, total spent and the VIP flag are bookkeeping fed by
/// finalized sales; updates to the descriptive fields never touch them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    id: CustomerId,
    pub name: String,
    pub cpf: String,
    pub contact: ContactInfo,
    pub registered_on: NaiveDate,
    purchase_history: Vec<SaleId>,
    total_spent: Money,
    vip: bool,
}

impl Customer {
    pub fn new(name: impl Into<String>, cpf: impl Into<String>, contact: ContactInfo) -> Self {
        Self {
            id: CustomerId::default(),
            name: name.into(),
            cpf: cpf.into(),
            contact,
            registered_on: Utc::now().date_naive(),
            purchase_history: Vec::new(),
            total_spent: Money::ZERO,
            vip: false,
        }
    }

    pub fn with_registration_date(mut self, date: NaiveDate) -> Self {
        self.registered_on = date;
        self
    }

    pub fn purchase_history(&self) -> &[SaleId] {
        &self.purchase_history
    }

    pub fn total_spent(&self) -> Money {
        self.total_spent
    }

    pub fn is_vip(&self) -> bool {
        self.vip
    }

    /// Record a finalized sale. Returns true when this purchase made the customer VIP.
    ///
    /// VIP status is sticky: once granted it never reverts.
    pub fn record_purchase(&mut self, sale_id: SaleId, amount: Money, vip_threshold: Money) -> bool {
        self.purchase_history.push(sale_id);
        self.total_spent += amount;
        let promoted = !self.vip && self.total_spent >= vip_threshold;
        if promoted {
            self.vip = true;
        }
        promoted
    }

    pub fn promote_to_vip(&mut self) {
        self.vip = true;
    }


    pub fn merge_details(&mut self, other: Customer) {
        self.name = other.name;
        self.cpf = other.cpf;
        self.contact = other.contact;
        self.registered_on = other.registered_on;
    }
}

impl Person for Customer {
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
        validate_person_basics(self)
    }

    fn describe(&self) -> String {
        format!(
            "#{} {} - CPF {} - registered {} - spent R$ {} - {} - {} purchase(s)",
            self.id,
            self.name,
            self.cpf,
            self.registered_on,
            self.total_spent,
            if self.vip { "VIP" } else { "regular" },
            self.purchase_history.len(),
        )
    }
}

impl Entity for Customer {
    type Id = CustomerId;

    fn id(&self) -> CustomerId {
        self.id
    }

    fn assign_id(&mut self, id: CustomerId) {
        self.id = id;
    }
}
