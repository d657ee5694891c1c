use serde::{Deserialize, Serialize};

use bloomshop_core::{ShopResult, require_non_empty};

use crate::document::validate_cpf;

/// Contact information for a party.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub phone: String,
    pub email: String,
    pub address: String,
}

impl ContactInfo {
    pub fn new(
        phone: impl Into<String>,
        email: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            phone: phone.into(),
            email: email.into(),
            address: address.into(),
        }
    }

    /// Phone and email are mandatory; address is free-form and optional.
    pub fn validate(&self) -> ShopResult<()> {
        require_non_empty("phone", &self.phone)?;
        require_non_empty("email", &self.email)?;
        Ok(())
    }
}

/// Capabilities shared by customers and employees.
pub trait Person {
    fn name(&self) -> &str;

    fn cpf(&self) -> &str;

    fn contact(&self) -> &ContactInfo;

    /// Static field checks for this kind of person.
    fn validate(&self) -> ShopResult<()>;

    /// Human-readable one-line summary.
    fn describe(&self) -> String;
}

/// Checks every person must pass: name, contact and a well-formed CPF.
pub(crate) fn validate_person_basics<P: Person + ?Sized>(person: &P) -> ShopResult<()> {
    require_non_empty("name", person.name())?;
    person.contact().validate()?;
    validate_cpf(person.cpf())
}
