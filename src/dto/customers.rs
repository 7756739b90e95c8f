use serde::{Deserialize, Deserializer};

use crate::{
    error::AppResult,
    validation::{Email, MAX_PERSON_NAME, Name, parse_phone},
};

#[derive(Debug, Default, Clone, Deserialize)]
pub struct CreateCustomerRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// `phone: Some(None)` (JSON `"phone": null`) clears the stored number;
/// leaving the key out keeps it.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct UpdateCustomerRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub phone: Option<Option<String>>,
}

/// Marks a key that was present, even when its value is `null`.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

#[derive(Debug)]
pub struct NewCustomer {
    pub first_name: Name,
    pub last_name: Name,
    pub email: Email,
    pub phone: Option<String>,
}

#[derive(Debug, Default)]
pub struct CustomerChanges {
    pub first_name: Option<Name>,
    pub last_name: Option<Name>,
    pub email: Option<Email>,
    pub phone: Option<Option<String>>,
}

impl CreateCustomerRequest {
    pub fn validate(self) -> AppResult<NewCustomer> {
        Ok(NewCustomer {
            first_name: Name::parse("first_name", self.first_name, MAX_PERSON_NAME)?,
            last_name: Name::parse("last_name", self.last_name, MAX_PERSON_NAME)?,
            email: Email::parse(self.email)?,
            phone: parse_phone(self.phone)?,
        })
    }
}

impl UpdateCustomerRequest {
    pub fn validate(self) -> AppResult<CustomerChanges> {
        let first_name = match self.first_name {
            Some(v) => Some(Name::parse("first_name", Some(v), MAX_PERSON_NAME)?),
            None => None,
        };
        let last_name = match self.last_name {
            Some(v) => Some(Name::parse("last_name", Some(v), MAX_PERSON_NAME)?),
            None => None,
        };
        let email = match self.email {
            Some(v) => Some(Email::parse(Some(v))?),
            None => None,
        };
        let phone = match self.phone {
            Some(v) => Some(parse_phone(v)?),
            None => None,
        };
        Ok(CustomerChanges {
            first_name,
            last_name,
            email,
            phone,
        })
    }
}
