use serde::{Deserialize, Serialize};
use serde_json::Number;
use validator::{Validate, ValidationErrors};

use crate::validation::{self, reject};

/// `POST /register` body.
///
/// Absent fields read as empty strings and fail their rule.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Register {
    pub username: String,
    pub password: String,
    pub email: String,
}

impl Validate for Register {
    /// username, then password, then email.
    fn validate(&self) -> Result<(), ValidationErrors> {
        validation::username(&self.username)
            .map_err(|err| reject("username", err))?;
        validation::password(&self.password)
            .map_err(|err| reject("password", err))?;
        validation::email(&self.email).map_err(|err| reject("email", err))
    }
}

impl std::fmt::Debug for Register {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Register")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("email", &self.email)
            .finish()
    }
}

/// `POST /login` body.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Login {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Login {
    /// Both credentials, when present and not empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let username = self.username.as_deref().filter(|u| !u.is_empty())?;
        let password = self.password.as_deref().filter(|p| !p.is_empty())?;
        Some((username, password))
    }
}

impl std::fmt::Debug for Login {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Login")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// `POST /inventory` and `PUT /inventory/{id}` body.
///
/// Numbers are kept raw so that `1.5` as quantity is reported by the
/// quantity rule rather than by the JSON parser.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Item {
    pub item_name: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<Number>,
    pub price: Option<Number>,
}

/// Inventory fields once every rule passed.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFields {
    pub item_name: String,
    pub description: String,
    pub quantity: i32,
    pub price: f64,
}

impl Item {
    /// Check name, description, quantity then price; stop at the first
    /// failure.
    pub fn fields(&self) -> Result<ItemFields, ValidationErrors> {
        validation::item_name(self.item_name.as_deref())
            .map_err(|err| reject("item_name", err))?;
        validation::description(self.description.as_deref())
            .map_err(|err| reject("description", err))?;
        let quantity = validation::quantity(self.quantity.as_ref())
            .map_err(|err| reject("quantity", err))?;
        let price = validation::price(self.price.as_ref())
            .map_err(|err| reject("price", err))?;

        Ok(ItemFields {
            item_name: self.item_name.clone().unwrap_or_default(),
            description: self.description.clone().unwrap_or_default(),
            quantity,
            price,
        })
    }
}

impl Validate for Item {
    fn validate(&self) -> Result<(), ValidationErrors> {
        self.fields().map(drop)
    }
}
