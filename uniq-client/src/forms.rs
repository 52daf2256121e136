//! Form validation
//!
//! Local, synchronous and field-scoped: a failed validation returns a
//! field -> message map, blocks submission entirely and never reaches
//! the network.

use std::collections::BTreeMap;

use shared::models::NewProduct;

use crate::session::Credentials;

/// Field name -> message mapping for a failed validation.
pub type FieldErrors = BTreeMap<&'static str, String>;

const REQUIRED_MESSAGE: &str = "Required field";
const PRICE_MESSAGE: &str = "Enter a valid price";

/// Raw add-product form input. `price` stays a string until validation;
/// both comma and dot decimal separators are accepted.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub title: String,
    pub price: String,
    pub brand: String,
    pub sku: String,
}

impl ProductForm {
    /// Validate and convert into a [`NewProduct`]. Title, brand and sku
    /// are required (whitespace-only counts as empty) and trimmed;
    /// price must parse to a non-negative number.
    pub fn validate(&self) -> Result<NewProduct, FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.title.trim().is_empty() {
            errors.insert("title", REQUIRED_MESSAGE.to_string());
        }

        let price = self.price.trim().replace(',', ".").parse::<f64>();
        let price = match price {
            Ok(p) if p.is_finite() && p >= 0.0 => Some(p),
            _ => {
                errors.insert("price", PRICE_MESSAGE.to_string());
                None
            }
        };

        if self.brand.trim().is_empty() {
            errors.insert("brand", REQUIRED_MESSAGE.to_string());
        }
        if self.sku.trim().is_empty() {
            errors.insert("sku", REQUIRED_MESSAGE.to_string());
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewProduct {
            title: self.title.trim().to_string(),
            price: price.unwrap(),
            brand: self.brand.trim().to_string(),
            sku: self.sku.trim().to_string(),
        })
    }
}

/// Raw login form input.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    /// Validate and convert into [`Credentials`]. The username is
    /// trimmed before submission; the password is taken as typed.
    pub fn validate(&self) -> Result<Credentials, FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.username.trim().is_empty() {
            errors.insert("username", REQUIRED_MESSAGE.to_string());
        }
        if self.password.is_empty() {
            errors.insert("password", REQUIRED_MESSAGE.to_string());
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Credentials {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
        })
    }
}
