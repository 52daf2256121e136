//! Product Model

use serde::{Deserialize, Serialize};

/// Product entity as served by the catalog API.
///
/// Remote products carry a positive server-assigned `id`; products created
/// locally (never persisted) are assigned negative IDs by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Category slug (e.g. "beauty"); empty for local products.
    #[serde(default)]
    pub category: String,
    pub price: f64,
    #[serde(
        default,
        rename = "discountPercentage",
        skip_serializing_if = "Option::is_none"
    )]
    pub discount_percentage: Option<f64>,
    /// Rating on a 0-5 scale.
    #[serde(default)]
    pub rating: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    /// Some remote items ship without a brand; treated as empty.
    #[serde(default)]
    pub brand: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

/// Validated input for a locally created product.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub title: String,
    pub price: f64,
    pub brand: String,
    pub sku: String,
}

/// Columns the product listing can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Title,
    Price,
    Rating,
    Brand,
}

impl SortField {
    /// Wire name used in the `sortBy` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Title => "title",
            SortField::Price => "price",
            SortField::Rating => "rating",
            SortField::Brand => "brand",
        }
    }
}

/// Sort direction for the product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Wire name used in the `order` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    /// The opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}
