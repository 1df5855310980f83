use common::types::SortOrder;
use serde::{Deserialize, Serialize};

/// Product as returned by the catalog API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub discounted_price: Option<f64>,
    pub part_number: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Product {
    /// A discount is shown only when set, non-zero and below the price.
    pub fn has_discount(&self) -> bool {
        matches!(self.discounted_price, Some(d) if d != 0.0 && d < self.price)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    pub page: u64,
    pub next: bool,
    pub previous: bool,
    pub products: Vec<Product>,
    pub total: u64,
}

/// Query string for `GET /products`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListParams {
    pub page: u64,
    pub limit: u64,
    pub sort: String,
    pub order: SortOrder,
    pub search: String,
}

impl Default for ListParams {
    fn default() -> Self {
        Self { page: 1, limit: 10, sort: "name".into(), order: SortOrder::Asc, search: String::new() }
    }
}
