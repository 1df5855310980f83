use std::{fmt, str::FromStr};

use common::types::SortOrder;
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

/// Persisted product as returned to callers.
pub type Product = models::product::Model;

/// Input for creating a product. `image_url` is normally filled in by the
/// service after an upload is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub discounted_price: Option<f64>,
    pub part_number: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Partial update: `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub discounted_price: Option<f64>,
    pub part_number: Option<String>,
    pub image_url: Option<String>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the provided fields onto `product` in place.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(v) = &self.name {
            product.name = v.clone();
        }
        if let Some(v) = &self.description {
            product.description = v.clone();
        }
        if let Some(v) = self.price {
            product.price = v;
        }
        if let Some(v) = self.discounted_price {
            product.discounted_price = Some(v);
        }
        if let Some(v) = &self.part_number {
            product.part_number = v.clone();
        }
        if let Some(v) = &self.image_url {
            product.image_url = Some(v.clone());
        }
    }
}

/// An uploaded image, already read into memory.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Sortable product fields. Parsed from either the camelCase wire name or
/// the snake_case column name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    Id,
    #[default]
    Name,
    Description,
    Price,
    DiscountedPrice,
    PartNumber,
    ImageUrl,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::Description => "description",
            SortField::Price => "price",
            SortField::DiscountedPrice => "discountedPrice",
            SortField::PartNumber => "partNumber",
            SortField::ImageUrl => "imageUrl",
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
        }
    }
}

impl FromStr for SortField {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s.trim().chars().filter(|c| *c != '_').collect::<String>().to_ascii_lowercase();
        let field = match key.as_str() {
            "id" => SortField::Id,
            "name" => SortField::Name,
            "description" => SortField::Description,
            "price" => SortField::Price,
            "discountedprice" => SortField::DiscountedPrice,
            "partnumber" => SortField::PartNumber,
            "imageurl" => SortField::ImageUrl,
            "createdat" => SortField::CreatedAt,
            "updatedat" => SortField::UpdatedAt,
            _ => return Err(ServiceError::Validation(format!("cannot sort by '{}'", s.trim()))),
        };
        Ok(field)
    }
}

/// Raw listing parameters as they arrive from a caller; every field optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub search: Option<String>,
}

/// Resolved listing query handed to the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    pub offset: u64,
    pub limit: u64,
    pub sort: SortField,
    pub order: SortOrder,
    pub search: String,
}

/// One page of a listing. Wire shape: `{page, next, previous, products, total}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    pub page: u64,
    #[serde(rename = "next")]
    pub has_next: bool,
    #[serde(rename = "previous")]
    pub has_previous: bool,
    pub products: Vec<Product>,
    pub total: u64,
}

/// Escape LIKE metacharacters and wrap in `%` for a substring match.
/// The term is ASCII-lowercased; callers compare against an ASCII-folded column.
pub fn like_pattern(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for c in term.to_ascii_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

/// ASCII case-insensitive substring match across name, description and part
/// number. Folds the same letters as the SQL side of `like_pattern`.
pub fn matches_search(product: &Product, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_ascii_lowercase();
    [&product.name, &product.description, &product.part_number]
        .iter()
        .any(|field| field.to_ascii_lowercase().contains(&needle))
}
