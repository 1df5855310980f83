use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors;

/// A catalog item. Serialized with camelCase keys (`discountedPrice`,
/// `partNumber`, `imageUrl`) to match the HTTP contract.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub price: f64,
    pub discounted_price: Option<f64>,
    pub part_number: String,
    pub image_url: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// True when a non-zero discounted price undercuts the base price.
    /// A discounted price above `price` is stored as-is but never shown.
    pub fn has_discount(&self) -> bool {
        matches!(self.discounted_price, Some(d) if d != 0.0 && d < self.price)
    }

    pub fn effective_price(&self) -> f64 {
        match self.discounted_price {
            Some(d) if self.has_discount() => d,
            _ => self.price,
        }
    }

    /// Image path if one is set and non-blank.
    pub fn image_path(&self) -> Option<&str> {
        self.image_url.as_deref().filter(|p| !p.trim().is_empty())
    }
}

/// Column width of `name` and `part_number`, in characters.
pub const MAX_TEXT_LEN: usize = 255;

/// Length in characters, which is what `varchar(n)` bounds.
pub fn validate_max_len(field: &str, value: &str, max: usize) -> Result<(), errors::ModelError> {
    if value.chars().count() > max {
        return Err(errors::ModelError::Validation(format!("{field} must be at most {max} characters")));
    }
    Ok(())
}

pub fn validate_required(field: &str, value: &str) -> Result<(), errors::ModelError> {
    if value.trim().is_empty() {
        return Err(errors::ModelError::Validation(format!("{field} is required")));
    }
    Ok(())
}

/// Prices only need to be real numbers; negative values are accepted.
pub fn validate_price(field: &str, value: f64) -> Result<(), errors::ModelError> {
    if !value.is_finite() {
        return Err(errors::ModelError::Validation(format!("{field} must be a finite number")));
    }
    Ok(())
}
