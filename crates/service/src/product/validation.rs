//! Explicit input validation. Every function returns `ServiceError::Validation`
//! (or a model validation error) instead of panicking or silently coercing.

use models::product::{validate_max_len, validate_price, validate_required, MAX_TEXT_LEN};

use crate::errors::ServiceError;
use super::domain::{ImageUpload, NewProduct, ProductPatch};

/// Default upper bound for an uploaded image.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

const IMAGE_SUBTYPES: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

pub fn validate_new_product(input: &NewProduct) -> Result<(), ServiceError> {
    validate_required("name", &input.name)?;
    validate_required("description", &input.description)?;
    validate_required("partNumber", &input.part_number)?;
    validate_max_len("name", &input.name, MAX_TEXT_LEN)?;
    validate_max_len("partNumber", &input.part_number, MAX_TEXT_LEN)?;
    validate_price("price", input.price)?;
    if let Some(d) = input.discounted_price {
        validate_price("discountedPrice", d)?;
    }
    Ok(())
}

pub fn validate_patch(patch: &ProductPatch) -> Result<(), ServiceError> {
    if let Some(v) = &patch.name {
        validate_required("name", v)?;
        validate_max_len("name", v, MAX_TEXT_LEN)?;
    }
    if let Some(v) = &patch.description {
        validate_required("description", v)?;
    }
    if let Some(v) = &patch.part_number {
        validate_required("partNumber", v)?;
        validate_max_len("partNumber", v, MAX_TEXT_LEN)?;
    }
    if let Some(v) = patch.price {
        validate_price("price", v)?;
    }
    if let Some(v) = patch.discounted_price {
        validate_price("discountedPrice", v)?;
    }
    Ok(())
}

/// Only `image/jpg|jpeg|png|gif` are accepted, up to `max_size` bytes.
pub fn validate_image(content_type: &str, size: usize, max_size: usize) -> Result<(), ServiceError> {
    let mime = content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    let allowed = mime
        .rsplit_once('/')
        .is_some_and(|(_, subtype)| IMAGE_SUBTYPES.contains(&subtype));
    if !allowed {
        return Err(ServiceError::Validation("Only image files are allowed!".into()));
    }
    if size > max_size {
        return Err(ServiceError::Validation(format!("image exceeds the {max_size} byte limit")));
    }
    Ok(())
}

pub fn validate_upload(upload: &ImageUpload, max_size: usize) -> Result<(), ServiceError> {
    if upload.bytes.is_empty() {
        return Err(ServiceError::Validation("image file is empty".into()));
    }
    validate_image(&upload.content_type, upload.bytes.len(), max_size)
}

/// Parse a decimal form field. Empty input is an error; callers decide
/// beforehand whether the field is optional.
pub fn parse_price(field: &str, raw: &str) -> Result<f64, ServiceError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ServiceError::Validation(format!("{field} must be a number")))?;
    validate_price(field, value)?;
    Ok(value)
}
