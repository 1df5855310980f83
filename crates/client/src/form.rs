use std::fmt;

use reqwest::multipart::{Form, Part};

use crate::errors::{ClientError, FieldError};

/// Image chosen in a product form.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
}

impl fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Add/edit product form. Prices are kept as typed text until submitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub discounted_price: String,
    pub part_number: String,
    pub image: Option<ImageFile>,
}

impl ProductForm {
    /// The add form also requires an image.
    pub fn validate_for_create(&self) -> Result<(), ClientError> {
        let mut errors = self.field_errors();
        if self.image.is_none() {
            errors.push(FieldError::new("imageUrl", "Image is required"));
        }
        into_result(errors)
    }

    pub fn validate_for_update(&self) -> Result<(), ClientError> {
        into_result(self.field_errors())
    }

    fn field_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        for (field, value, label) in [
            ("name", &self.name, "Name"),
            ("description", &self.description, "Description"),
            ("partNumber", &self.part_number, "Part number"),
        ] {
            if value.trim().is_empty() {
                errors.push(FieldError::new(field, format!("{label} is required")));
            }
        }
        match self.price.trim() {
            "" => errors.push(FieldError::new("price", "Price is required")),
            raw if !is_number(raw) => errors.push(FieldError::new("price", "Price must be a number")),
            _ => {}
        }
        let discount = self.discounted_price.trim();
        if !discount.is_empty() && !is_number(discount) {
            errors.push(FieldError::new("discountedPrice", "Discounted price must be a number"));
        }
        errors
    }

    /// Multipart body in the server's field names. A blank discount is left out.
    pub fn to_multipart(&self) -> Result<Form, ClientError> {
        let mut form = Form::new()
            .text("name", self.name.trim().to_string())
            .text("description", self.description.trim().to_string())
            .text("price", self.price.trim().to_string())
            .text("partNumber", self.part_number.trim().to_string());
        let discount = self.discounted_price.trim();
        if !discount.is_empty() {
            form = form.text("discountedPrice", discount.to_string());
        }
        if let Some(image) = &self.image {
            let part = Part::bytes(image.bytes.clone())
                .file_name(image.file_name.clone())
                .mime_str(&image.content_type)?;
            form = form.part("imageUrl", part);
        }
        Ok(form)
    }
}

fn is_number(raw: &str) -> bool {
    raw.parse::<f64>().is_ok_and(f64::is_finite)
}

fn into_result(errors: Vec<FieldError>) -> Result<(), ClientError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ClientError::Validation(errors))
    }
}
