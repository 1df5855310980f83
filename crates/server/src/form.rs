//! Multipart product form as sent by the catalog client.
//!
//! Text parts carry the product fields; a file part named `imageUrl` carries
//! the image. A text `imageUrl` part is ignored, so clients cannot point a
//! product at an arbitrary path.

use axum::extract::multipart::{Field, Multipart};
use service::errors::ServiceError;
use service::product::domain::{ImageUpload, NewProduct, ProductPatch};
use service::product::validation::{parse_price, validate_image};

use crate::errors::JsonApiError;

pub const IMAGE_FIELD: &str = "imageUrl";

#[derive(Debug, Default)]
pub struct ProductForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub discounted_price: Option<String>,
    pub part_number: Option<String>,
    pub image: Option<ImageUpload>,
}

impl ProductForm {
    /// Drain `multipart`, capping the image at `max_file_size` bytes.
    pub async fn read(mut multipart: Multipart, max_file_size: usize) -> Result<Self, JsonApiError> {
        let mut form = ProductForm::default();
        while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
            let name = field.name().unwrap_or_default().to_string();
            if field.file_name().is_some() {
                if name == IMAGE_FIELD {
                    form.image = read_image(field, max_file_size).await?;
                }
                continue;
            }
            let text = field.text().await.map_err(bad_multipart)?;
            let text = text.trim().to_string();
            match name.as_str() {
                "name" => form.name = Some(text),
                "description" => form.description = Some(text),
                "price" => form.price = Some(text),
                "discountedPrice" => form.discounted_price = Some(text),
                "partNumber" => form.part_number = Some(text),
                _ => {}
            }
        }
        Ok(form)
    }

    /// All text fields are required; a blank discount means none.
    pub fn into_new_product(self) -> Result<(NewProduct, Option<ImageUpload>), ServiceError> {
        let price = match self.price.as_deref() {
            Some(raw) if !raw.is_empty() => parse_price("price", raw)?,
            _ => return Err(ServiceError::Validation("price is required".into())),
        };
        let input = NewProduct {
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            price,
            discounted_price: optional_price("discountedPrice", self.discounted_price.as_deref())?,
            part_number: self.part_number.unwrap_or_default(),
            image_url: None,
        };
        Ok((input, self.image))
    }

    /// Only fields present in the form are changed.
    pub fn into_patch(self) -> Result<(ProductPatch, Option<ImageUpload>), ServiceError> {
        let price = match self.price.as_deref() {
            Some(raw) if !raw.is_empty() => Some(parse_price("price", raw)?),
            _ => None,
        };
        let patch = ProductPatch {
            name: self.name,
            description: self.description,
            price,
            discounted_price: optional_price("discountedPrice", self.discounted_price.as_deref())?,
            part_number: self.part_number,
            image_url: None,
        };
        Ok((patch, self.image))
    }
}

/// Browsers serialize an unset numeric input in several ways.
fn optional_price(field: &str, raw: Option<&str>) -> Result<Option<f64>, ServiceError> {
    match raw {
        None => Ok(None),
        Some(s) if s.is_empty() || ["nan", "undefined", "null"].contains(&s.to_ascii_lowercase().as_str()) => Ok(None),
        Some(s) => parse_price(field, s).map(Some),
    }
}

async fn read_image(mut field: Field<'_>, max_file_size: usize) -> Result<Option<ImageUpload>, JsonApiError> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    if file_name.is_empty() {
        // an untouched file input submits a nameless part
        while field.chunk().await.map_err(bad_multipart)?.is_some() {}
        return Ok(None);
    }
    let content_type = field.content_type().unwrap_or("application/octet-stream").to_string();
    // reject on MIME before buffering the body
    validate_image(&content_type, 0, max_file_size)?;

    let mut bytes = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(bad_multipart)? {
        if bytes.len() + chunk.len() > max_file_size {
            return Err(ServiceError::Validation(format!("image exceeds the {max_file_size} byte limit")).into());
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(Some(ImageUpload { file_name, content_type, bytes }))
}

fn bad_multipart(e: axum::extract::multipart::MultipartError) -> JsonApiError {
    JsonApiError::bad_request(format!("malformed multipart body: {e}"))
}
