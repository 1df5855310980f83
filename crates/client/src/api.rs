use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use tracing::{debug, warn};

use crate::errors::ClientError;
use crate::form::ProductForm;
use crate::types::{ListParams, Product, ProductPage};

/// Thin wrapper over the catalog HTTP API. Each method is one request; there
/// is no retry and no caching.
#[derive(Clone, Debug)]
pub struct CatalogApi {
    base_url: String,
    http: Client,
}

impl CatalogApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self::with_client(base_url, http))
    }

    pub fn with_client(base_url: impl Into<String>, http: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    /// Absolute URL for a stored image path such as `/uploads/x.png`.
    pub fn image_url(&self, product: &Product) -> Option<String> {
        product.image_url.as_ref().map(|p| format!("{}{}", self.base_url, p))
    }

    fn products_url(&self) -> String {
        format!("{}/products", self.base_url)
    }

    fn product_url(&self, id: i32) -> String {
        format!("{}/products/{}", self.base_url, id)
    }

    pub async fn list_products(&self, params: &ListParams) -> Result<ProductPage, ClientError> {
        debug!(page = params.page, search = %params.search, "fetching products");
        let resp = self.http.get(self.products_url()).query(params).send().await?;
        Ok(check(resp).await?.json().await?)
    }

    pub async fn get_product(&self, id: i32) -> Result<Product, ClientError> {
        let resp = self.http.get(self.product_url(id)).send().await?;
        Ok(check(resp).await?.json().await?)
    }

    /// Validates the form as an add form (image required) before sending.
    pub async fn create_product(&self, form: &ProductForm) -> Result<Product, ClientError> {
        form.validate_for_create()?;
        let resp = self.http.post(self.products_url()).multipart(form.to_multipart()?).send().await?;
        Ok(check(resp).await?.json().await?)
    }

    pub async fn update_product(&self, id: i32, form: &ProductForm) -> Result<Product, ClientError> {
        form.validate_for_update()?;
        let resp = self.http.put(self.product_url(id)).multipart(form.to_multipart()?).send().await?;
        Ok(check(resp).await?.json().await?)
    }

    pub async fn delete_product(&self, id: i32) -> Result<(), ClientError> {
        let resp = self.http.delete(self.product_url(id)).send().await?;
        check(resp).await?;
        Ok(())
    }
}

/// Map non-2xx responses to `ClientError`, keeping the server's message.
async fn check(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(ClientError::NotFound);
    }
    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or(body);
    warn!(status = status.as_u16(), %message, "catalog request failed");
    Err(ClientError::Status { status: status.as_u16(), message })
}
