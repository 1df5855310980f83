use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDoc {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub discounted_price: Option<f64>,
    pub part_number: String,
    /// Public path such as `/uploads/product-1700000000000-42.png`
    pub image_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(ToSchema)]
pub struct ProductPageDoc {
    pub page: u64,
    pub next: bool,
    pub previous: bool,
    pub products: Vec<ProductDoc>,
    pub total: u64,
}

/// Multipart form for create and update. On update every part is optional.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductFormDoc {
    pub name: String,
    pub description: String,
    pub price: String,
    pub discounted_price: Option<String>,
    pub part_number: String,
    /// jpg, jpeg, png or gif image file
    #[schema(format = Binary)]
    pub image_url: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::products::list,
        crate::routes::products::get,
        crate::routes::products::create,
        crate::routes::products::update,
        crate::routes::products::delete,
    ),
    components(
        schemas(
            HealthResponse,
            ProductDoc,
            ProductPageDoc,
            ProductFormDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "products")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_product_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().cloned().collect();
        assert!(paths.contains(&"/products".to_string()));
        assert!(paths.contains(&"/products/{id}".to_string()));
        assert!(paths.contains(&"/health".to_string()));
    }
}
