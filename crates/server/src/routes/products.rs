use axum::{
    extract::{rejection::{PathRejection, QueryRejection}, Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use service::product::domain::{ListQuery, Product, ProductPage};
use tracing::info;

use crate::{errors::JsonApiError, form::ProductForm, state::ServerState};

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// 1-based page number (default 1)
    pub page: Option<u64>,
    /// Page size (default 10)
    pub limit: Option<u64>,
    /// Field to sort by, e.g. `name`, `price`, `partNumber`
    pub sort: Option<String>,
    /// `ASC` or `DESC`
    pub order: Option<String>,
    /// Case-insensitive substring over name, description and part number
    pub search: Option<String>,
}

impl From<ListParams> for ListQuery {
    fn from(p: ListParams) -> Self {
        ListQuery { page: p.page, limit: p.limit, sort: p.sort, order: p.order, search: p.search }
    }
}

fn product_id(path: Result<Path<i32>, PathRejection>) -> Result<i32, JsonApiError> {
    path.map(|Path(id)| id)
        .map_err(|e| JsonApiError::bad_request(format!("invalid product id: {}", e.body_text())))
}

#[utoipa::path(
    get, path = "/products", tag = "products",
    params(ListParams),
    responses(
        (status = 200, description = "One page of products", body = crate::openapi::ProductPageDoc),
        (status = 400, description = "Validation Error"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn list(
    State(state): State<ServerState>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<ProductPage>, JsonApiError> {
    let Query(params) = query.map_err(|e| JsonApiError::bad_request(e.body_text()))?;
    let page = state.products.list(params.into()).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get, path = "/products/{id}", tag = "products",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::ProductDoc),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<Product>, JsonApiError> {
    let id = product_id(path)?;
    Ok(Json(state.products.get(id).await?))
}

#[utoipa::path(
    post, path = "/products", tag = "products",
    request_body(content = crate::openapi::ProductFormDoc, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Created", body = crate::openapi::ProductDoc),
        (status = 400, description = "Validation Error"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Product>), JsonApiError> {
    let form = ProductForm::read(multipart, state.max_file_size).await?;
    let (input, image) = form.into_new_product()?;
    info!(name = %input.name, part_number = %input.part_number, has_image = image.is_some(), "product_create_request");
    let created = state.products.create(input, image).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put, path = "/products/{id}", tag = "products",
    params(("id" = i32, Path, description = "Product ID")),
    request_body(content = crate::openapi::ProductFormDoc, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Updated", body = crate::openapi::ProductDoc),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    path: Result<Path<i32>, PathRejection>,
    multipart: Multipart,
) -> Result<Json<Product>, JsonApiError> {
    let id = product_id(path)?;
    let form = ProductForm::read(multipart, state.max_file_size).await?;
    let (patch, image) = form.into_patch()?;
    let updated = state.products.update(id, patch, image).await?;
    Ok(Json(updated))
}

#[utoipa::path(
    delete, path = "/products/{id}", tag = "products",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, JsonApiError> {
    let id = product_id(path)?;
    state.products.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
