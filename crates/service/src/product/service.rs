use std::sync::Arc;

use common::types::SortOrder;
use tracing::{debug, info, instrument, warn};

use crate::errors::ServiceError;
use crate::pagination::Pagination;
use crate::storage::blob::BlobStorage;
use super::domain::{ImageUpload, ListQuery, NewProduct, Product, ProductPage, ProductPatch, ProductQuery, SortField};
use super::repository::ProductRepository;
use super::validation::{self, MAX_IMAGE_BYTES};

/// Listing and upload limits applied by the service.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListLimits {
    pub default_limit: u64,
    pub max_limit: u64,
    pub max_image_bytes: usize,
}

impl Default for ListLimits {
    fn default() -> Self {
        Self { default_limit: 10, max_limit: 100, max_image_bytes: MAX_IMAGE_BYTES }
    }
}

/// Catalog business service, independent of web framework and database client.
pub struct ProductService<R: ProductRepository, B: BlobStorage> {
    repo: Arc<R>,
    blobs: Arc<B>,
    limits: ListLimits,
}

impl<R: ProductRepository, B: BlobStorage> ProductService<R, B> {
    pub fn new(repo: Arc<R>, blobs: Arc<B>) -> Self {
        Self { repo, blobs, limits: ListLimits::default() }
    }

    pub fn with_limits(mut self, limits: ListLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> ListLimits {
        self.limits
    }

    /// Resolve raw listing parameters into normalized pagination and a
    /// repository query. Unknown sort fields or orders are validation errors.
    pub fn resolve_query(&self, raw: ListQuery) -> Result<(Pagination, ProductQuery), ServiceError> {
        let pagination = Pagination {
            page: raw.page.unwrap_or(1),
            per_page: raw.limit.unwrap_or(self.limits.default_limit),
        }
        .normalize(self.limits.max_limit);

        let sort = match raw.sort.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => s.parse::<SortField>()?,
            None => SortField::default(),
        };
        let order = match raw.order.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => s.parse::<SortOrder>().map_err(ServiceError::Validation)?,
            None => SortOrder::default(),
        };

        let query = ProductQuery {
            offset: pagination.offset(),
            limit: pagination.per_page,
            sort,
            order,
            search: raw.search.unwrap_or_default(),
        };
        Ok((pagination, query))
    }

    /// List one page of products matching the search term.
    ///
    /// # Examples
    /// ```
    /// use service::product::{ProductService, domain::{ListQuery, NewProduct}};
    /// use service::product::repository::mock::InMemoryProductRepository;
    /// use service::storage::blob::mock::InMemoryBlobStore;
    /// use std::sync::Arc;
    /// let svc = ProductService::new(Arc::new(InMemoryProductRepository::default()), Arc::new(InMemoryBlobStore::default()));
    /// let input = NewProduct { name: "Widget".into(), description: "A widget".into(), price: 9.99, discounted_price: None, part_number: "W-100".into(), image_url: None };
    /// tokio_test::block_on(svc.create(input, None)).unwrap();
    /// let page = tokio_test::block_on(svc.list(ListQuery { search: Some("WIDGET".into()), ..Default::default() })).unwrap();
    /// assert_eq!(page.total, 1);
    /// assert!(!page.has_next && !page.has_previous);
    /// ```
    #[instrument(skip(self), fields(page = ?raw.page, limit = ?raw.limit))]
    pub async fn list(&self, raw: ListQuery) -> Result<ProductPage, ServiceError> {
        let (pagination, query) = self.resolve_query(raw)?;
        let (products, total) = self.repo.find(&query).await?;
        debug!(returned = products.len(), total, sort = query.sort.as_str(), order = %query.order, "listed products");
        Ok(ProductPage {
            page: pagination.page,
            has_next: pagination.has_next(total),
            has_previous: pagination.has_previous(),
            products,
            total,
        })
    }

    pub async fn get(&self, id: i32) -> Result<Product, ServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::product_not_found(id))
    }

    /// Create a product. An attached image is stored first; if storing fails
    /// nothing is inserted, and if the insert fails the stored image is removed.
    #[instrument(skip(self, input, image), fields(name = %input.name, has_image = image.is_some()))]
    pub async fn create(&self, mut input: NewProduct, image: Option<ImageUpload>) -> Result<Product, ServiceError> {
        validation::validate_new_product(&input)?;
        let stored = match image {
            Some(upload) => {
                let path = self.store_image(&upload).await?;
                input.image_url = Some(path.clone());
                Some(path)
            }
            None => None,
        };

        match self.repo.insert(input).await {
            Ok(created) => {
                info!(id = created.id, image = ?created.image_url, "product_created");
                Ok(created)
            }
            Err(e) => {
                if let Some(path) = stored {
                    self.discard_image(&path).await;
                }
                Err(e)
            }
        }
    }

    /// Apply a partial update. When a new image replaces an old one, the old
    /// file is removed best-effort after the row is updated.
    #[instrument(skip(self, patch, image), fields(has_image = image.is_some()))]
    pub async fn update(&self, id: i32, mut patch: ProductPatch, image: Option<ImageUpload>) -> Result<Product, ServiceError> {
        validation::validate_patch(&patch)?;
        let existing = self.get(id).await?;

        let stored = match image {
            Some(upload) => {
                let path = self.store_image(&upload).await?;
                patch.image_url = Some(path.clone());
                Some(path)
            }
            None => None,
        };

        let updated = match self.repo.update(id, patch).await {
            Ok(Some(p)) => p,
            Ok(None) => {
                if let Some(path) = &stored {
                    self.discard_image(path).await;
                }
                return Err(ServiceError::product_not_found(id));
            }
            Err(e) => {
                if let Some(path) = &stored {
                    self.discard_image(path).await;
                }
                return Err(e);
            }
        };

        if stored.is_some() {
            if let Some(old) = existing.image_path() {
                if updated.image_url.as_deref() != Some(old) {
                    self.discard_image(old).await;
                }
            }
        }
        info!(id, "product_updated");
        Ok(updated)
    }

    /// Delete a product and, best-effort, its image file.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let product = self.get(id).await?;
        if let Some(path) = product.image_path() {
            self.discard_image(path).await;
        }
        if !self.repo.delete(id).await? {
            return Err(ServiceError::product_not_found(id));
        }
        info!(id, "product_deleted");
        Ok(())
    }

    async fn store_image(&self, upload: &ImageUpload) -> Result<String, ServiceError> {
        validation::validate_upload(upload, self.limits.max_image_bytes)?;
        let path = self.blobs.save(&upload.bytes, &upload.file_name).await?;
        debug!(%path, size = upload.bytes.len(), "image_stored");
        Ok(path)
    }

    /// Remove a stored image, logging instead of failing.
    async fn discard_image(&self, path: &str) {
        match self.blobs.delete(path).await {
            Ok(()) => info!(%path, "image_deleted"),
            Err(ServiceError::NotFound(_)) => warn!(%path, "image file not found"),
            Err(e) => warn!(%path, error = %e, "failed to delete image file"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::repository::mock::InMemoryProductRepository;
    use crate::storage::blob::mock::InMemoryBlobStore;

    type Svc = ProductService<InMemoryProductRepository, InMemoryBlobStore>;

    fn setup() -> (Svc, Arc<InMemoryProductRepository>, Arc<InMemoryBlobStore>) {
        let repo = Arc::new(InMemoryProductRepository::default());
        let blobs = Arc::new(InMemoryBlobStore::default());
        (ProductService::new(repo.clone(), blobs.clone()), repo, blobs)
    }

    fn widget() -> NewProduct {
        NewProduct {
            name: "Widget".into(),
            description: "A widget".into(),
            price: 9.99,
            discounted_price: None,
            part_number: "W-100".into(),
            image_url: None,
        }
    }

    fn named(name: &str) -> NewProduct {
        NewProduct { name: name.into(), part_number: format!("PN-{name}"), ..widget() }
    }

    fn png() -> ImageUpload {
        ImageUpload { file_name: "photo.png".into(), content_type: "image/png".into(), bytes: vec![1, 2, 3] }
    }

    fn page(page: u64, limit: u64) -> ListQuery {
        ListQuery { page: Some(page), limit: Some(limit), sort: Some("name".into()), order: Some("ASC".into()), search: None }
    }

    #[tokio::test]
    async fn create_then_get_round_trip() {
        let (svc, _, _) = setup();
        let created = svc.create(widget(), None).await.unwrap();
        let fetched = svc.get(created.id).await.unwrap();
        assert_eq!(fetched.name, "Widget");
        assert_eq!(fetched.description, "A widget");
        assert_eq!(fetched.price, 9.99);
        assert_eq!(fetched.part_number, "W-100");
        assert_eq!(fetched.discounted_price, None);
        assert_eq!(fetched.image_url, None);
    }

    #[tokio::test]
    async fn second_page_of_fifteen() {
        let (svc, _, _) = setup();
        let names: Vec<String> = (b'A'..=b'O').map(|c| format!("Item {}", c as char)).collect();
        // insert out of order to prove the sort
        for name in names.iter().rev() {
            svc.create(named(name), None).await.unwrap();
        }
        let result = svc.list(page(2, 10)).await.unwrap();
        assert_eq!(result.total, 15);
        assert_eq!(result.products.len(), 5);
        assert!(result.has_previous);
        assert!(!result.has_next);
        let got: Vec<_> = result.products.iter().map(|p| p.name.clone()).collect();
        assert_eq!(got, names[10..].to_vec());

        let first = svc.list(page(1, 10)).await.unwrap();
        assert_eq!(first.products.len(), 10);
        assert!(first.has_next && !first.has_previous);
    }

    #[tokio::test]
    async fn out_of_range_page_is_empty_not_error() {
        let (svc, _, _) = setup();
        svc.create(widget(), None).await.unwrap();
        let result = svc.list(page(9, 10)).await.unwrap();
        assert!(result.products.is_empty());
        assert_eq!(result.total, 1);
        assert!(result.has_previous);
    }

    #[tokio::test]
    async fn empty_search_equals_no_search() {
        let (svc, _, _) = setup();
        for n in ["Alpha", "beta", "Gamma"] {
            svc.create(named(n), None).await.unwrap();
        }
        let none = svc.list(ListQuery::default()).await.unwrap();
        let empty = svc.list(ListQuery { search: Some(String::new()), ..Default::default() }).await.unwrap();
        assert_eq!(none, empty);
        assert_eq!(none.total, 3);
    }

    #[tokio::test]
    async fn defaults_and_invalid_sort() {
        let (svc, _, _) = setup();
        let (p, q) = svc.resolve_query(ListQuery::default()).unwrap();
        assert_eq!((p.page, p.per_page), (1, 10));
        assert_eq!(q.sort, SortField::Name);
        assert_eq!(q.order, SortOrder::Asc);
        assert_eq!(q.search, "");

        let (_, q) = svc.resolve_query(ListQuery { order: Some("desc".into()), sort: Some("price".into()), ..Default::default() }).unwrap();
        assert_eq!((q.sort, q.order), (SortField::Price, SortOrder::Desc));

        let err = svc.resolve_query(ListQuery { sort: Some("secret".into()), ..Default::default() }).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        let err = svc.resolve_query(ListQuery { order: Some("up".into()), ..Default::default() }).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn limit_is_capped() {
        let (svc, _, _) = setup();
        let svc = svc.with_limits(ListLimits { max_limit: 5, ..ListLimits::default() });
        let (p, q) = svc.resolve_query(ListQuery { limit: Some(50), page: Some(0), ..Default::default() }).unwrap();
        assert_eq!((p.page, p.per_page, q.limit, q.offset), (1, 5, 5, 0));
    }

    #[tokio::test]
    async fn update_price_only_keeps_other_fields() {
        let (svc, _, _) = setup();
        let created = svc.create(NewProduct { discounted_price: Some(5.0), ..widget() }, Some(png())).await.unwrap();
        let patch = ProductPatch { price: Some(19.5), ..Default::default() };
        let updated = svc.update(created.id, patch, None).await.unwrap();
        assert_eq!(updated.price, 19.5);
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.discounted_price, created.discounted_price);
        assert_eq!(updated.part_number, created.part_number);
        assert_eq!(updated.image_url, created.image_url);
    }

    #[tokio::test]
    async fn update_missing_is_not_found_and_stores_nothing() {
        let (svc, _, blobs) = setup();
        let err = svc.update(42, ProductPatch::default(), Some(png())).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert!(blobs.is_empty());
    }

    #[tokio::test]
    async fn replacing_image_deletes_previous_file() {
        let (svc, _, blobs) = setup();
        let created = svc.create(widget(), Some(png())).await.unwrap();
        let old = created.image_url.clone().unwrap();
        assert!(blobs.contains(&old));

        let updated = svc.update(created.id, ProductPatch::default(), Some(png())).await.unwrap();
        let new = updated.image_url.unwrap();
        assert_ne!(new, old);
        assert!(blobs.contains(&new));
        assert!(!blobs.contains(&old));
        assert_eq!(blobs.len(), 1);
    }

    #[tokio::test]
    async fn storage_failure_aborts_create() {
        let (svc, repo, blobs) = setup();
        blobs.set_fail_saves(true);
        let err = svc.create(widget(), Some(png())).await.unwrap_err();
        assert!(matches!(err, ServiceError::Storage(_)));
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn disallowed_image_rejected_before_storage() {
        let (svc, repo, blobs) = setup();
        let pdf = ImageUpload { content_type: "application/pdf".into(), ..png() };
        let err = svc.create(widget(), Some(pdf)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(repo.is_empty());
        assert!(blobs.is_empty());
    }

    #[tokio::test]
    async fn delete_removes_row_and_image() {
        let (svc, _, blobs) = setup();
        let created = svc.create(widget(), Some(png())).await.unwrap();
        svc.delete(created.id).await.unwrap();
        assert!(blobs.is_empty());
        assert!(matches!(svc.get(created.id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.delete(created.id).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_succeeds_when_image_cleanup_fails() {
        let (svc, repo, blobs) = setup();
        let with_missing = svc
            .create(NewProduct { image_url: Some("/uploads/gone.png".into()), ..widget() }, None)
            .await
            .unwrap();
        svc.delete(with_missing.id).await.unwrap();

        let with_image = svc.create(widget(), Some(png())).await.unwrap();
        blobs.set_fail_deletes(true);
        svc.delete(with_image.id).await.unwrap();
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn inverted_discount_is_accepted_but_not_displayed() {
        let (svc, _, _) = setup();
        let created = svc.create(NewProduct { price: 10.0, discounted_price: Some(15.0), ..widget() }, None).await.unwrap();
        assert_eq!(created.discounted_price, Some(15.0));
        assert!(!created.has_discount());
        assert_eq!(created.effective_price(), 10.0);
    }
}
