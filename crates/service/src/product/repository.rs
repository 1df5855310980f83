use async_trait::async_trait;

use crate::errors::ServiceError;
use super::domain::{NewProduct, Product, ProductPatch, ProductQuery};

/// Storage abstraction for products. The service depends only on this trait.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// One page of matching products plus the total match count.
    async fn find(&self, query: &ProductQuery) -> Result<(Vec<Product>, u64), ServiceError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Product>, ServiceError>;
    async fn insert(&self, input: NewProduct) -> Result<Product, ServiceError>;
    /// `Ok(None)` when no row has this id.
    async fn update(&self, id: i32, patch: ProductPatch) -> Result<Option<Product>, ServiceError>;
    /// Returns whether a row was deleted.
    async fn delete(&self, id: i32) -> Result<bool, ServiceError>;
}

/// Simple in-memory repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::cmp::Ordering;
    use std::sync::Mutex;

    use chrono::Utc;
    use common::types::SortOrder;

    use crate::product::domain::{matches_search, SortField};

    #[derive(Default)]
    struct State {
        rows: Vec<Product>,
        last_id: i32,
    }

    #[derive(Default)]
    pub struct InMemoryProductRepository {
        state: Mutex<State>,
    }

    impl InMemoryProductRepository {
        pub fn len(&self) -> usize {
            self.state.lock().map(|s| s.rows.len()).unwrap_or_default()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }

    fn lock_err() -> ServiceError {
        ServiceError::Db("in-memory repository lock poisoned".into())
    }

    fn cmp_opt<T: PartialOrd>(a: &Option<T>, b: &Option<T>) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(x), Some(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        }
    }

    fn compare(field: SortField, a: &Product, b: &Product) -> Ordering {
        match field {
            SortField::Id => a.id.cmp(&b.id),
            SortField::Name => a.name.cmp(&b.name),
            SortField::Description => a.description.cmp(&b.description),
            SortField::Price => a.price.total_cmp(&b.price),
            SortField::DiscountedPrice => cmp_opt(&a.discounted_price, &b.discounted_price),
            SortField::PartNumber => a.part_number.cmp(&b.part_number),
            SortField::ImageUrl => cmp_opt(&a.image_url, &b.image_url),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        }
    }

    #[async_trait]
    impl ProductRepository for InMemoryProductRepository {
        async fn find(&self, query: &ProductQuery) -> Result<(Vec<Product>, u64), ServiceError> {
            let state = self.state.lock().map_err(|_| lock_err())?;
            let mut matched: Vec<Product> = state
                .rows
                .iter()
                .filter(|p| matches_search(p, &query.search))
                .cloned()
                .collect();
            matched.sort_by(|a, b| {
                let primary = match query.order {
                    SortOrder::Asc => compare(query.sort, a, b),
                    SortOrder::Desc => compare(query.sort, b, a),
                };
                primary.then(a.id.cmp(&b.id))
            });
            let total = matched.len() as u64;
            let page = matched
                .into_iter()
                .skip(usize::try_from(query.offset).unwrap_or(usize::MAX))
                .take(usize::try_from(query.limit).unwrap_or(usize::MAX))
                .collect();
            Ok((page, total))
        }

        async fn find_by_id(&self, id: i32) -> Result<Option<Product>, ServiceError> {
            let state = self.state.lock().map_err(|_| lock_err())?;
            Ok(state.rows.iter().find(|p| p.id == id).cloned())
        }

        async fn insert(&self, input: NewProduct) -> Result<Product, ServiceError> {
            let mut state = self.state.lock().map_err(|_| lock_err())?;
            state.last_id += 1;
            let now = Utc::now().into();
            let product = Product {
                id: state.last_id,
                name: input.name,
                description: input.description,
                price: input.price,
                discounted_price: input.discounted_price,
                part_number: input.part_number,
                image_url: input.image_url,
                created_at: now,
                updated_at: now,
            };
            state.rows.push(product.clone());
            Ok(product)
        }

        async fn update(&self, id: i32, patch: ProductPatch) -> Result<Option<Product>, ServiceError> {
            let mut state = self.state.lock().map_err(|_| lock_err())?;
            let Some(row) = state.rows.iter_mut().find(|p| p.id == id) else { return Ok(None) };
            patch.apply_to(row);
            row.updated_at = Utc::now().into();
            Ok(Some(row.clone()))
        }

        async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
            let mut state = self.state.lock().map_err(|_| lock_err())?;
            let before = state.rows.len();
            state.rows.retain(|p| p.id != id);
            Ok(state.rows.len() < before)
        }
    }
}
