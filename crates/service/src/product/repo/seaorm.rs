use async_trait::async_trait;
use chrono::Utc;
use common::types::SortOrder;
use models::product::{self, Entity as ProductEntity};
use sea_orm::{
    sea_query::{Alias, Expr, Func, LikeExpr, SimpleExpr},
    ActiveModelTrait, Condition, ConnectionTrait, DatabaseBackend, DatabaseConnection, EntityTrait,
    NotSet, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::errors::ServiceError;
use crate::product::domain::{like_pattern, NewProduct, Product, ProductPatch, ProductQuery, SortField};
use crate::product::repository::ProductRepository;

/// SeaORM-backed repository implementation.
pub struct SeaOrmProductRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmProductRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn column(field: SortField) -> product::Column {
    match field {
        SortField::Id => product::Column::Id,
        SortField::Name => product::Column::Name,
        SortField::Description => product::Column::Description,
        SortField::Price => product::Column::Price,
        SortField::DiscountedPrice => product::Column::DiscountedPrice,
        SortField::PartNumber => product::Column::PartNumber,
        SortField::ImageUrl => product::Column::ImageUrl,
        SortField::CreatedAt => product::Column::CreatedAt,
        SortField::UpdatedAt => product::Column::UpdatedAt,
    }
}

const ASCII_UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const ASCII_LOWER: &str = "abcdefghijklmnopqrstuvwxyz";

/// `fold(col) LIKE pattern ESCAPE '\'` where `fold` lowercases ASCII letters
/// only. SQLite's `LOWER` already does exactly that; Postgres `LOWER` follows
/// the database locale, so it gets an explicit `TRANSLATE` instead.
fn folded_like(backend: DatabaseBackend, col: product::Column, pattern: &str) -> SimpleExpr {
    let column = Expr::col((ProductEntity, col));
    let folded: SimpleExpr = match backend {
        DatabaseBackend::Sqlite => Func::lower(column).into(),
        _ => Func::cust(Alias::new("TRANSLATE"))
            .arg(column)
            .arg(Expr::val(ASCII_UPPER))
            .arg(Expr::val(ASCII_LOWER))
            .into(),
    };
    Expr::expr(folded).like(LikeExpr::new(pattern).escape('\\'))
}

fn db_err(e: sea_orm::DbErr) -> ServiceError { ServiceError::Db(e.to_string()) }

#[async_trait]
impl ProductRepository for SeaOrmProductRepository {
    async fn find(&self, query: &ProductQuery) -> Result<(Vec<Product>, u64), ServiceError> {
        let mut finder = ProductEntity::find();
        if !query.search.is_empty() {
            let pattern = like_pattern(&query.search);
            let backend = self.db.get_database_backend();
            finder = finder.filter(
                Condition::any()
                    .add(folded_like(backend, product::Column::Name, &pattern))
                    .add(folded_like(backend, product::Column::Description, &pattern))
                    .add(folded_like(backend, product::Column::PartNumber, &pattern)),
            );
        }
        let total = finder.clone().count(&self.db).await.map_err(db_err)?;
        let order = match query.order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        };
        let rows = finder
            .order_by(column(query.sort), order)
            .order_by_asc(product::Column::Id)
            .offset(query.offset)
            .limit(query.limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok((rows, total))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Product>, ServiceError> {
        ProductEntity::find_by_id(id).one(&self.db).await.map_err(db_err)
    }

    async fn insert(&self, input: NewProduct) -> Result<Product, ServiceError> {
        let now = Utc::now().into();
        let am = product::ActiveModel {
            id: NotSet,
            name: Set(input.name),
            description: Set(input.description),
            price: Set(input.price),
            discounted_price: Set(input.discounted_price),
            part_number: Set(input.part_number),
            image_url: Set(input.image_url),
            created_at: Set(now),
            updated_at: Set(now),
        };
        am.insert(&self.db).await.map_err(db_err)
    }

    async fn update(&self, id: i32, patch: ProductPatch) -> Result<Option<Product>, ServiceError> {
        let current = ProductEntity::find_by_id(id).one(&self.db).await.map_err(db_err)?;
        let Some(existing) = current else {
            return Ok(None);
        };
        let mut am: product::ActiveModel = existing.into();
        if let Some(v) = patch.name {
            am.name = Set(v);
        }
        if let Some(v) = patch.description {
            am.description = Set(v);
        }
        if let Some(v) = patch.price {
            am.price = Set(v);
        }
        if let Some(v) = patch.discounted_price {
            am.discounted_price = Set(Some(v));
        }
        if let Some(v) = patch.part_number {
            am.part_number = Set(v);
        }
        if let Some(v) = patch.image_url {
            am.image_url = Set(Some(v));
        }
        am.updated_at = Set(Utc::now().into());
        let updated = am.update(&self.db).await.map_err(db_err)?;
        Ok(Some(updated))
    }

    async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        let res = ProductEntity::delete_by_id(id).exec(&self.db).await.map_err(db_err)?;
        Ok(res.rows_affected > 0)
    }
}
