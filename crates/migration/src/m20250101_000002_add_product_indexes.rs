//! Indexes backing the default listing sorts (name, price).
//! `part_number` is deliberately not unique.
use sea_orm_migration::prelude::*;

use crate::m20250101_000001_create_product::Product;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_product_name")
                    .table(Product::Table)
                    .col(Product::Name)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_product_price")
                    .table(Product::Table)
                    .col(Product::Price)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_product_part_number")
                    .table(Product::Table)
                    .col(Product::PartNumber)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in ["idx_product_part_number", "idx_product_price", "idx_product_name"] {
            manager
                .drop_index(Index::drop().name(name).table(Product::Table).to_owned())
                .await?;
        }
        Ok(())
    }
}
