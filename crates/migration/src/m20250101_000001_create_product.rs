//! Create `product` table.
//! One row per catalog item; `image_url` points at an uploaded file.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Product::Table)
                    .if_not_exists()
                    .col(pk_auto(Product::Id))
                    .col(string_len(Product::Name, 255))
                    .col(text(Product::Description))
                    .col(double(Product::Price))
                    .col(double_null(Product::DiscountedPrice))
                    .col(string_len(Product::PartNumber, 255))
                    .col(string_len_null(Product::ImageUrl, 512))
                    .col(timestamp_with_time_zone(Product::CreatedAt))
                    .col(timestamp_with_time_zone(Product::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Product::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Product {
    Table,
    Id,
    Name,
    Description,
    Price,
    DiscountedPrice,
    PartNumber,
    ImageUrl,
    CreatedAt,
    UpdatedAt,
}
