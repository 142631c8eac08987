//! Migration: Create products table with the indexes the ranked views scan.

use domain::MAX_PRODUCT_NAME_LENGTH;
use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_categories_table::Categories;

#[derive(DeriveMigrationName)]
pub struct Migration;

const IDX_CATEGORY_PRICE: &str = "idx_products_category_id_price";
const IDX_PRICE: &str = "idx_products_price";
const IDX_ID: &str = "idx_products_id";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Products::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Products::Name)
                            .string_len(MAX_PRODUCT_NAME_LENGTH)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Products::CategoryId).integer().not_null())
                    .col(
                        ColumnDef::new(Products::Price)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Products::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_category_id")
                            .from(Products::Table, Products::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Per-category ranking by price
        manager
            .create_index(
                Index::create()
                    .name(IDX_CATEGORY_PRICE)
                    .table(Products::Table)
                    .col(Products::CategoryId)
                    .col((Products::Price, IndexOrder::Desc))
                    .to_owned(),
            )
            .await?;

        // Default price ordering
        manager
            .create_index(
                Index::create()
                    .name(IDX_PRICE)
                    .table(Products::Table)
                    .col((Products::Price, IndexOrder::Desc))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_ID)
                    .table(Products::Table)
                    .col(Products::Id)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [IDX_ID, IDX_PRICE, IDX_CATEGORY_PRICE] {
            manager
                .drop_index(Index::drop().name(name).table(Products::Table).to_owned())
                .await?;
        }

        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Products {
    Table,
    Id,
    Name,
    CategoryId,
    Price,
    CreatedAt,
}
