use sea_orm_migration::prelude::*;

use crate::m20240601_000001_create_identity_tables::Customers;

#[derive(DeriveIden)]
pub enum Categories {
    Table,
    Id,
    CatName,
    Description,
    ParentId,
    Levels,
    Ordering,
    Published,
    Thumb,
    Alias,
    MetaTitle,
    MetaDesc,
    MetaKey,
}

#[derive(DeriveIden)]
pub enum Suppliers {
    Table,
    Id,
    Name,
    Phone,
    Email,
    Address,
    Active,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum Sizes {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
pub enum Colors {
    Table,
    Id,
    Name,
    Code,
}

#[derive(DeriveIden)]
pub enum Products {
    Table,
    Id,
    ProductName,
    ShortDesc,
    Description,
    CatId,
    SupplierId,
    Price,
    Discount,
    Thumb,
    BestSeller,
    HomeFlag,
    Active,
    Tags,
    Alias,
    MetaTitle,
    MetaDesc,
    MetaKey,
    UnitsInStock,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum ProductDetails {
    Table,
    Id,
    ProductId,
    SizeId,
    ColorId,
    Stock,
    Active,
}

#[derive(DeriveIden)]
enum Comments {
    Table,
    Id,
    CustomerId,
    ProductId,
    Content,
    Rating,
    Active,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Categories::CatName).string_len(255).not_null())
                    .col(ColumnDef::new(Categories::Description).text().null())
                    .col(ColumnDef::new(Categories::ParentId).integer().null())
                    .col(ColumnDef::new(Categories::Levels).integer().not_null().default(1))
                    .col(ColumnDef::new(Categories::Ordering).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Categories::Published)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Categories::Thumb).string_len(255).null())
                    .col(ColumnDef::new(Categories::Alias).string_len(255).not_null())
                    .col(ColumnDef::new(Categories::MetaTitle).string_len(255).null())
                    .col(ColumnDef::new(Categories::MetaDesc).string_len(500).null())
                    .col(ColumnDef::new(Categories::MetaKey).string_len(255).null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_categories_alias_unique")
                    .table(Categories::Table)
                    .col(Categories::Alias)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Suppliers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Suppliers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Suppliers::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Suppliers::Phone).string_len(20).null())
                    .col(ColumnDef::new(Suppliers::Email).string_len(150).null())
                    .col(ColumnDef::new(Suppliers::Address).string_len(255).null())
                    .col(
                        ColumnDef::new(Suppliers::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Suppliers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Sizes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sizes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sizes::Name).string_len(50).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Colors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Colors::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Colors::Name).string_len(50).not_null())
                    .col(ColumnDef::new(Colors::Code).string_len(20).null())
                    .to_owned(),
            )
            .await?;

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
                    .col(ColumnDef::new(Products::ProductName).string_len(255).not_null())
                    .col(ColumnDef::new(Products::ShortDesc).string_len(500).null())
                    .col(ColumnDef::new(Products::Description).text().null())
                    .col(ColumnDef::new(Products::CatId).integer().null())
                    .col(ColumnDef::new(Products::SupplierId).integer().null())
                    .col(ColumnDef::new(Products::Price).big_integer().not_null())
                    .col(ColumnDef::new(Products::Discount).integer().not_null().default(0))
                    .col(ColumnDef::new(Products::Thumb).string_len(255).null())
                    .col(
                        ColumnDef::new(Products::BestSeller)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Products::HomeFlag)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Products::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Products::Tags).string_len(255).null())
                    .col(ColumnDef::new(Products::Alias).string_len(255).not_null())
                    .col(ColumnDef::new(Products::MetaTitle).string_len(255).null())
                    .col(ColumnDef::new(Products::MetaDesc).string_len(500).null())
                    .col(ColumnDef::new(Products::MetaKey).string_len(255).null())
                    .col(
                        ColumnDef::new(Products::UnitsInStock)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Products::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Products::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_category")
                            .from(Products::Table, Products::CatId)
                            .to(Categories::Table, Categories::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_supplier")
                            .from(Products::Table, Products::SupplierId)
                            .to(Suppliers::Table, Suppliers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_products_alias")
                    .table(Products::Table)
                    .col(Products::Alias)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_products_category")
                    .table(Products::Table)
                    .col(Products::CatId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProductDetails::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProductDetails::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProductDetails::ProductId).integer().not_null())
                    .col(ColumnDef::new(ProductDetails::SizeId).integer().null())
                    .col(ColumnDef::new(ProductDetails::ColorId).integer().null())
                    .col(
                        ColumnDef::new(ProductDetails::Stock)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ProductDetails::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_details_product")
                            .from(ProductDetails::Table, ProductDetails::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_product_details_product")
                    .table(ProductDetails::Table)
                    .col(ProductDetails::ProductId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Comments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Comments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Comments::CustomerId).integer().not_null())
                    .col(ColumnDef::new(Comments::ProductId).integer().not_null())
                    .col(ColumnDef::new(Comments::Content).text().not_null())
                    .col(ColumnDef::new(Comments::Rating).integer().not_null().default(5))
                    .col(
                        ColumnDef::new(Comments::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Comments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comments_customer")
                            .from(Comments::Table, Comments::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comments_product")
                            .from(Comments::Table, Comments::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 删除顺序：评论 -> 变体 -> 商品 -> 基础数据
        manager
            .drop_table(Table::drop().if_exists().table(Comments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(ProductDetails::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Products::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Colors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Sizes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Suppliers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Categories::Table).to_owned())
            .await?;
        Ok(())
    }
}
