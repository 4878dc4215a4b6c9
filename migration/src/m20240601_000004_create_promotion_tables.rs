use sea_orm_migration::prelude::*;

use crate::m20240601_000001_create_identity_tables::Customers;
use crate::m20240601_000002_create_catalog_tables::Products;

#[derive(DeriveIden)]
enum Promotions {
    Table,
    Id,
    Name,
    Description,
    DiscountPercent,
    StartDate,
    EndDate,
    MaxUsagePerUser,
    Active,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PromotionProducts {
    Table,
    Id,
    PromotionId,
    ProductId,
}

#[derive(DeriveIden)]
pub enum Vouchers {
    Table,
    Id,
    Code,
    Description,
    DiscountType,
    DiscountValue,
    MaxDiscount,
    MinOrderValue,
    MaxUsage,
    UsedCount,
    MaxUsagePerUser,
    StartDate,
    EndDate,
    Active,
    CreatedAt,
}

#[derive(DeriveIden)]
enum UserPromotions {
    Table,
    Id,
    CustomerId,
    PromotionId,
    VoucherId,
    OrderId,
    UsedDate,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

/// discount_type 取值: 1=percent, 2=fixed
/// user_promotions.used_date 为 NULL 表示未使用（预留），非 NULL 表示已核销
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Promotions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Promotions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Promotions::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Promotions::Description).text().null())
                    .col(ColumnDef::new(Promotions::DiscountPercent).integer().not_null())
                    .col(
                        ColumnDef::new(Promotions::StartDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Promotions::EndDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Promotions::MaxUsagePerUser)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Promotions::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Promotions::CreatedAt)
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
                    .table(PromotionProducts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PromotionProducts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PromotionProducts::PromotionId).integer().not_null())
                    .col(ColumnDef::new(PromotionProducts::ProductId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_promotion_products_promotion")
                            .from(PromotionProducts::Table, PromotionProducts::PromotionId)
                            .to(Promotions::Table, Promotions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_promotion_products_product")
                            .from(PromotionProducts::Table, PromotionProducts::ProductId)
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
                    .name("idx_promotion_products_unique")
                    .table(PromotionProducts::Table)
                    .col(PromotionProducts::PromotionId)
                    .col(PromotionProducts::ProductId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Vouchers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Vouchers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Vouchers::Code).string_len(50).not_null())
                    .col(ColumnDef::new(Vouchers::Description).string_len(500).null())
                    .col(ColumnDef::new(Vouchers::DiscountType).integer().not_null())
                    .col(ColumnDef::new(Vouchers::DiscountValue).big_integer().not_null())
                    .col(ColumnDef::new(Vouchers::MaxDiscount).big_integer().null())
                    .col(
                        ColumnDef::new(Vouchers::MinOrderValue)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Vouchers::MaxUsage).integer().not_null())
                    .col(ColumnDef::new(Vouchers::UsedCount).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Vouchers::MaxUsagePerUser)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Vouchers::StartDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Vouchers::EndDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Vouchers::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Vouchers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_vouchers_code_unique")
                    .table(Vouchers::Table)
                    .col(Vouchers::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserPromotions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserPromotions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserPromotions::CustomerId).integer().not_null())
                    .col(ColumnDef::new(UserPromotions::PromotionId).integer().null())
                    .col(ColumnDef::new(UserPromotions::VoucherId).integer().null())
                    .col(ColumnDef::new(UserPromotions::OrderId).integer().null())
                    .col(
                        ColumnDef::new(UserPromotions::UsedDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(UserPromotions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_promotions_customer")
                            .from(UserPromotions::Table, UserPromotions::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_promotions_customer")
                    .table(UserPromotions::Table)
                    .col(UserPromotions::CustomerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_promotions_order")
                    .table(UserPromotions::Table)
                    .col(UserPromotions::OrderId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(UserPromotions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Vouchers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(PromotionProducts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Promotions::Table).to_owned())
            .await?;
        Ok(())
    }
}
