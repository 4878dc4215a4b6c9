use sea_orm_migration::prelude::*;

use crate::m20240601_000001_create_identity_tables::Customers;
use crate::m20240601_000002_create_catalog_tables::ProductDetails;

#[derive(DeriveIden)]
pub enum Orders {
    Table,
    Id,
    CustomerId,
    ReceiverName,
    Phone,
    Address,
    LocationId,
    District,
    Ward,
    Note,
    PaymentMethod,
    TransactStatus,
    Paid,
    Deleted,
    PromotionId,
    VoucherId,
    TotalMoney,
    TotalDiscount,
    OrderDate,
    PaymentDate,
    ShipDate,
}

#[derive(DeriveIden)]
enum OrderDetails {
    Table,
    Id,
    OrderId,
    ProductDetailId,
    ProductName,
    Amount,
    Price,
    Total,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

/// transact_status 取值: 1=pending, 2=confirmed, 3=shipping, 4=completed, 5=cancelled
/// payment_method 取值: 1=cod, 2=bank_transfer
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Orders::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Orders::CustomerId).integer().not_null())
                    .col(ColumnDef::new(Orders::ReceiverName).string_len(150).not_null())
                    .col(ColumnDef::new(Orders::Phone).string_len(20).not_null())
                    .col(ColumnDef::new(Orders::Address).string_len(255).not_null())
                    .col(ColumnDef::new(Orders::LocationId).integer().null())
                    .col(ColumnDef::new(Orders::District).string_len(150).null())
                    .col(ColumnDef::new(Orders::Ward).string_len(150).null())
                    .col(ColumnDef::new(Orders::Note).text().null())
                    .col(ColumnDef::new(Orders::PaymentMethod).integer().not_null().default(1))
                    .col(
                        ColumnDef::new(Orders::TransactStatus)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Orders::Paid).boolean().not_null().default(false))
                    .col(ColumnDef::new(Orders::Deleted).boolean().not_null().default(false))
                    .col(ColumnDef::new(Orders::PromotionId).integer().null())
                    .col(ColumnDef::new(Orders::VoucherId).integer().null())
                    .col(
                        ColumnDef::new(Orders::TotalMoney)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Orders::TotalDiscount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Orders::OrderDate)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Orders::PaymentDate).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Orders::ShipDate).timestamp_with_time_zone().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_customer")
                            .from(Orders::Table, Orders::CustomerId)
                            .to(Customers::Table, Customers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_orders_customer")
                    .table(Orders::Table)
                    .col(Orders::CustomerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_orders_status")
                    .table(Orders::Table)
                    .col(Orders::TransactStatus)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrderDetails::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrderDetails::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OrderDetails::OrderId).integer().not_null())
                    .col(ColumnDef::new(OrderDetails::ProductDetailId).integer().not_null())
                    .col(ColumnDef::new(OrderDetails::ProductName).string_len(255).not_null())
                    .col(ColumnDef::new(OrderDetails::Amount).integer().not_null())
                    .col(ColumnDef::new(OrderDetails::Price).big_integer().not_null())
                    .col(ColumnDef::new(OrderDetails::Total).big_integer().not_null())
                    .col(
                        ColumnDef::new(OrderDetails::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_details_order")
                            .from(OrderDetails::Table, OrderDetails::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_details_product_detail")
                            .from(OrderDetails::Table, OrderDetails::ProductDetailId)
                            .to(ProductDetails::Table, ProductDetails::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_order_details_order")
                    .table(OrderDetails::Table)
                    .col(OrderDetails::OrderId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(OrderDetails::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Orders::Table).to_owned())
            .await?;
        Ok(())
    }
}
