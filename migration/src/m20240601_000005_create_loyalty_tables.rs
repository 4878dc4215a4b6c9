use sea_orm_migration::prelude::*;

use crate::m20240601_000001_create_identity_tables::Customers;
use crate::m20240601_000004_create_promotion_tables::Vouchers;

#[derive(DeriveIden)]
enum CheckInHistories {
    Table,
    Id,
    CustomerId,
    CheckInDate,
    PointsEarned,
    Streak,
    CreatedAt,
}

#[derive(DeriveIden)]
enum RewardHistories {
    Table,
    Id,
    CustomerId,
    RewardName,
    PointsSpent,
    VoucherId,
    Confirmed,
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
                    .table(CheckInHistories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CheckInHistories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CheckInHistories::CustomerId).integer().not_null())
                    .col(ColumnDef::new(CheckInHistories::CheckInDate).date().not_null())
                    .col(
                        ColumnDef::new(CheckInHistories::PointsEarned)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CheckInHistories::Streak).integer().not_null())
                    .col(
                        ColumnDef::new(CheckInHistories::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_check_in_histories_customer")
                            .from(CheckInHistories::Table, CheckInHistories::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 每个客户每天只能签到一次
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_check_in_histories_customer_date")
                    .table(CheckInHistories::Table)
                    .col(CheckInHistories::CustomerId)
                    .col(CheckInHistories::CheckInDate)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RewardHistories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RewardHistories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RewardHistories::CustomerId).integer().not_null())
                    .col(ColumnDef::new(RewardHistories::RewardName).string_len(255).not_null())
                    .col(
                        ColumnDef::new(RewardHistories::PointsSpent)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RewardHistories::VoucherId).integer().null())
                    .col(
                        ColumnDef::new(RewardHistories::Confirmed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(RewardHistories::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reward_histories_customer")
                            .from(RewardHistories::Table, RewardHistories::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reward_histories_voucher")
                            .from(RewardHistories::Table, RewardHistories::VoucherId)
                            .to(Vouchers::Table, Vouchers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(RewardHistories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(CheckInHistories::Table).to_owned())
            .await?;
        Ok(())
    }
}
