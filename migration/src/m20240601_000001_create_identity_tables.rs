use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
pub enum Roles {
    Table,
    Id,
    RoleName,
    Description,
}

#[derive(DeriveIden)]
pub enum Accounts {
    Table,
    Id,
    FullName,
    Email,
    Phone,
    PasswordHash,
    RoleId,
    Active,
    LastLogin,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum Locations {
    Table,
    Id,
    Name,
    ParentId,
    Levels,
    Slug,
}

#[derive(DeriveIden)]
pub enum Customers {
    Table,
    Id,
    FullName,
    Birthday,
    Avatar,
    Address,
    Email,
    Phone,
    LocationId,
    District,
    Ward,
    PasswordHash,
    Active,
    Points,
    CheckInStreak,
    LastCheckIn,
    CreatedAt,
    LastLogin,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Roles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Roles::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Roles::RoleName).string_len(100).not_null())
                    .col(ColumnDef::new(Roles::Description).string_len(255).null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Accounts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Accounts::FullName).string_len(150).not_null())
                    .col(ColumnDef::new(Accounts::Email).string_len(150).not_null())
                    .col(ColumnDef::new(Accounts::Phone).string_len(20).null())
                    .col(ColumnDef::new(Accounts::PasswordHash).string_len(255).not_null())
                    .col(ColumnDef::new(Accounts::RoleId).integer().not_null())
                    .col(
                        ColumnDef::new(Accounts::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Accounts::LastLogin).timestamp_with_time_zone().null())
                    .col(
                        ColumnDef::new(Accounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_accounts_role")
                            .from(Accounts::Table, Accounts::RoleId)
                            .to(Roles::Table, Roles::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_accounts_email_unique")
                    .table(Accounts::Table)
                    .col(Accounts::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Locations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Locations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Locations::Name).string_len(150).not_null())
                    .col(ColumnDef::new(Locations::ParentId).integer().null())
                    .col(ColumnDef::new(Locations::Levels).integer().not_null().default(1))
                    .col(ColumnDef::new(Locations::Slug).string_len(150).null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Customers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Customers::FullName).string_len(150).not_null())
                    .col(ColumnDef::new(Customers::Birthday).date().null())
                    .col(ColumnDef::new(Customers::Avatar).string_len(255).null())
                    .col(ColumnDef::new(Customers::Address).string_len(255).null())
                    .col(ColumnDef::new(Customers::Email).string_len(150).not_null())
                    .col(ColumnDef::new(Customers::Phone).string_len(20).null())
                    .col(ColumnDef::new(Customers::LocationId).integer().null())
                    .col(ColumnDef::new(Customers::District).string_len(150).null())
                    .col(ColumnDef::new(Customers::Ward).string_len(150).null())
                    .col(ColumnDef::new(Customers::PasswordHash).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Customers::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Customers::Points).big_integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Customers::CheckInStreak)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Customers::LastCheckIn).date().null())
                    .col(
                        ColumnDef::new(Customers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Customers::LastLogin).timestamp_with_time_zone().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_customers_email_unique")
                    .table(Customers::Table)
                    .col(Customers::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_customers_phone")
                    .table(Customers::Table)
                    .col(Customers::Phone)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(Customers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Locations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Accounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Roles::Table).to_owned())
            .await?;
        Ok(())
    }
}
