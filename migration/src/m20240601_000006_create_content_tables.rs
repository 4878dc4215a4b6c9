use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Pages {
    Table,
    Id,
    PageName,
    Contents,
    Thumb,
    Published,
    Alias,
    MetaTitle,
    MetaDesc,
    MetaKey,
    Ordering,
    CreatedAt,
}

#[derive(DeriveIden)]
enum News {
    Table,
    Id,
    Title,
    Summary,
    Contents,
    Thumb,
    Published,
    Alias,
    Author,
    AccountId,
    CatId,
    IsHot,
    IsNewfeed,
    Views,
    MetaDesc,
    MetaKey,
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
                    .table(Pages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Pages::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Pages::PageName).string_len(255).not_null())
                    .col(ColumnDef::new(Pages::Contents).text().null())
                    .col(ColumnDef::new(Pages::Thumb).string_len(255).null())
                    .col(ColumnDef::new(Pages::Published).boolean().not_null().default(true))
                    .col(ColumnDef::new(Pages::Alias).string_len(255).not_null())
                    .col(ColumnDef::new(Pages::MetaTitle).string_len(255).null())
                    .col(ColumnDef::new(Pages::MetaDesc).string_len(500).null())
                    .col(ColumnDef::new(Pages::MetaKey).string_len(255).null())
                    .col(ColumnDef::new(Pages::Ordering).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Pages::CreatedAt)
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
                    .name("idx_pages_alias_unique")
                    .table(Pages::Table)
                    .col(Pages::Alias)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(News::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(News::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(News::Title).string_len(255).not_null())
                    .col(ColumnDef::new(News::Summary).string_len(500).null())
                    .col(ColumnDef::new(News::Contents).text().null())
                    .col(ColumnDef::new(News::Thumb).string_len(255).null())
                    .col(ColumnDef::new(News::Published).boolean().not_null().default(true))
                    .col(ColumnDef::new(News::Alias).string_len(255).not_null())
                    .col(ColumnDef::new(News::Author).string_len(150).null())
                    .col(ColumnDef::new(News::AccountId).integer().null())
                    .col(ColumnDef::new(News::CatId).integer().null())
                    .col(ColumnDef::new(News::IsHot).boolean().not_null().default(false))
                    .col(ColumnDef::new(News::IsNewfeed).boolean().not_null().default(false))
                    .col(ColumnDef::new(News::Views).integer().not_null().default(0))
                    .col(ColumnDef::new(News::MetaDesc).string_len(500).null())
                    .col(ColumnDef::new(News::MetaKey).string_len(255).null())
                    .col(
                        ColumnDef::new(News::CreatedAt)
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
                    .name("idx_news_alias_unique")
                    .table(News::Table)
                    .col(News::Alias)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(News::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Pages::Table).to_owned())
            .await?;
        Ok(())
    }
}
