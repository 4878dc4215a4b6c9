use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Roles {
    Table,
    RoleName,
    Description,
}

#[derive(DeriveIden)]
enum Sizes {
    Table,
    Name,
}

#[derive(DeriveIden)]
enum Colors {
    Table,
    Name,
    Code,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

/// 初始化基础数据:
/// - 角色（空库按插入顺序得到 id）: 1=Admin（超级管理员，可管理账号与角色），2=Staff
/// - 尺码与颜色（商品变体矩阵使用）
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let roles = Query::insert()
            .into_table(Roles::Table)
            .columns([Roles::RoleName, Roles::Description])
            .values_panic(["Admin".into(), "Full back-office access".into()])
            .values_panic(["Staff".into(), "Catalog and order management".into()])
            .to_owned();
        manager.exec_stmt(roles).await?;

        let mut sizes = Query::insert();
        sizes.into_table(Sizes::Table).columns([Sizes::Name]);
        for name in ["S", "M", "L", "XL", "XXL"] {
            sizes.values_panic([name.into()]);
        }
        manager.exec_stmt(sizes.to_owned()).await?;

        let mut colors = Query::insert();
        colors
            .into_table(Colors::Table)
            .columns([Colors::Name, Colors::Code]);
        for (name, code) in [
            ("Black", "#000000"),
            ("White", "#FFFFFF"),
            ("Red", "#E53935"),
            ("Blue", "#1E88E5"),
            ("Beige", "#D7CCC8"),
        ] {
            colors.values_panic([name.into(), code.into()]);
        }
        manager.exec_stmt(colors.to_owned()).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(Query::delete().from_table(Colors::Table).to_owned())
            .await?;
        manager
            .exec_stmt(Query::delete().from_table(Sizes::Table).to_owned())
            .await?;
        manager
            .exec_stmt(Query::delete().from_table(Roles::Table).to_owned())
            .await?;
        Ok(())
    }
}
