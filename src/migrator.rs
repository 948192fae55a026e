use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240101_000002_create_catalog_tables::Migration),
            Box::new(m20240101_000003_create_orders_tables::Migration),
        ]
    }
}

mod m20240101_000001_create_users_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_users_table"
        }
    }

    // Timestamps carry a time zone; the entities read them as `DateTime<Utc>`.
    pub(super) fn users_table() -> TableCreateStatement {
        Table::create()
            .table(Users::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Users::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(Users::Name).string_len(50).not_null())
            .col(
                ColumnDef::new(Users::Email)
                    .string()
                    .not_null()
                    .unique_key(),
            )
            .col(ColumnDef::new(Users::PasswordHash).string().not_null())
            .col(
                ColumnDef::new(Users::IsAdmin)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .col(
                ColumnDef::new(Users::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .to_owned()
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager.create_table(users_table()).await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Users {
        Table,
        Id,
        Name,
        Email,
        PasswordHash,
        IsAdmin,
        CreatedAt,
    }
}

mod m20240101_000002_create_catalog_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_catalog_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Dishes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Dishes::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Dishes::Title).string().not_null())
                        .col(
                            ColumnDef::new(Dishes::Price)
                                .big_integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Dishes::Description).text().null())
                        .col(ColumnDef::new(Dishes::Picture).string().null())
                        .to_owned(),
                )
                .await?;

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
                        .col(
                            ColumnDef::new(Categories::Title)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(CategoriesDishes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(CategoriesDishes::CategoryId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CategoriesDishes::DishId)
                                .integer()
                                .not_null(),
                        )
                        .primary_key(
                            Index::create()
                                .col(CategoriesDishes::CategoryId)
                                .col(CategoriesDishes::DishId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_categories_dishes_category_id")
                                .from(CategoriesDishes::Table, CategoriesDishes::CategoryId)
                                .to(Categories::Table, Categories::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_categories_dishes_dish_id")
                                .from(CategoriesDishes::Table, CategoriesDishes::DishId)
                                .to(Dishes::Table, Dishes::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(CategoriesDishes::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Categories::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Dishes::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Dishes {
        Table,
        Id,
        Title,
        Price,
        Description,
        Picture,
    }

    #[derive(DeriveIden)]
    pub(super) enum Categories {
        Table,
        Id,
        Title,
    }

    #[derive(DeriveIden)]
    pub(super) enum CategoriesDishes {
        Table,
        CategoryId,
        DishId,
    }
}

mod m20240101_000003_create_orders_tables {
    use sea_orm_migration::prelude::*;

    use super::m20240101_000001_create_users_table::Users;
    use super::m20240101_000002_create_catalog_tables::Dishes;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_orders_tables"
        }
    }

    // As with users, the order date must round-trip as `DateTime<Utc>`.
    pub(super) fn orders_table() -> TableCreateStatement {
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
            .col(
                ColumnDef::new(Orders::Date)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .col(ColumnDef::new(Orders::Total).big_integer().not_null())
            .col(ColumnDef::new(Orders::Status).string_len(16).not_null())
            .col(ColumnDef::new(Orders::Phone).string_len(15).not_null())
            .col(ColumnDef::new(Orders::Address).string_len(200).not_null())
            .col(ColumnDef::new(Orders::UserId).integer().not_null())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_orders_user_id")
                    .from(Orders::Table, Orders::UserId)
                    .to(Users::Table, Users::Id),
            )
            .to_owned()
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager.create_table(orders_table()).await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_orders_user_id")
                        .table(Orders::Table)
                        .col(Orders::UserId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(OrdersDishes::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(OrdersDishes::OrderId).integer().not_null())
                        .col(ColumnDef::new(OrdersDishes::DishId).integer().not_null())
                        .primary_key(
                            Index::create()
                                .col(OrdersDishes::OrderId)
                                .col(OrdersDishes::DishId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_orders_dishes_order_id")
                                .from(OrdersDishes::Table, OrdersDishes::OrderId)
                                .to(Orders::Table, Orders::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_orders_dishes_dish_id")
                                .from(OrdersDishes::Table, OrdersDishes::DishId)
                                .to(Dishes::Table, Dishes::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(OrdersDishes::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Orders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Orders {
        Table,
        Id,
        Date,
        Total,
        Status,
        Phone,
        Address,
        UserId,
    }

    #[derive(DeriveIden)]
    pub(super) enum OrdersDishes {
        Table,
        OrderId,
        DishId,
    }
}
