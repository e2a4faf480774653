//! Create `item` table.
//! Registry entries; the category column references `category.name`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Item::Table)
                    .if_not_exists()
                    .col(string_len(Item::Id, 32).primary_key())
                    .col(string_len(Item::Name, 256).not_null())
                    .col(text_null(Item::Description))
                    .col(text(Item::Link).not_null())
                    .col(string_len(Item::Image, 512).not_null())
                    .col(string_len(Item::Category, 128).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_item_category")
                            .from(Item::Table, Item::Category)
                            .to(Category::Table, Category::Name)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Item::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Item {
    Table,
    Id,
    Name,
    Description,
    Link,
    Image,
    Category,
}

#[derive(DeriveIden)]
enum Category { Table, Name }
