use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Reservation: at most one per item
        manager
            .create_index(
                Index::create()
                    .name("uniq_reservation_item")
                    .table(Reservation::Table)
                    .col(Reservation::ItemId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Item: lookups by category
        manager
            .create_index(
                Index::create()
                    .name("idx_item_category")
                    .table(Item::Table)
                    .col(Item::Category)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("uniq_reservation_item").table(Reservation::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_item_category").table(Item::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Reservation { Table, ItemId }

#[derive(DeriveIden)]
enum Item { Table, Category }
