//! Create `reservation` table.
//! One claim per item; rows follow their item on delete.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reservation::Table)
                    .if_not_exists()
                    .col(uuid(Reservation::Id).primary_key())
                    .col(string_len(Reservation::ItemId, 32).not_null())
                    .col(string_len(Reservation::Name, 256).not_null())
                    .col(string_len(Reservation::Contact, 256).not_null())
                    .col(timestamp_with_time_zone(Reservation::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservation_item")
                            .from(Reservation::Table, Reservation::ItemId)
                            .to(Item::Table, Item::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Reservation::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Reservation {
    Table,
    Id,
    ItemId,
    Name,
    Contact,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Item { Table, Id }
