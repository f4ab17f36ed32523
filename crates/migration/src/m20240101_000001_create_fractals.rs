//! Create `fractals` table.
//!
//! One row per job: the caller-supplied id and the JSON document as text.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Fractals::Table)
                    .if_not_exists()
                    .col(string_len(Fractals::FractalId, 36).primary_key())
                    .col(text(Fractals::Data).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Fractals::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Fractals {
    Table,
    FractalId,
    Data,
}
