use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(gallery_table(Pictures::Table))
            .await?;

        manager
            .create_table(gallery_table(Sponsors::Table))
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Sponsors::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Pictures::Table).to_owned())
            .await
    }
}

/// Pictures and sponsors share one column layout.
fn gallery_table<T: IntoIden + 'static>(table: T) -> TableCreateStatement {
    Table::create()
        .table(table)
        .if_not_exists()
        .col(ColumnDef::new(Gallery::Id).uuid().not_null().primary_key())
        .col(ColumnDef::new(Gallery::Description).text().not_null())
        .col(ColumnDef::new(Gallery::Image).string_len(255).not_null())
        .col(
            ColumnDef::new(Gallery::CreatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .to_owned()
}

#[derive(DeriveIden)]
enum Pictures {
    Table,
}

#[derive(DeriveIden)]
enum Sponsors {
    Table,
}

#[derive(DeriveIden)]
enum Gallery {
    Id,
    Description,
    Image,
    CreatedAt,
}
