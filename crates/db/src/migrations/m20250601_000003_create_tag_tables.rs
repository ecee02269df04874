//! Create tags and workshop_tags tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tag::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tag::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Tag::Name).string_len(50).not_null())
                    .col(
                        ColumnDef::new(Tag::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: name
        manager
            .create_index(
                Index::create()
                    .name("idx_tags_name")
                    .table(Tag::Table)
                    .col(Tag::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WorkshopTag::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(WorkshopTag::WorkshopId).string_len(32).not_null())
                    .col(ColumnDef::new(WorkshopTag::TagId).string_len(32).not_null())
                    .primary_key(
                        Index::create()
                            .col(WorkshopTag::WorkshopId)
                            .col(WorkshopTag::TagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_workshop_tags_workshop")
                            .from(WorkshopTag::Table, WorkshopTag::WorkshopId)
                            .to(Workshop::Table, Workshop::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_workshop_tags_tag")
                            .from(WorkshopTag::Table, WorkshopTag::TagId)
                            .to(Tag::Table, Tag::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WorkshopTag::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tag::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Tag {
    #[iden = "tags"]
    Table,
    Id,
    Name,
    CreatedAt,
}

#[derive(Iden)]
enum WorkshopTag {
    #[iden = "workshop_tags"]
    Table,
    WorkshopId,
    TagId,
}

#[derive(Iden)]
enum Workshop {
    #[iden = "workshops"]
    Table,
    Id,
}
