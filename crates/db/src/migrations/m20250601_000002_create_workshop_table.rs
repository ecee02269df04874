//! Create workshops table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Workshop::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Workshop::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Workshop::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Workshop::Description).text())
                    .col(ColumnDef::new(Workshop::Organizer).string_len(100).not_null())
                    .col(ColumnDef::new(Workshop::OrganizerUserId).string_len(32))
                    .col(ColumnDef::new(Workshop::Instructor).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Workshop::Date)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Workshop::Time).string_len(20).not_null())
                    .col(ColumnDef::new(Workshop::Location).string_len(200).not_null())
                    .col(ColumnDef::new(Workshop::City).string_len(50).not_null())
                    .col(ColumnDef::new(Workshop::Category).string_len(50).not_null())
                    .col(ColumnDef::new(Workshop::Level).string_len(20).not_null())
                    .col(ColumnDef::new(Workshop::Duration).string_len(20).not_null())
                    .col(ColumnDef::new(Workshop::Price).double().not_null().default(0.0))
                    .col(ColumnDef::new(Workshop::MaxSeats).integer().not_null())
                    .col(ColumnDef::new(Workshop::AvailableSeats).integer().not_null())
                    .col(
                        ColumnDef::new(Workshop::Mode)
                            .string_len(20)
                            .not_null()
                            .default("manual"),
                    )
                    .col(
                        ColumnDef::new(Workshop::Status)
                            .string_len(20)
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(Workshop::Featured).boolean().not_null().default(false))
                    .col(ColumnDef::new(Workshop::ImageUrl).string_len(500))
                    .col(ColumnDef::new(Workshop::Prerequisites).json_binary())
                    .col(ColumnDef::new(Workshop::WhatYouLearn).json_binary())
                    .col(ColumnDef::new(Workshop::Agenda).json_binary())
                    .col(
                        ColumnDef::new(Workshop::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Workshop::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_workshops_organizer_user")
                            .from(Workshop::Table, Workshop::OrganizerUserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: organizer_user_id (enterprise listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_workshops_organizer_user_id")
                    .table(Workshop::Table)
                    .col(Workshop::OrganizerUserId)
                    .to_owned(),
            )
            .await?;

        // Index: status (active listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_workshops_status")
                    .table(Workshop::Table)
                    .col(Workshop::Status)
                    .to_owned(),
            )
            .await?;

        // Index: city + category (common filter combination)
        manager
            .create_index(
                Index::create()
                    .name("idx_workshops_city_category")
                    .table(Workshop::Table)
                    .col(Workshop::City)
                    .col(Workshop::Category)
                    .to_owned(),
            )
            .await?;

        // Index: created_at (default sort)
        manager
            .create_index(
                Index::create()
                    .name("idx_workshops_created_at")
                    .table(Workshop::Table)
                    .col(Workshop::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Workshop::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Workshop {
    #[iden = "workshops"]
    Table,
    Id,
    Title,
    Description,
    Organizer,
    OrganizerUserId,
    Instructor,
    Date,
    Time,
    Location,
    City,
    Category,
    Level,
    Duration,
    Price,
    MaxSeats,
    AvailableSeats,
    Mode,
    Status,
    Featured,
    ImageUrl,
    Prerequisites,
    WhatYouLearn,
    Agenda,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    #[iden = "users"]
    Table,
    Id,
}
