//! Create registrations table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Registration::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Registration::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Registration::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Registration::WorkshopId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Registration::RegistrationType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Registration::Status)
                            .string_len(30)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Registration::PaymentStatus)
                            .string_len(30)
                            .not_null()
                            .default("not_required"),
                    )
                    .col(ColumnDef::new(Registration::PaymentMethod).string_len(20))
                    .col(ColumnDef::new(Registration::TransactionId).string_len(100))
                    .col(ColumnDef::new(Registration::UpiId).string_len(100))
                    .col(ColumnDef::new(Registration::PaymentScreenshotUrl).string_len(500))
                    .col(ColumnDef::new(Registration::Notes).text())
                    .col(ColumnDef::new(Registration::AdminNotes).text())
                    .col(
                        ColumnDef::new(Registration::RegisteredAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Registration::ConfirmedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_registrations_user")
                            .from(Registration::Table, Registration::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_registrations_workshop")
                            .from(Registration::Table, Registration::WorkshopId)
                            .to(Workshop::Table, Workshop::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (user_id, workshop_id) - at most one registration per pair
        manager
            .create_index(
                Index::create()
                    .name("idx_registrations_user_workshop")
                    .table(Registration::Table)
                    .col(Registration::UserId)
                    .col(Registration::WorkshopId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: workshop_id (per-workshop listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_registrations_workshop_id")
                    .table(Registration::Table)
                    .col(Registration::WorkshopId)
                    .to_owned(),
            )
            .await?;

        // Index: status (pending-review queue)
        manager
            .create_index(
                Index::create()
                    .name("idx_registrations_status")
                    .table(Registration::Table)
                    .col(Registration::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Registration::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Registration {
    #[iden = "registrations"]
    Table,
    Id,
    UserId,
    WorkshopId,
    RegistrationType,
    Status,
    PaymentStatus,
    PaymentMethod,
    TransactionId,
    UpiId,
    PaymentScreenshotUrl,
    Notes,
    AdminNotes,
    RegisteredAt,
    ConfirmedAt,
}

#[derive(Iden)]
enum User {
    #[iden = "users"]
    Table,
    Id,
}

#[derive(Iden)]
enum Workshop {
    #[iden = "workshops"]
    Table,
    Id,
}
