use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `contracts` table and its columns.
#[derive(DeriveIden)]
enum Contracts {
    Table,
    Id,
    BuyerId,
    SellerId,
    RequestId,
    QuoteId,
    BookingId,
    Status,
    SignedAtBuyer,
    SignedAtSeller,
    WarrantyDays,
    StartDate,
    CreatedAt,
    UpdatedAt,
}

/// Re-declare parent table identifiers for foreign-key references.
#[derive(DeriveIden)]
enum Profiles {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Requests {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Quotes {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Bookings {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Contracts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Contracts::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Contracts::BuyerId).uuid().not_null())
                    .col(ColumnDef::new(Contracts::SellerId).uuid().not_null())
                    .col(ColumnDef::new(Contracts::RequestId).uuid())
                    .col(ColumnDef::new(Contracts::QuoteId).uuid())
                    .col(ColumnDef::new(Contracts::BookingId).uuid())
                    .col(ColumnDef::new(Contracts::Status).string().not_null())
                    .col(ColumnDef::new(Contracts::SignedAtBuyer).timestamp_with_time_zone())
                    .col(ColumnDef::new(Contracts::SignedAtSeller).timestamp_with_time_zone())
                    .col(ColumnDef::new(Contracts::WarrantyDays).integer().not_null())
                    .col(ColumnDef::new(Contracts::StartDate).date())
                    .col(
                        ColumnDef::new(Contracts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Contracts::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contracts_buyer_id")
                            .from(Contracts::Table, Contracts::BuyerId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contracts_seller_id")
                            .from(Contracts::Table, Contracts::SellerId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contracts_request_id")
                            .from(Contracts::Table, Contracts::RequestId)
                            .to(Requests::Table, Requests::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contracts_quote_id")
                            .from(Contracts::Table, Contracts::QuoteId)
                            .to(Quotes::Table, Quotes::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contracts_booking_id")
                            .from(Contracts::Table, Contracts::BookingId)
                            .to(Bookings::Table, Bookings::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // At most one live contract per request and per booking. Backstop for
        // the compare-and-swap writes in the store: a racing duplicate insert
        // fails here instead of leaving two live contracts.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX uq_contracts_live_request \
                 ON contracts (request_id) \
                 WHERE request_id IS NOT NULL \
                   AND status IN ('draft', 'pending_buyer', 'pending_seller', 'executed')",
            )
            .await?;
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX uq_contracts_live_booking \
                 ON contracts (booking_id) \
                 WHERE booking_id IS NOT NULL \
                   AND status IN ('draft', 'pending_buyer', 'pending_seller', 'executed')",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Contracts::Table).to_owned())
            .await
    }
}
