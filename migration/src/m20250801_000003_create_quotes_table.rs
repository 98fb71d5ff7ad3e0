use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `quotes` table and its columns.
#[derive(DeriveIden)]
enum Quotes {
    Table,
    Id,
    RequestId,
    SellerId,
    Price,
    EstimatedDays,
    Proposal,
    ProposedStartDate,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Negotiations {
    Table,
    Id,
    QuoteId,
    AuthorId,
    Price,
    Message,
    CreatedAt,
}

/// Re-declare parent table identifiers for foreign-key references.
#[derive(DeriveIden)]
enum Requests {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Profiles {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Quotes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Quotes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Quotes::RequestId).uuid().not_null())
                    .col(ColumnDef::new(Quotes::SellerId).uuid().not_null())
                    .col(ColumnDef::new(Quotes::Price).double().not_null())
                    .col(ColumnDef::new(Quotes::EstimatedDays).integer().not_null())
                    .col(ColumnDef::new(Quotes::Proposal).text().not_null())
                    .col(ColumnDef::new(Quotes::ProposedStartDate).date())
                    .col(ColumnDef::new(Quotes::Status).string().not_null())
                    .col(
                        ColumnDef::new(Quotes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Quotes::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_quotes_request_id")
                            .from(Quotes::Table, Quotes::RequestId)
                            .to(Requests::Table, Requests::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_quotes_seller_id")
                            .from(Quotes::Table, Quotes::SellerId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // At most one live quote per seller per request; a rejected quote
        // may be replaced by a new one, so the constraint is partial.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX uq_quotes_live_request_seller \
                 ON quotes (request_id, seller_id) \
                 WHERE status IN ('pending', 'negotiating', 'accepted')",
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Negotiations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Negotiations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Negotiations::QuoteId).uuid().not_null())
                    .col(ColumnDef::new(Negotiations::AuthorId).uuid().not_null())
                    .col(ColumnDef::new(Negotiations::Price).double())
                    .col(ColumnDef::new(Negotiations::Message).text().not_null())
                    .col(
                        ColumnDef::new(Negotiations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_negotiations_quote_id")
                            .from(Negotiations::Table, Negotiations::QuoteId)
                            .to(Quotes::Table, Quotes::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_negotiations_author_id")
                            .from(Negotiations::Table, Negotiations::AuthorId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Negotiations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Quotes::Table).to_owned())
            .await
    }
}
