use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `bookings` table and its columns.
#[derive(DeriveIden)]
enum Bookings {
    Table,
    Id,
    BuyerId,
    SellerId,
    Category,
    Description,
    StartDate,
    EndDate,
    TimeWindow,
    BudgetMin,
    BudgetMax,
    City,
    Address,
    Status,
    SellerResponse,
    BuyerMarkedComplete,
    SellerMarkedComplete,
    CreatedAt,
    UpdatedAt,
}

/// Re-declare parent table identifiers for foreign-key references.
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
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bookings::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bookings::BuyerId).uuid().not_null())
                    .col(ColumnDef::new(Bookings::SellerId).uuid().not_null())
                    .col(ColumnDef::new(Bookings::Category).string().not_null())
                    .col(ColumnDef::new(Bookings::Description).text().not_null())
                    .col(ColumnDef::new(Bookings::StartDate).date())
                    .col(ColumnDef::new(Bookings::EndDate).date())
                    .col(ColumnDef::new(Bookings::TimeWindow).string())
                    .col(ColumnDef::new(Bookings::BudgetMin).double())
                    .col(ColumnDef::new(Bookings::BudgetMax).double())
                    .col(ColumnDef::new(Bookings::City).string().not_null())
                    .col(ColumnDef::new(Bookings::Address).string())
                    .col(ColumnDef::new(Bookings::Status).string().not_null())
                    .col(ColumnDef::new(Bookings::SellerResponse).text())
                    .col(
                        ColumnDef::new(Bookings::BuyerMarkedComplete)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Bookings::SellerMarkedComplete)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Bookings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Bookings::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_buyer_id")
                            .from(Bookings::Table, Bookings::BuyerId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_seller_id")
                            .from(Bookings::Table, Bookings::SellerId)
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
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await
    }
}
