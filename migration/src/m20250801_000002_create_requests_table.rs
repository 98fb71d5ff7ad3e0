use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `requests` table and its columns.
#[derive(DeriveIden)]
enum Requests {
    Table,
    Id,
    BuyerId,
    Category,
    TitleAr,
    TitleEn,
    DescriptionAr,
    DescriptionEn,
    Urgency,
    City,
    Address,
    PreferredDate,
    TimeWindow,
    BudgetMin,
    BudgetMax,
    Status,
    AssignedSellerId,
    Halted,
    BuyerMarkedComplete,
    SellerMarkedComplete,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum RequestPhotos {
    Table,
    Id,
    RequestId,
    Url,
    Position,
    CreatedAt,
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
                    .table(Requests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Requests::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Requests::BuyerId).uuid().not_null())
                    .col(ColumnDef::new(Requests::Category).string().not_null())
                    .col(ColumnDef::new(Requests::TitleAr).string())
                    .col(ColumnDef::new(Requests::TitleEn).string())
                    .col(ColumnDef::new(Requests::DescriptionAr).text())
                    .col(ColumnDef::new(Requests::DescriptionEn).text())
                    .col(ColumnDef::new(Requests::Urgency).string().not_null())
                    .col(ColumnDef::new(Requests::City).string().not_null())
                    .col(ColumnDef::new(Requests::Address).string())
                    .col(ColumnDef::new(Requests::PreferredDate).date())
                    .col(ColumnDef::new(Requests::TimeWindow).string())
                    .col(ColumnDef::new(Requests::BudgetMin).double())
                    .col(ColumnDef::new(Requests::BudgetMax).double())
                    .col(ColumnDef::new(Requests::Status).string().not_null())
                    .col(ColumnDef::new(Requests::AssignedSellerId).uuid())
                    .col(
                        ColumnDef::new(Requests::Halted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Requests::BuyerMarkedComplete)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Requests::SellerMarkedComplete)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Requests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Requests::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_requests_buyer_id")
                            .from(Requests::Table, Requests::BuyerId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_requests_assigned_seller_id")
                            .from(Requests::Table, Requests::AssignedSellerId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RequestPhotos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RequestPhotos::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RequestPhotos::RequestId).uuid().not_null())
                    .col(ColumnDef::new(RequestPhotos::Url).string().not_null())
                    .col(ColumnDef::new(RequestPhotos::Position).integer().not_null())
                    .col(
                        ColumnDef::new(RequestPhotos::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_request_photos_request_id")
                            .from(RequestPhotos::Table, RequestPhotos::RequestId)
                            .to(Requests::Table, Requests::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RequestPhotos::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Requests::Table).to_owned())
            .await
    }
}
