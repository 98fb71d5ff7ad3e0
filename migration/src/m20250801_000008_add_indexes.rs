use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Requests {
    Table,
    BuyerId,
    AssignedSellerId,
    Status,
    City,
}

#[derive(DeriveIden)]
enum Quotes {
    Table,
    RequestId,
    SellerId,
}

#[derive(DeriveIden)]
enum Bookings {
    Table,
    BuyerId,
    SellerId,
}

#[derive(DeriveIden)]
enum Negotiations {
    Table,
    QuoteId,
}

#[derive(DeriveIden)]
enum Notifications {
    Table,
    UserId,
    Read,
}

#[derive(DeriveIden)]
enum Drafts {
    Table,
    OwnerId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Browse feed filters on status and city
        manager
            .create_index(
                Index::create()
                    .name("idx_requests_status_city")
                    .table(Requests::Table)
                    .col(Requests::Status)
                    .col(Requests::City)
                    .to_owned(),
            )
            .await?;

        // Index on requests.buyer_id for a buyer's own requests
        manager
            .create_index(
                Index::create()
                    .name("idx_requests_buyer_id")
                    .table(Requests::Table)
                    .col(Requests::BuyerId)
                    .to_owned(),
            )
            .await?;

        // Index on requests.assigned_seller_id for the seller's job list
        manager
            .create_index(
                Index::create()
                    .name("idx_requests_assigned_seller_id")
                    .table(Requests::Table)
                    .col(Requests::AssignedSellerId)
                    .to_owned(),
            )
            .await?;

        // Index on quotes.request_id for fetching quotes by request
        manager
            .create_index(
                Index::create()
                    .name("idx_quotes_request_id")
                    .table(Quotes::Table)
                    .col(Quotes::RequestId)
                    .to_owned(),
            )
            .await?;

        // Index on quotes.seller_id for a seller's own quotes
        manager
            .create_index(
                Index::create()
                    .name("idx_quotes_seller_id")
                    .table(Quotes::Table)
                    .col(Quotes::SellerId)
                    .to_owned(),
            )
            .await?;

        // Index on bookings.buyer_id for the buyer's bookings
        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_buyer_id")
                    .table(Bookings::Table)
                    .col(Bookings::BuyerId)
                    .to_owned(),
            )
            .await?;

        // Index on bookings.seller_id for the seller's inbox
        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_seller_id")
                    .table(Bookings::Table)
                    .col(Bookings::SellerId)
                    .to_owned(),
            )
            .await?;

        // Index on negotiations.quote_id for the counter-offer thread
        manager
            .create_index(
                Index::create()
                    .name("idx_negotiations_quote_id")
                    .table(Negotiations::Table)
                    .col(Negotiations::QuoteId)
                    .to_owned(),
            )
            .await?;

        // Unread-badge query: notifications by user and read flag
        manager
            .create_index(
                Index::create()
                    .name("idx_notifications_user_id_read")
                    .table(Notifications::Table)
                    .col(Notifications::UserId)
                    .col(Notifications::Read)
                    .to_owned(),
            )
            .await?;

        // Index on drafts.owner_id for the owner's draft list
        manager
            .create_index(
                Index::create()
                    .name("idx_drafts_owner_id")
                    .table(Drafts::Table)
                    .col(Drafts::OwnerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_requests_status_city").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_requests_buyer_id").to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_requests_assigned_seller_id")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(Index::drop().name("idx_quotes_request_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_quotes_seller_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_bookings_buyer_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_bookings_seller_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_negotiations_quote_id").to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_notifications_user_id_read")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(Index::drop().name("idx_drafts_owner_id").to_owned())
            .await?;

        Ok(())
    }
}
