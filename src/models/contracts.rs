use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Contract status stored as a lowercase string in the database.
///
/// The status is exactly a function of the signature timestamps:
/// neither set ⇒ `draft`/`pending_buyer`, buyer set ⇒ `pending_seller`,
/// both set ⇒ `executed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Status {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "pending_buyer")]
    PendingBuyer,
    #[sea_orm(string_value = "pending_seller")]
    PendingSeller,
    #[sea_orm(string_value = "executed")]
    Executed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
    #[sea_orm(string_value = "terminated")]
    Terminated,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl Status {
    /// Terminal contracts no longer block a new contract on the same origin.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Cancelled | Status::Terminated | Status::Rejected)
    }

    /// A replaceable draft: created for a quote but not yet signed by anyone.
    pub fn is_unsigned_draft(&self) -> bool {
        matches!(self, Status::Draft | Status::PendingBuyer)
    }
}

/// SeaORM entity for the `contracts` table.
///
/// Exactly one origin is set: (`quote_id`, `request_id`) for marketplace
/// contracts, or `booking_id` for direct bookings.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contracts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub buyer_id: Uuid,
    pub seller_id: Uuid,
    pub request_id: Option<Uuid>,
    pub quote_id: Option<Uuid>,
    pub booking_id: Option<Uuid>,
    pub status: Status,
    pub signed_at_buyer: Option<DateTimeUtc>,
    pub signed_at_seller: Option<DateTimeUtc>,
    pub warranty_days: i32,
    pub start_date: Option<Date>,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::requests::Entity",
        from = "Column::RequestId",
        to = "super::requests::Column::Id"
    )]
    Request,
    #[sea_orm(
        belongs_to = "super::quotes::Entity",
        from = "Column::QuoteId",
        to = "super::quotes::Column::Id"
    )]
    Quote,
    #[sea_orm(
        belongs_to = "super::bookings::Entity",
        from = "Column::BookingId",
        to = "super::bookings::Column::Id"
    )]
    Booking,
}

impl Related<super::requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Request.def()
    }
}

impl Related<super::quotes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quote.def()
    }
}

impl Related<super::bookings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Booking.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Terms captured when a contract draft is created from an accepted quote
/// or booking.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractTerms {
    pub warranty_days: Option<i32>,
    pub start_date: Option<Date>,
}
