use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::requests::{Categories, TimeWindow};

/// Booking status stored as a lowercase string in the database.
///
/// `counter_proposed` is a seller counter; `buyer_countered` is the buyer's
/// counter to that. Both keep the negotiation alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Status {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "accepted")]
    Accepted,
    #[sea_orm(string_value = "counter_proposed")]
    CounterProposed,
    #[sea_orm(string_value = "buyer_countered")]
    BuyerCountered,
    #[sea_orm(string_value = "declined")]
    Declined,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
    #[sea_orm(string_value = "completed")]
    Completed,
}

impl Status {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Declined | Status::Cancelled | Status::Completed)
    }

    /// States in which the seller may still answer.
    pub fn awaits_seller(&self) -> bool {
        matches!(self, Status::Pending | Status::BuyerCountered)
    }
}

/// SeaORM entity for the `bookings` table — a buyer's direct request to a
/// specific seller, bypassing the open marketplace.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub buyer_id: Uuid,
    pub seller_id: Uuid,
    pub category: Categories,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub time_window: Option<TimeWindow>,
    #[sea_orm(column_type = "Double", nullable)]
    pub budget_min: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub budget_max: Option<f64>,
    pub city: String,
    pub address: Option<String>,
    pub status: Status,
    #[sea_orm(column_type = "Text", nullable)]
    pub seller_response: Option<String>,
    pub buyer_marked_complete: bool,
    pub seller_marked_complete: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::BuyerId",
        to = "super::profiles::Column::Id"
    )]
    Buyer,
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::SellerId",
        to = "super::profiles::Column::Id"
    )]
    Seller,
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBooking {
    pub seller_id: Uuid,
    pub category: Categories,
    pub description: String,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub time_window: Option<TimeWindow>,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
    pub city: String,
    pub address: Option<String>,
}

/// Seller's answer to a pending (or buyer-countered) booking.
#[derive(Debug, Clone, Deserialize)]
pub struct SellerResponse {
    pub action: SellerAction,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SellerAction {
    Accept,
    Decline,
    Counter,
}

/// Buyer's counter to a seller counter-proposal: revised terms only, any
/// field left out keeps its current value.
#[derive(Debug, Clone, Deserialize)]
pub struct BuyerCounter {
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
}
