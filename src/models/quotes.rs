use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Quote status stored as a lowercase string in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Status {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "negotiating")]
    Negotiating,
    #[sea_orm(string_value = "accepted")]
    Accepted,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl Status {
    /// Rejected is the only terminal quote status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Rejected)
    }

    /// A "live" quote counts toward the request's edit lock.
    pub fn is_live(&self) -> bool {
        !matches!(self, Status::Rejected)
    }
}

/// SeaORM entity for the `quotes` table — a seller's response to a request.
///
/// The proposed start date is a first-class column, never encoded into the
/// proposal text.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "quotes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub request_id: Uuid,
    pub seller_id: Uuid,
    #[sea_orm(column_type = "Double")]
    pub price: f64,
    pub estimated_days: i32,
    #[sea_orm(column_type = "Text")]
    pub proposal: String,
    pub proposed_start_date: Option<Date>,
    pub status: Status,
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
        belongs_to = "super::profiles::Entity",
        from = "Column::SellerId",
        to = "super::profiles::Column::Id"
    )]
    Seller,
    #[sea_orm(has_many = "super::negotiations::Entity")]
    Negotiations,
}

impl Related<super::requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Request.def()
    }
}

impl Related<super::profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Seller.def()
    }
}

impl Related<super::negotiations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Negotiations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
pub struct CreateQuote {
    pub price: f64,
    pub estimated_days: i32,
    pub proposal: String,
    pub proposed_start_date: Option<Date>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CounterOffer {
    pub price: Option<f64>,
    pub message: String,
}
