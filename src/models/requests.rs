use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Service categories offered on the marketplace, stored as lowercase strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Categories {
    #[sea_orm(string_value = "plumbing")]
    Plumbing,
    #[sea_orm(string_value = "electrical")]
    Electrical,
    #[sea_orm(string_value = "carpentry")]
    Carpentry,
    #[sea_orm(string_value = "painting")]
    Painting,
    #[sea_orm(string_value = "cleaning")]
    Cleaning,
    #[sea_orm(string_value = "appliance_repair")]
    ApplianceRepair,
    #[sea_orm(string_value = "hvac")]
    Hvac,
    #[sea_orm(string_value = "landscaping")]
    Landscaping,
    #[sea_orm(string_value = "other")]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Urgency {
    #[sea_orm(string_value = "low")]
    Low,
    #[sea_orm(string_value = "medium")]
    Medium,
    #[sea_orm(string_value = "high")]
    High,
}

/// Preferred time-of-day window. A NULL column means the buyer is flexible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum TimeWindow {
    #[sea_orm(string_value = "morning")]
    Morning,
    #[sea_orm(string_value = "afternoon")]
    Afternoon,
    #[sea_orm(string_value = "evening")]
    Evening,
}

/// Request status. Status changes go through the lifecycle engine only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Status {
    #[sea_orm(string_value = "open")]
    Open,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// SeaORM entity for the `requests` table — a buyer's open job post.
///
/// Titles and descriptions are bilingual; at least one language pair must be
/// present. A NULL `preferred_date` means flexible/ASAP.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub buyer_id: Uuid,
    pub category: Categories,
    pub title_ar: Option<String>,
    pub title_en: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description_ar: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description_en: Option<String>,
    pub urgency: Urgency,
    pub city: String,
    pub address: Option<String>,
    pub preferred_date: Option<Date>,
    pub time_window: Option<TimeWindow>,
    #[sea_orm(column_type = "Double", nullable)]
    pub budget_min: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub budget_max: Option<f64>,
    pub status: Status,
    pub assigned_seller_id: Option<Uuid>,
    pub halted: bool,
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
    #[sea_orm(has_many = "super::quotes::Entity")]
    Quotes,
    #[sea_orm(has_many = "super::request_photos::Entity")]
    Photos,
}

impl Related<super::profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Buyer.def()
    }
}

impl Related<super::quotes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quotes.def()
    }
}

impl Related<super::request_photos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Photos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRequest {
    pub category: Categories,
    pub title_ar: Option<String>,
    pub title_en: Option<String>,
    pub description_ar: Option<String>,
    pub description_en: Option<String>,
    pub urgency: Option<Urgency>,
    pub city: String,
    pub address: Option<String>,
    pub preferred_date: Option<Date>,
    pub time_window: Option<TimeWindow>,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
}

/// Core-field edits. Only legal while the request has no live quotes.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRequest {
    pub category: Option<Categories>,
    pub title_ar: Option<String>,
    pub title_en: Option<String>,
    pub description_ar: Option<String>,
    pub description_en: Option<String>,
    pub urgency: Option<Urgency>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub preferred_date: Option<Date>,
    pub time_window: Option<TimeWindow>,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestListQuery {
    pub category: Option<Categories>,
    pub city: Option<String>,
    pub status: Option<Status>,
    pub limit: Option<u64>,
}

impl RequestListQuery {
    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(20).min(100)
    }
}
