use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// What a notification is about; drives which screen the client opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Kind {
    #[sea_orm(string_value = "quote_received")]
    QuoteReceived,
    #[sea_orm(string_value = "quote_accepted")]
    QuoteAccepted,
    #[sea_orm(string_value = "quote_rejected")]
    QuoteRejected,
    #[sea_orm(string_value = "negotiation_message")]
    NegotiationMessage,
    #[sea_orm(string_value = "booking_update")]
    BookingUpdate,
    #[sea_orm(string_value = "contract_ready")]
    ContractReady,
    #[sea_orm(string_value = "contract_executed")]
    ContractExecuted,
    #[sea_orm(string_value = "contract_voided")]
    ContractVoided,
    #[sea_orm(string_value = "completion_requested")]
    CompletionRequested,
    #[sea_orm(string_value = "job_completed")]
    JobCompleted,
}

/// SeaORM entity for the `notifications` table.
///
/// Rows are written by the effect dispatcher; delivery failure is never
/// allowed to fail the transition that produced the notification.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub kind: Kind,
    pub content_id: Option<Uuid>,
    pub read: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::UserId",
        to = "super::profiles::Column::Id"
    )]
    User,
}

impl Related<super::profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
