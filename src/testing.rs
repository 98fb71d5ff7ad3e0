//! Snapshot fixtures shared by unit and integration tests.

use chrono::Utc;
use uuid::Uuid;

use crate::models::requests::{Categories, Urgency};
use crate::models::{bookings, contracts, quotes, requests};

pub fn request_fixture(status: requests::Status) -> requests::Model {
    requests::Model {
        id: Uuid::new_v4(),
        buyer_id: Uuid::new_v4(),
        category: Categories::Plumbing,
        title_ar: Some("تسريب في المطبخ".to_string()),
        title_en: Some("Kitchen leak".to_string()),
        description_ar: None,
        description_en: Some("Leaking pipe under the kitchen sink".to_string()),
        urgency: Urgency::High,
        city: "Riyadh".to_string(),
        address: None,
        preferred_date: None,
        time_window: None,
        budget_min: Some(100.0),
        budget_max: Some(500.0),
        status,
        assigned_seller_id: None,
        halted: false,
        buyer_marked_complete: false,
        seller_marked_complete: false,
        created_at: Utc::now(),
        updated_at: None,
    }
}

pub fn quote_fixture(request_id: Uuid, status: quotes::Status) -> quotes::Model {
    quotes::Model {
        id: Uuid::new_v4(),
        request_id,
        seller_id: Uuid::new_v4(),
        price: 250.0,
        estimated_days: 2,
        proposal: "Replace the trap and reseal the joints".to_string(),
        proposed_start_date: None,
        status,
        created_at: Utc::now(),
        updated_at: None,
    }
}

pub fn booking_fixture(status: bookings::Status) -> bookings::Model {
    bookings::Model {
        id: Uuid::new_v4(),
        buyer_id: Uuid::new_v4(),
        seller_id: Uuid::new_v4(),
        category: Categories::Cleaning,
        description: "Deep clean, two-bedroom apartment".to_string(),
        start_date: None,
        end_date: None,
        time_window: None,
        budget_min: None,
        budget_max: Some(400.0),
        city: "Jeddah".to_string(),
        address: None,
        status,
        seller_response: None,
        buyer_marked_complete: false,
        seller_marked_complete: false,
        created_at: Utc::now(),
        updated_at: None,
    }
}

pub fn contract_fixture(
    buyer_id: Uuid,
    seller_id: Uuid,
    status: contracts::Status,
) -> contracts::Model {
    let signed_at_buyer = match status {
        contracts::Status::PendingSeller | contracts::Status::Executed => Some(Utc::now()),
        _ => None,
    };
    let signed_at_seller = match status {
        contracts::Status::Executed => Some(Utc::now()),
        _ => None,
    };
    contracts::Model {
        id: Uuid::new_v4(),
        buyer_id,
        seller_id,
        request_id: None,
        quote_id: None,
        booking_id: None,
        status,
        signed_at_buyer,
        signed_at_seller,
        warranty_days: 30,
        start_date: None,
        created_at: Utc::now(),
        updated_at: None,
    }
}
