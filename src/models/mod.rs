pub mod bookings;
pub mod contracts;
pub mod drafts;
pub mod negotiations;
pub mod notifications;
pub mod profiles;
pub mod quotes;
pub mod request_photos;
pub mod requests;
