pub mod auth;
pub mod cache;
pub mod db;
pub mod dispatch;
pub mod domain;
pub mod events;
pub mod handlers;
pub mod models;
pub mod storage;
pub mod testing;

pub use db::create_pool;
