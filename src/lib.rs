pub mod app;
pub mod bidding;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod marketplace;
pub mod query;
pub mod store;
