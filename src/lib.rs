pub mod api;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod observability;
pub mod reference;
pub mod services;
pub mod store;
