pub mod budget;
pub mod config;
pub mod error;
pub mod form;
pub mod front;
pub mod migration;
pub mod models;
pub mod month;
pub mod store;
