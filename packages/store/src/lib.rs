pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod migration;
pub mod models;
pub mod repository;
pub mod seed;
pub mod telemetry;
pub mod utils;

pub use error::StoreError;
