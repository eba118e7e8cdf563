pub mod api;
pub mod config;
pub mod connectors;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
