pub mod api_client;
pub mod config;
pub mod indicators;
pub mod logging;
pub mod models;
pub mod report;
pub mod routes;
pub mod services;
pub mod state;
