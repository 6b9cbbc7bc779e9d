pub mod config;
pub mod deal_client;
pub mod deal_store;
pub mod digest;
pub mod domain;
pub mod email_client;
pub mod routes;
pub mod startup;
pub mod subscriber_store;
pub mod telemetry;
