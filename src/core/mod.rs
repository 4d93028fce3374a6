pub mod aggregator;
pub mod billing;
pub mod config;
pub mod formatter;
pub mod models;
pub mod money;
pub mod notify;
pub mod orchestrator;
pub mod persister;
pub mod store;
pub mod synthetic;
