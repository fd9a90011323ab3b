// Library exports for datecoach
// This allows integration tests to drive the router in-process

pub mod chat;
pub mod config;
pub mod error;
pub mod extractors;
pub mod models;
pub mod photos;
pub mod routes;
pub mod simulation;
pub mod state;
pub mod store;
