// Library exports for Spice Heritage
// This allows integration tests and the binary to share the modules

pub mod auth;
pub mod backend;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;
pub mod views;
