// Library exports for the binaries and integration tests
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod views;
