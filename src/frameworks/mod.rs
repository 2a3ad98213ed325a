// Frameworks layer: runtime configuration and process bootstrap.

pub mod app;
pub mod config;
