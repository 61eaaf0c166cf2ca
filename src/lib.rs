// Library exports for photoview
// This allows integration tests and the CLI to use the client modules

pub mod api;
pub mod bootstrap;
pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod flows;
pub mod forms;
pub mod models;
pub mod session;
pub mod state;
pub mod view;
