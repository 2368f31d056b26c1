pub mod app;
pub mod client;
pub mod config;
pub mod cron;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod options;
pub mod render;
pub mod state;
pub mod types;
pub mod ui;
pub mod validation;
