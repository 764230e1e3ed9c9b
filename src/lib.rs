pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod form;
pub mod location;
pub mod models;
pub mod pipeline;
pub mod routes;
pub mod state;
pub mod views;

pub use app::AppState;
pub use config::Config;
