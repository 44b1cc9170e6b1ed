pub mod app;
pub mod client;
pub mod config;
pub mod console;
pub mod directory;
pub mod edit;
pub mod errors;
pub mod form;
pub mod handlers;
pub mod models;
pub mod state;
pub mod stats;
pub mod ui;

pub use app::router;
pub use client::{HttpLinkService, LinkService};
pub use config::Config;
pub use state::AppState;
