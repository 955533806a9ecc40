pub mod app;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod handlers;
pub mod levels;
pub mod loader;
pub mod models;
pub mod range;
pub mod source;
pub mod stats;
pub mod summary;
pub mod ui;
pub mod state;

pub use app::router;
pub use config::Config;
pub use state::AppState;
