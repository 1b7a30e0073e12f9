pub mod achievements;
pub mod app;
pub mod config;
pub mod dashboard;
pub mod documents;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod seed;
pub mod stats;
pub mod storage;
pub mod ui;
pub mod state;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::{DocumentStore, FileStore, MemoryStore};
