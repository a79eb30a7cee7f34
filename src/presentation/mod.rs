pub mod config;
pub mod handlers;
pub mod router;
pub mod state;

pub use config::{Environment, ScaffoldConfig, Settings, SettingsError};
pub use router::create_router;
pub use state::{AppState, StateBuildError, build_app_state};
