mod app_state;
mod builder;

pub use app_state::AppState;
pub use builder::{StateBuildError, build_app_state};
