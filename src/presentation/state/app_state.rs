use std::sync::Arc;

use crate::application::services::ReplyPipeline;
use crate::presentation::config::Settings;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ReplyPipeline>,
    pub settings: Settings,
}
