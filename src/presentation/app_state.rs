// Application state for HTTP handlers
use crate::application::reliability_service::ReliabilityService;

#[derive(Clone)]
pub struct AppState {
    pub reliability_service: ReliabilityService,
}
