// Presentation layer - HTTP surface over the reliability service
pub mod app_state;
pub mod handlers;
pub mod router;
