// Application layer - Detection, metrics and fleet use cases
pub mod comparison_engine;
pub mod event_detector;
pub mod fleet_aggregator;
pub mod metrics_aggregator;
pub mod reading_source;
pub mod reason_classifier;
pub mod reliability_service;
