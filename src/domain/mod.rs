// Domain layer - Plain data types shared by every other layer
pub mod downtime;
pub mod error;
pub mod metrics;
pub mod mill;
pub mod reading;
pub mod report;
pub mod window;
