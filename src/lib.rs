// Mill reliability engine - downtime detection and fleet metrics
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
