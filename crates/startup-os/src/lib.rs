pub mod config;
pub mod domain;
pub mod error;
pub mod health;
pub mod matching;
pub mod normalize;
pub mod router;
pub mod service;
pub mod store;
pub mod telemetry;

pub use health::{compute_health_score, HealthReport};
pub use matching::{rank_matches, RankedProfile};
