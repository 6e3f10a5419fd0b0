pub mod config;
pub mod health_trend;
pub mod project_health;
