pub mod project_health;
