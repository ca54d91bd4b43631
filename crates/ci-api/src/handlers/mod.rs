pub mod analytics;
pub mod health;
pub mod intelligence;
pub mod jobs;
pub mod reports;
pub mod risk;
