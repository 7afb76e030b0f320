pub mod battle_apis;
pub mod config;
pub mod health_apis;
pub mod meal_apis;
