pub mod database;
pub mod meal_repository;
pub mod schema;
