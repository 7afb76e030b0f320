pub mod battle;
pub mod meal;
