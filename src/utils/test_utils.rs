use async_trait::async_trait;
use diesel::prelude::*;

use crate::errors::MealResult;
use crate::models::meal::Meal;
use crate::repository::database::Database;
use crate::repository::meal_repository;
use crate::repository::schema::meals;
use crate::utils::random_utils::RandomSource;

pub fn init_test_meals(db: &Database) -> Vec<Meal> {
    let data = [
        ("Spaghetti", "Italian", 12.5, "MED"),
        ("Ramen", "Japanese", 9.0, "HIGH"),
        ("Tacos", "Mexican", 6.0, "LOW"),
        ("Pierogi", "Polish", 8.25, "MED"),
    ];

    data.iter()
        .map(|(name, cuisine, price, difficulty)| {
            meal_repository::create_meal(db, name, cuisine, *price, difficulty)
                .expect("Error creating test meal")
        })
        .collect()
}

/// Overwrites a meal's counters without going through battles.
pub fn record_battles(db: &Database, meal_id: i32, battles: i32, wins: i32) {
    let mut connection = db.get_connection().expect("Error getting test connection");
    diesel::update(meals::table.find(meal_id))
        .set((meals::battles.eq(battles), meals::wins.eq(wins)))
        .execute(&mut connection)
        .expect("Error recording test battles");
}

/// Random source that always answers with the same fraction.
pub struct FixedRandom(pub f64);

#[async_trait]
impl RandomSource for FixedRandom {
    async fn get_random(&self) -> MealResult<f64> {
        Ok(self.0)
    }
}
