use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sqlite::SqliteConnection;
use log::{error, info, warn};

use crate::errors::{MealError, MealResult};
use crate::models::meal::{BattleResult, Difficulty, LeaderboardEntry, Meal, NewMeal, SortBy};
use crate::repository::database::Database;
use crate::repository::schema::meals;

pub fn create_meal(
    db: &Database,
    meal: &str,
    cuisine: &str,
    price: f64,
    difficulty: &str,
) -> MealResult<Meal> {
    if !price.is_finite() || price <= 0.0 {
        return MealError::validation(format!(
            "Invalid price: {}. Price must be a positive number.",
            price
        ));
    }
    let difficulty: Difficulty = difficulty.parse()?;

    let mut connection = db.get_connection()?;
    let new_meal = NewMeal {
        meal,
        cuisine,
        price,
        difficulty,
    };
    diesel::insert_into(meals::table)
        .values(&new_meal)
        .execute(&mut connection)
        .map_err(|e| match e {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                error!("Duplicate meal name: {}", meal);
                MealError::Conflict(format!("Meal with name '{}' already exists", meal))
            }
            other => other.into(),
        })?;

    let created = meals::table
        .filter(meals::meal.eq(meal))
        .select(Meal::as_select())
        .first::<Meal>(&mut connection)?;
    info!("Meal successfully added to the database: {}", meal);
    Ok(created)
}

pub fn clear_meals(db: &Database) -> MealResult<()> {
    db.recreate_tables()?;
    info!("Meals cleared successfully.");
    Ok(())
}

pub fn delete_meal(db: &Database, meal_id: i32) -> MealResult<()> {
    let mut connection = db.get_connection()?;

    let already_deleted = meals::table
        .find(meal_id)
        .select(meals::deleted)
        .first::<bool>(&mut connection)
        .optional()?;
    match already_deleted {
        None => {
            info!("Meal with ID {} not found", meal_id);
            MealError::not_found(format!("Meal with ID {} not found", meal_id))
        }
        Some(true) => {
            info!("Meal with ID {} has already been deleted", meal_id);
            MealError::conflict(format!("Meal with ID {} has already been deleted", meal_id))
        }
        Some(false) => {
            diesel::update(meals::table.find(meal_id))
                .set(meals::deleted.eq(true))
                .execute(&mut connection)?;
            info!("Meal with ID {} marked as deleted.", meal_id);
            Ok(())
        }
    }
}

pub fn get_meal_by_id(db: &Database, meal_id: i32) -> MealResult<Meal> {
    let mut connection = db.get_connection()?;
    let found = meals::table
        .find(meal_id)
        .select(Meal::as_select())
        .first::<Meal>(&mut connection)
        .optional()?;

    match found {
        Some(meal) if meal.deleted => {
            info!("Meal with ID {} has been deleted", meal_id);
            MealError::not_found(format!("Meal with ID {} has been deleted", meal_id))
        }
        Some(meal) => Ok(meal),
        None => {
            info!("Meal with ID {} not found", meal_id);
            MealError::not_found(format!("Meal with ID {} not found", meal_id))
        }
    }
}

pub fn get_meal_by_name(db: &Database, meal_name: &str) -> MealResult<Meal> {
    let mut connection = db.get_connection()?;
    let found = meals::table
        .filter(meals::meal.eq(meal_name))
        .select(Meal::as_select())
        .first::<Meal>(&mut connection)
        .optional()?;

    match found {
        Some(meal) if meal.deleted => {
            info!("Meal with name {} has been deleted", meal_name);
            MealError::not_found(format!("Meal with name {} has been deleted", meal_name))
        }
        Some(meal) => Ok(meal),
        None => {
            info!("Meal with name {} not found", meal_name);
            MealError::not_found(format!("Meal with name {} not found", meal_name))
        }
    }
}

pub fn update_meal_stats(db: &Database, meal_id: i32, result: BattleResult) -> MealResult<()> {
    let mut connection = db.get_connection()?;
    apply_meal_stats(&mut connection, meal_id, result)
}

/// Credits the winner and the loser of one battle; either both updates land
/// or neither does.
pub fn record_battle(db: &Database, winner_id: i32, loser_id: i32) -> MealResult<()> {
    let mut connection = db.get_connection()?;
    connection.immediate_transaction::<_, MealError, _>(|connection| {
        apply_meal_stats(connection, winner_id, BattleResult::Win)?;
        apply_meal_stats(connection, loser_id, BattleResult::Loss)
    })
}

fn apply_meal_stats(
    connection: &mut SqliteConnection,
    meal_id: i32,
    result: BattleResult,
) -> MealResult<()> {
    let deleted = meals::table
        .find(meal_id)
        .select(meals::deleted)
        .first::<bool>(connection)
        .optional()?;
    match deleted {
        None => {
            warn!("Meal with ID {} not found", meal_id);
            return MealError::not_found(format!("Meal with ID {} not found", meal_id));
        }
        Some(true) => {
            warn!("Meal with ID {} has been deleted", meal_id);
            return MealError::not_found(format!("Meal with ID {} has been deleted", meal_id));
        }
        Some(false) => {}
    }

    let target = meals::table.find(meal_id);
    match result {
        BattleResult::Win => diesel::update(target)
            .set((
                meals::battles.eq(meals::battles + 1),
                meals::wins.eq(meals::wins + 1),
            ))
            .execute(connection)?,
        BattleResult::Loss => diesel::update(target)
            .set(meals::battles.eq(meals::battles + 1))
            .execute(connection)?,
    };
    info!("Updated stats for meal with ID {}: {:?}", meal_id, result);
    Ok(())
}

/// Non-deleted meals ranked in descending order of `sort_by`; ties keep
/// ascending id order.
pub fn get_leaderboard(db: &Database, sort_by: SortBy) -> MealResult<Vec<LeaderboardEntry>> {
    let mut connection = db.get_connection()?;
    let rows = meals::table
        .filter(meals::deleted.eq(false))
        .order(meals::id.asc())
        .select(Meal::as_select())
        .load::<Meal>(&mut connection)?;

    let mut leaderboard: Vec<LeaderboardEntry> =
        rows.into_iter().map(LeaderboardEntry::from).collect();
    match sort_by {
        SortBy::Wins => leaderboard.sort_by(|a, b| b.wins.cmp(&a.wins)),
        SortBy::Battles => leaderboard.sort_by(|a, b| b.battles.cmp(&a.battles)),
        SortBy::WinPct => leaderboard.sort_by(|a, b| b.win_pct.total_cmp(&a.win_pct)),
    }
    info!("Leaderboard retrieved successfully ({} entries)", leaderboard.len());
    Ok(leaderboard)
}
