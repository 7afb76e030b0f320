use std::fmt;
use std::str::FromStr;

use diesel::backend::Backend;
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::prelude::*;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::sqlite::Sqlite;
use serde::{Deserialize, Serialize};

use crate::errors::{MealError, MealResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    Low,
    Med,
    High,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Low => "LOW",
            Difficulty::Med => "MED",
            Difficulty::High => "HIGH",
        }
    }

    /// Multiplier applied to a meal's price when scoring it in a battle.
    pub fn weight(&self) -> f64 {
        match self {
            Difficulty::Low => 1.0,
            Difficulty::Med => 2.0,
            Difficulty::High => 3.0,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = MealError;

    fn from_str(value: &str) -> MealResult<Self> {
        match value {
            "LOW" => Ok(Difficulty::Low),
            "MED" => Ok(Difficulty::Med),
            "HIGH" => Ok(Difficulty::High),
            other => MealError::validation(format!(
                "Invalid difficulty level: {}. Must be 'LOW', 'MED', or 'HIGH'.",
                other
            )),
        }
    }
}

impl ToSql<Text, Sqlite> for Difficulty {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.as_str());
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for Difficulty {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let value = <String as FromSql<Text, Sqlite>>::from_sql(bytes)?;
        value.parse::<Difficulty>().map_err(|e| e.to_string().into())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = crate::repository::schema::meals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Meal {
    pub id: i32,
    pub meal: String,
    pub cuisine: String,
    pub price: f64,
    pub difficulty: Difficulty,
    pub battles: i32,
    pub wins: i32,
    pub deleted: bool,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::repository::schema::meals)]
pub struct NewMeal<'a> {
    pub meal: &'a str,
    pub cuisine: &'a str,
    pub price: f64,
    pub difficulty: Difficulty,
}

/// Outcome of a single battle from one meal's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleResult {
    Win,
    Loss,
}

impl FromStr for BattleResult {
    type Err = MealError;

    fn from_str(value: &str) -> MealResult<Self> {
        match value {
            "win" => Ok(BattleResult::Win),
            "loss" => Ok(BattleResult::Loss),
            other => MealError::validation(format!(
                "Invalid result: {}. Expected 'win' or 'loss'.",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    Wins,
    WinPct,
    Battles,
}

impl FromStr for SortBy {
    type Err = MealError;

    fn from_str(value: &str) -> MealResult<Self> {
        match value {
            "wins" => Ok(SortBy::Wins),
            "win_pct" => Ok(SortBy::WinPct),
            "battles" => Ok(SortBy::Battles),
            other => MealError::validation(format!("Invalid sort_by parameter: {}", other)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub id: i32,
    pub meal: String,
    pub cuisine: String,
    pub price: f64,
    pub difficulty: Difficulty,
    pub battles: i32,
    pub wins: i32,
    pub win_pct: f64,
}

impl From<Meal> for LeaderboardEntry {
    fn from(meal: Meal) -> Self {
        let win_pct = win_percentage(meal.wins, meal.battles);
        LeaderboardEntry {
            id: meal.id,
            meal: meal.meal,
            cuisine: meal.cuisine,
            price: meal.price,
            difficulty: meal.difficulty,
            battles: meal.battles,
            wins: meal.wins,
            win_pct,
        }
    }
}

/// Share of battles won, in percent, rounded to one decimal place.
pub fn win_percentage(wins: i32, battles: i32) -> f64 {
    if battles <= 0 {
        return 0.0;
    }
    (f64::from(wins) / f64::from(battles) * 1000.0).round() / 10.0
}
