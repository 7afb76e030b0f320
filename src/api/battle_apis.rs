use std::sync::{Mutex, MutexGuard, PoisonError};

use actix_web::{delete, get, post, web, HttpResponse};
use log::info;
use serde::{Deserialize, Serialize};

use crate::errors::{MealError, MealResult};
use crate::models::battle::{BattleModel, MAX_COMBATANTS};
use crate::repository::database::Database;
use crate::repository::meal_repository;
use crate::utils::random_utils::RandomSource;

#[derive(Serialize, Deserialize)]
pub struct PrepCombatantRequest {
    meal: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct BattleResponse {
    pub winner: String,
}

fn lock_model(battle_model: &Mutex<BattleModel>) -> MutexGuard<'_, BattleModel> {
    battle_model.lock().unwrap_or_else(PoisonError::into_inner)
}

#[post("/combatants")]
pub async fn prep_combatant(
    db: web::Data<Database>,
    battle_model: web::Data<Mutex<BattleModel>>,
    prep_request: web::Json<PrepCombatantRequest>,
) -> MealResult<HttpResponse> {
    let meal_name = match &prep_request.meal {
        Some(name) => name,
        None => return MealError::validation("Meal name is required"),
    };

    let meal = meal_repository::get_meal_by_name(&db, meal_name)?;
    let mut battle_model = lock_model(&battle_model);
    battle_model.prep_combatant(meal)?;
    Ok(HttpResponse::Ok().json(battle_model.get_combatants()))
}

#[get("/combatants")]
pub async fn get_combatants(battle_model: web::Data<Mutex<BattleModel>>) -> HttpResponse {
    let battle_model = lock_model(&battle_model);
    HttpResponse::Ok().json(battle_model.get_combatants())
}

#[delete("/combatants")]
pub async fn clear_combatants(battle_model: web::Data<Mutex<BattleModel>>) -> HttpResponse {
    lock_model(&battle_model).clear_combatants();
    HttpResponse::NoContent().finish()
}

#[post("/battles")]
pub async fn battle(
    db: web::Data<Database>,
    battle_model: web::Data<Mutex<BattleModel>>,
    random: web::Data<dyn RandomSource>,
) -> MealResult<HttpResponse> {
    if lock_model(&battle_model).get_combatants().len() < MAX_COMBATANTS {
        return MealError::validation("Two combatants must be prepped for a battle.");
    }

    // The lock is released while waiting on the random source.
    let random_number = random.get_random().await?;
    let winner = lock_model(&battle_model).battle(&db, random_number)?;
    info!("Battle completed, winner: {}", winner);
    Ok(HttpResponse::Ok().json(BattleResponse { winner }))
}
