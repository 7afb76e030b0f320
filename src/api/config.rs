use actix_web::web;

use super::battle_apis::{battle, clear_combatants, get_combatants, prep_combatant};
use super::health_apis::{db_check, healthcheck};
use super::meal_apis::{
    clear_meals, create_meal, delete_meal, get_leaderboard, get_meal_by_id, get_meal_by_name,
    import_csv,
};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(healthcheck)
            .service(db_check)
            .service(import_csv)
            .service(create_meal)
            .service(clear_meals)
            .service(get_meal_by_name)
            .service(get_meal_by_id)
            .service(delete_meal)
            .service(get_leaderboard)
            .service(prep_combatant)
            .service(get_combatants)
            .service(clear_combatants)
            .service(battle),
    );
}
