use std::sync::{Arc, Mutex};

use actix_web::{middleware::Logger, web, App, HttpServer};
use log::info;

mod api;
mod errors;
mod models;
mod repository;
mod settings;
mod utils;

use errors::MealResult;
use models::battle::BattleModel;
use repository::database::Database;
use settings::Settings;
use utils::random_utils::{RandomOrgClient, RandomSource};

#[actix_web::main]
async fn main() -> MealResult<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;
    utils::logger::init_logger(settings.log_level)?;

    let db = web::Data::new(Database::new(&settings.database_url)?);
    let battle_model = web::Data::new(Mutex::new(BattleModel::new()));
    let random_source: Arc<dyn RandomSource> =
        Arc::new(RandomOrgClient::new(settings.random_org_url.clone()));
    let random_source = web::Data::from(random_source);

    info!("Starting meal-max on {}:{}", settings.bind_address, settings.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(db.clone())
            .app_data(battle_model.clone())
            .app_data(random_source.clone())
            .configure(api::config::config)
    })
    .bind((settings.bind_address.as_str(), settings.port))?
    .run()
    .await?;
    Ok(())
}
