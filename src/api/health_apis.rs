use actix_web::{get, web, HttpResponse};
use serde_json::json;

use crate::errors::MealResult;
use crate::repository::database::Database;

#[get("/health")]
pub async fn healthcheck() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "healthy" }))
}

#[get("/db-check")]
pub async fn db_check(db: web::Data<Database>) -> MealResult<HttpResponse> {
    db.check_health()?;
    Ok(HttpResponse::Ok().json(json!({ "database_status": "healthy" })))
}
