use std::io::Write;

use actix_multipart::Multipart;
use actix_web::{delete, get, post, web, Error, HttpResponse};
use futures::TryStreamExt;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::errors::MealResult;
use crate::models::meal::{Meal, SortBy};
use crate::repository::database::Database;
use crate::repository::meal_repository;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateMealRequest {
    pub meal: String,
    pub cuisine: String,
    pub price: f64,
    pub difficulty: String,
}

#[derive(Deserialize, Debug)]
pub struct LeaderboardQuery {
    pub sort: Option<String>,
}

#[post("/meals")]
pub async fn create_meal(
    db: web::Data<Database>,
    new_meal: web::Json<CreateMealRequest>,
) -> MealResult<HttpResponse> {
    let request = new_meal.into_inner();
    info!(
        "Adding meal: {}, {}, {}, {}",
        request.meal, request.cuisine, request.price, request.difficulty
    );
    let meal = meal_repository::create_meal(
        &db,
        &request.meal,
        &request.cuisine,
        request.price,
        &request.difficulty,
    )?;
    Ok(HttpResponse::Created().json(meal))
}

#[delete("/meals")]
pub async fn clear_meals(db: web::Data<Database>) -> MealResult<HttpResponse> {
    meal_repository::clear_meals(&db)?;
    Ok(HttpResponse::NoContent().finish())
}

#[get("/meals/{id}")]
pub async fn get_meal_by_id(
    db: web::Data<Database>,
    id: web::Path<i32>,
) -> MealResult<HttpResponse> {
    let meal = meal_repository::get_meal_by_id(&db, id.into_inner())?;
    Ok(HttpResponse::Ok().json(meal))
}

#[get("/meals/by-name/{name}")]
pub async fn get_meal_by_name(
    db: web::Data<Database>,
    name: web::Path<String>,
) -> MealResult<HttpResponse> {
    let meal = meal_repository::get_meal_by_name(&db, &name)?;
    Ok(HttpResponse::Ok().json(meal))
}

#[delete("/meals/{id}")]
pub async fn delete_meal(db: web::Data<Database>, id: web::Path<i32>) -> MealResult<HttpResponse> {
    meal_repository::delete_meal(&db, id.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}

#[get("/leaderboard")]
pub async fn get_leaderboard(
    db: web::Data<Database>,
    query: web::Query<LeaderboardQuery>,
) -> MealResult<HttpResponse> {
    let sort_by = match &query.sort {
        Some(sort) => sort.parse::<SortBy>()?,
        None => SortBy::default(),
    };
    let leaderboard = meal_repository::get_leaderboard(&db, sort_by)?;
    Ok(HttpResponse::Ok().json(leaderboard))
}

#[post("/meals/import_csv")]
pub async fn import_csv(
    db: web::Data<Database>,
    mut payload: Multipart,
) -> Result<HttpResponse, Error> {
    let mut temp_file: Option<NamedTempFile> = None;

    while let Some(mut field) = payload.try_next().await? {
        if field.content_disposition().get_filename().is_none() {
            return Ok(HttpResponse::BadRequest().json("No file name provided"));
        }

        let mut file = NamedTempFile::new()?;
        while let Some(chunk) = field.try_next().await? {
            file.write_all(&chunk)?;
        }
        temp_file = Some(file);
    }

    let Some(temp_file) = temp_file else {
        return Ok(HttpResponse::BadRequest().json("No file uploaded"));
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(temp_file.path())
        .map_err(actix_web::error::ErrorBadRequest)?;

    let mut new_meals: Vec<CreateMealRequest> = Vec::new();
    for result in reader.deserialize::<CreateMealRequest>() {
        match result {
            Ok(record) => new_meals.push(record),
            Err(e) => {
                warn!("Rejected meal CSV row: {}", e);
                return Ok(HttpResponse::BadRequest().json("Incomplete data, check your file."));
            }
        }
    }

    if new_meals.is_empty() {
        return Ok(HttpResponse::BadRequest().json("No valid meals found in the CSV file"));
    }

    let (created, errors): (Vec<Meal>, Vec<String>) = new_meals.iter().fold(
        (Vec::new(), Vec::new()),
        |(mut created, mut errors), record| {
            match meal_repository::create_meal(
                &db,
                &record.meal,
                &record.cuisine,
                record.price,
                &record.difficulty,
            ) {
                Ok(meal) => created.push(meal),
                Err(err) => errors.push(err.to_string()),
            }
            (created, errors)
        },
    );
    info!("Imported {} meals from CSV, {} rejected", created.len(), errors.len());

    if created.is_empty() {
        return Ok(HttpResponse::BadRequest().json(errors));
    }
    Ok(HttpResponse::Ok().json(created))
}
