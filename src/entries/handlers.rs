use anyhow::Context;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::dto::{CreateFoodEntryRequest, DailySummaryQuery, DateRangeQuery, UpdateFoodEntryRequest};
use super::repo_types::{DailySummary, FoodEntry};
use super::services;
use crate::{error::EntryError, state::AppState};

pub fn entry_routes() -> Router<AppState> {
    Router::new()
        .route("/food-entries", get(list_food_entries).post(create_food_entry))
        .route("/food-entries/range", get(list_food_entries_by_date_range))
        .route(
            "/food-entries/:id",
            get(get_food_entry)
                .patch(update_food_entry)
                .delete(delete_food_entry),
        )
}

pub fn summary_routes() -> Router<AppState> {
    Router::new().route("/summary/daily", get(get_daily_summary))
}

/// POST /food-entries { name, calories, consumed_at }
#[instrument(skip(state, payload))]
pub async fn create_food_entry(
    State(state): State<AppState>,
    Json(payload): Json<CreateFoodEntryRequest>,
) -> Result<(StatusCode, HeaderMap, Json<FoodEntry>), EntryError> {
    let entry = payload.validate()?;
    let created = services::create_food_entry(state.entries.as_ref(), entry).await?;

    let location = HeaderValue::try_from(format!("/api/v1/food-entries/{}", created.id))
        .context("build Location header")?;
    let mut headers = HeaderMap::new();
    headers.insert(header::LOCATION, location);
    Ok((StatusCode::CREATED, headers, Json(created)))
}

#[instrument(skip(state))]
pub async fn list_food_entries(
    State(state): State<AppState>,
) -> Result<Json<Vec<FoodEntry>>, EntryError> {
    let entries = services::get_food_entries(state.entries.as_ref()).await?;
    Ok(Json(entries))
}

/// GET /food-entries/range?start_date=...&end_date=...
#[instrument(skip(state))]
pub async fn list_food_entries_by_date_range(
    State(state): State<AppState>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<Vec<FoodEntry>>, EntryError> {
    let entries = services::get_food_entries_by_date_range(
        state.entries.as_ref(),
        range.start_date,
        range.end_date,
    )
    .await?;
    Ok(Json(entries))
}

#[instrument(skip(state))]
pub async fn get_food_entry(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<FoodEntry>, EntryError> {
    let entry = services::get_food_entry(state.entries.as_ref(), id).await?;
    Ok(Json(entry))
}

/// PATCH /food-entries/:id { name?, calories?, consumed_at? }
#[instrument(skip(state, payload))]
pub async fn update_food_entry(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateFoodEntryRequest>,
) -> Result<Json<FoodEntry>, EntryError> {
    let changes = payload.validate()?;
    let entry = services::update_food_entry(state.entries.as_ref(), id, changes).await?;
    Ok(Json(entry))
}

#[instrument(skip(state))]
pub async fn delete_food_entry(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<FoodEntry>, EntryError> {
    let entry = services::delete_food_entry(state.entries.as_ref(), id).await?;
    Ok(Json(entry))
}

/// GET /summary/daily?date=YYYY-MM-DD
#[instrument(skip(state))]
pub async fn get_daily_summary(
    State(state): State<AppState>,
    Query(query): Query<DailySummaryQuery>,
) -> Result<Json<DailySummary>, EntryError> {
    let date = query.validate()?;
    let summary = services::get_daily_summary(state.entries.as_ref(), date).await?;
    Ok(Json(summary))
}
