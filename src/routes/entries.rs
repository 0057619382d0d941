//! Entry API routes

use crate::error::ApiError;
use crate::repositories::{Entry, EntryPayload, IngredientPayload};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Serialize;

/// Create entry routes
pub fn entry_routes() -> Router<AppState> {
    Router::new()
        .route("/entry/create", post(create_entry))
        .route("/entries", get(list_entries))
        .route("/entry/:id", get(get_entry))
        .route("/ingredient/:ingredient", get(get_entries_by_ingredient))
        .route("/entry/update/:id", put(update_entry))
        .route("/ingredient/update/:id", put(update_ingredient))
        .route("/entry/delete/:id", delete(delete_entry))
}

/// Entry as serialized to clients, with the id as a hex string
#[derive(Serialize)]
pub struct EntryResponse {
    pub id: String,
    pub dish: Option<String>,
    pub carbohydrates: Option<f64>,
    pub protein: Option<f64>,
    pub fat: Option<f64>,
    pub ingredients: Option<String>,
    pub calories: Option<String>,
}

impl From<Entry> for EntryResponse {
    fn from(entry: Entry) -> Self {
        Self {
            id: entry.id.to_hex(),
            dish: entry.dish,
            carbohydrates: entry.carbohydrates,
            protein: entry.protein,
            fat: entry.fat,
            ingredients: entry.ingredients,
            calories: entry.calories,
        }
    }
}

/// Response for a successful create
#[derive(Serialize)]
pub struct CreateEntryResponse {
    pub id: String,
}

/// Response for update operations
#[derive(Serialize)]
pub struct UpdateEntryResponse {
    pub modified_count: u64,
}

/// Response for delete operations
#[derive(Serialize)]
pub struct DeleteEntryResponse {
    pub deleted_count: u64,
}

/// POST /entry/create - Log a new meal entry
async fn create_entry(
    State(state): State<AppState>,
    payload: Result<Json<EntryPayload>, JsonRejection>,
) -> Result<Json<CreateEntryResponse>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let id = state.entries().create(payload).await?;

    Ok(Json(CreateEntryResponse { id: id.to_hex() }))
}

/// GET /entries - List every stored entry
async fn list_entries(
    State(state): State<AppState>,
) -> Result<Json<Vec<EntryResponse>>, ApiError> {
    let entries = state.entries().list().await?;

    Ok(Json(entries.into_iter().map(EntryResponse::from).collect()))
}

/// GET /entry/:id - Fetch a single entry
async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EntryResponse>, ApiError> {
    let entry = state.entries().find_by_id(&id).await?;

    Ok(Json(entry.into()))
}

/// GET /ingredient/:ingredient - Fetch entries matching an ingredient string
async fn get_entries_by_ingredient(
    State(state): State<AppState>,
    Path(ingredient): Path<String>,
) -> Result<Json<Vec<EntryResponse>>, ApiError> {
    let entries = state.entries().find_by_ingredient(&ingredient).await?;

    Ok(Json(entries.into_iter().map(EntryResponse::from).collect()))
}

/// PUT /entry/update/:id - Overwrite the fields present in the payload
async fn update_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<EntryPayload>, JsonRejection>,
) -> Result<Json<UpdateEntryResponse>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let modified_count = state.entries().update(&id, payload).await?;

    Ok(Json(UpdateEntryResponse { modified_count }))
}

/// PUT /ingredient/update/:id - Overwrite only the ingredients field
async fn update_ingredient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<IngredientPayload>, JsonRejection>,
) -> Result<Json<UpdateEntryResponse>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let modified_count = state.entries().update_ingredient(&id, payload).await?;

    Ok(Json(UpdateEntryResponse { modified_count }))
}

/// DELETE /entry/delete/:id - Remove an entry
async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteEntryResponse>, ApiError> {
    let deleted_count = state.entries().delete(&id).await?;

    Ok(Json(DeleteEntryResponse { deleted_count }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    #[test]
    fn test_entry_response_uses_hex_id() {
        let id = ObjectId::new();
        let entry = Entry {
            id,
            dish: Some("toast".to_string()),
            carbohydrates: None,
            protein: None,
            fat: Some(2.0),
            ingredients: None,
            calories: Some("180".to_string()),
        };

        let response = EntryResponse::from(entry);
        assert_eq!(response.id, id.to_hex());
        assert_eq!(response.dish.as_deref(), Some("toast"));
        assert_eq!(response.fat, Some(2.0));
    }
}
