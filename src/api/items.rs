use crate::error::{Result, ServiceError};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use inventory_types::Item;

pub async fn list_items(State(state): State<AppState>) -> Result<Json<Vec<Item>>> {
    Ok(Json(state.repository.find_all().await?))
}

pub async fn get_item(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Item>> {
    state
        .repository
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or(ServiceError::ItemNotFound(id))
}

pub async fn create_item(
    State(state): State<AppState>,
    Json(item): Json<Item>,
) -> Result<Json<Item>> {
    validate(&item)?;
    let saved = state.repository.save(item).await?;
    tracing::info!("Created item {:?} ('{}')", saved.id, saved.name);
    Ok(Json(saved))
}

/// Replaces an existing item. The id in the path wins over any id in the body.
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(item): Json<Item>,
) -> Result<Json<Item>> {
    validate(&item)?;
    if state.repository.find_by_id(id).await?.is_none() {
        return Err(ServiceError::ItemNotFound(id));
    }

    let saved = state.repository.save(item.with_id(id)).await?;
    tracing::info!("Updated item {} ('{}')", id, saved.name);
    Ok(Json(saved))
}

pub async fn delete_item(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode> {
    if !state.repository.delete_by_id(id).await? {
        return Err(ServiceError::ItemNotFound(id));
    }
    tracing::info!("Deleted item {}", id);
    Ok(StatusCode::NO_CONTENT)
}

fn validate(item: &Item) -> Result<()> {
    if item.name.trim().is_empty() {
        return Err(ServiceError::InvalidRequest(
            "item name must not be empty".to_string(),
        ));
    }
    if !item.price.is_finite() {
        return Err(ServiceError::InvalidRequest(
            "item price must be a finite number".to_string(),
        ));
    }
    Ok(())
}
