use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use crate::errors::AppResult;
use crate::models::{CheaterFilter, CheaterRecord, CreateCheaterRequest};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct CheaterListResponse {
    pub count: usize,
    pub results: Vec<CheaterRecord>,
}

#[derive(Debug, Serialize)]
pub struct InsertResponse {
    pub inserted_id: String,
}

pub async fn list_cheaters(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<CheaterFilter>,
) -> AppResult<Json<CheaterListResponse>> {
    let store = state.store()?;

    let cheaters = store.find_cheaters(filter.to_document()).await?;
    let results: Vec<CheaterRecord> = cheaters.into_iter().map(CheaterRecord::from).collect();

    Ok(Json(CheaterListResponse {
        count: results.len(),
        results,
    }))
}

pub async fn create_cheater(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateCheaterRequest>,
) -> AppResult<Json<InsertResponse>> {
    // Validation rejects the payload before any store interaction.
    let cheater = body.validate()?;
    let store = state.store()?;

    let inserted_id = store.insert_cheater(&cheater).await?;
    tracing::info!(
        subject_id = %cheater.subject_id,
        inserted_id = %inserted_id,
        "cheater record created"
    );

    Ok(Json(InsertResponse { inserted_id }))
}
