use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::submissions::{grade_and_store, SubmissionContext};
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::submission::{SubmissionResponse, SubmitAnswersRequest};
use crate::services::submissions::CatalogEntry;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/:section_id/submissions", post(submit_section))
}

async fn submit_section(
    State(state): State<AppState>,
    Path(section_id): Path<String>,
    Json(payload): Json<SubmitAnswersRequest>,
) -> Result<(StatusCode, Json<SubmissionResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let section = repositories::catalog::find_section_by_id(state.db(), &section_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load section"))?
        .ok_or_else(|| ApiError::NotFound("Section not found".to_string()))?;

    let set = repositories::catalog::find_set_by_id(state.db(), &section.set_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load practice set"))?
        .ok_or_else(|| ApiError::NotFound("Practice set not found".to_string()))?;

    let items = repositories::catalog::list_items_by_section(state.db(), &section.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load section items"))?;

    let catalog: HashMap<String, CatalogEntry<'_>> = items
        .iter()
        .map(|item| {
            (
                item.id.clone(),
                CatalogEntry { payload: &item.payload.0, skill: section.skill },
            )
        })
        .collect();

    let context = SubmissionContext {
        set: &set,
        section_id: Some(section.id.clone()),
        skill: section.skill,
        per_type: true,
    };

    let response = grade_and_store(&state, payload, &catalog, context).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
