use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::pagination::PaginatedResponse;
use crate::api::submissions::{grade_and_store, SubmissionContext};
use crate::core::state::AppState;
use crate::db::types::{SetStatus, Skill};
use crate::repositories;
use crate::schemas::practice::{SectionResponse, SetDetailResponse, SetSummaryResponse};
use crate::schemas::submission::{
    SubmissionResponse, SubmissionSummaryResponse, SubmitAnswersRequest,
};
use crate::services::submissions::CatalogEntry;

#[derive(Debug, Deserialize)]
pub(crate) struct ListSetsQuery {
    #[serde(default)]
    skip: i64,
    #[serde(default = "crate::api::pagination::default_limit")]
    limit: i64,
    #[serde(default)]
    exam_type: Option<String>,
    #[serde(default)]
    status: Option<SetStatus>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LeaderboardQuery {
    #[serde(default = "default_leaderboard_limit")]
    limit: i64,
}

const fn default_leaderboard_limit() -> i64 {
    20
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sets))
        .route("/:set_id", get(get_set))
        .route("/:set_id/leaderboard", get(get_leaderboard))
        .route("/:set_id/submissions", post(submit_set))
}

async fn list_sets(
    State(state): State<AppState>,
    Query(params): Query<ListSetsQuery>,
) -> Result<Json<PaginatedResponse<SetSummaryResponse>>, ApiError> {
    let skip = params.skip.max(0);
    let limit = params.limit.clamp(1, 1000);

    let total_count =
        repositories::catalog::count_sets(state.db(), params.exam_type.as_deref(), params.status)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to count practice sets"))?;
    let sets = repositories::catalog::list_sets(
        state.db(),
        params.exam_type.as_deref(),
        params.status,
        skip,
        limit,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to list practice sets"))?;

    let items = sets.into_iter().map(SetSummaryResponse::from_model).collect::<Vec<_>>();

    Ok(Json(PaginatedResponse { items, total_count, skip, limit }))
}

async fn get_set(
    State(state): State<AppState>,
    Path(set_id): Path<String>,
) -> Result<Json<SetDetailResponse>, ApiError> {
    let set = repositories::catalog::find_set_by_id(state.db(), &set_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load practice set"))?
        .ok_or_else(|| ApiError::NotFound("Practice set not found".to_string()))?;

    let sections = repositories::catalog::list_sections_by_set(state.db(), &set.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load sections"))?;

    let section_ids: Vec<String> = sections.iter().map(|section| section.id.clone()).collect();
    let items = repositories::catalog::list_items_by_sections(state.db(), &section_ids)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load items"))?;

    let mut items_by_section: HashMap<String, Vec<_>> = HashMap::new();
    for item in items {
        items_by_section.entry(item.section_id.clone()).or_default().push(item);
    }

    let sections = sections
        .into_iter()
        .map(|section| {
            let items = items_by_section.remove(&section.id).unwrap_or_default();
            SectionResponse::from_model(section, items)
        })
        .collect();

    Ok(Json(SetDetailResponse {
        id: set.id,
        exam_type: set.exam_type,
        title: set.title,
        description: set.description,
        status: set.status,
        sections,
        created_at: crate::core::time::format_primitive(set.created_at),
    }))
}

async fn get_leaderboard(
    State(state): State<AppState>,
    Path(set_id): Path<String>,
    Query(params): Query<LeaderboardQuery>,
) -> Result<Json<Vec<SubmissionSummaryResponse>>, ApiError> {
    let limit = params.limit.clamp(1, 100);

    // 404 for unknown sets instead of a silently empty board.
    repositories::catalog::find_set_by_id(state.db(), &set_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load practice set"))?
        .ok_or_else(|| ApiError::NotFound("Practice set not found".to_string()))?;

    let submissions = repositories::submissions::leaderboard(state.db(), &set_id, limit)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load leaderboard"))?;

    Ok(Json(submissions.into_iter().map(SubmissionSummaryResponse::from_model).collect()))
}

async fn submit_set(
    State(state): State<AppState>,
    Path(set_id): Path<String>,
    Json(payload): Json<SubmitAnswersRequest>,
) -> Result<(StatusCode, Json<SubmissionResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let set = repositories::catalog::find_set_by_id(state.db(), &set_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load practice set"))?
        .ok_or_else(|| ApiError::NotFound("Practice set not found".to_string()))?;

    let sections = repositories::catalog::list_sections_by_set(state.db(), &set.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load sections"))?;

    let section_ids: Vec<String> = sections.iter().map(|section| section.id.clone()).collect();
    let items = repositories::catalog::list_items_by_sections(state.db(), &section_ids)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load items"))?;

    let skill_by_section: HashMap<&str, Skill> =
        sections.iter().map(|section| (section.id.as_str(), section.skill)).collect();

    let catalog: HashMap<String, CatalogEntry<'_>> = items
        .iter()
        .filter_map(|item| {
            skill_by_section.get(item.section_id.as_str()).map(|skill| {
                (item.id.clone(), CatalogEntry { payload: &item.payload.0, skill: *skill })
            })
        })
        .collect();

    let context = SubmissionContext {
        set: &set,
        section_id: None,
        skill: Skill::Mixed,
        per_type: false,
    };

    let response = grade_and_store(&state, payload, &catalog, context).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
