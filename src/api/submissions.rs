use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::pagination::PaginatedResponse;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::{PracticeSet, PracticeSubmission};
use crate::db::types::Skill;
use crate::repositories;
use crate::repositories::submissions::SubmissionFilter;
use crate::schemas::submission::{
    ProgressEntryResponse, SubmissionResponse, SubmissionSummaryResponse, SubmitAnswersRequest,
    TeacherGradeRequest,
};
use crate::services::submissions::{grade_submission, resolve_identity, CatalogEntry, SubmittedAnswer};
use sqlx::types::Json as SqlxJson;

#[derive(Debug, Deserialize)]
pub(crate) struct ListSubmissionsQuery {
    #[serde(default)]
    skip: i64,
    #[serde(default = "crate::api::pagination::default_limit")]
    limit: i64,
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    set_id: Option<String>,
    #[serde(default)]
    section_id: Option<String>,
    #[serde(default)]
    skill: Option<Skill>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LatestSubmissionQuery {
    user_id: String,
    section_id: String,
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_submissions))
        .route("/latest", get(get_latest_submission))
        .route("/progress/:user_id", get(get_progress))
        .route("/:submission_id", get(get_submission).delete(delete_submission))
        .route("/:submission_id/teacher-grade", axum::routing::post(teacher_grade))
}

/// Shared tail of both submit flows: resolve identity, grade against the
/// catalog snapshot, persist the immutable attempt record.
pub(crate) struct SubmissionContext<'a> {
    pub(crate) set: &'a PracticeSet,
    pub(crate) section_id: Option<String>,
    pub(crate) skill: Skill,
    pub(crate) per_type: bool,
}

pub(crate) async fn grade_and_store(
    state: &AppState,
    request: SubmitAnswersRequest,
    catalog: &HashMap<String, CatalogEntry<'_>>,
    context: SubmissionContext<'_>,
) -> Result<SubmissionResponse, ApiError> {
    let (user_id, is_anonymous) = resolve_identity(request.user_id.as_deref());

    let answers: Vec<SubmittedAnswer> = request
        .answers
        .into_iter()
        .map(|answer| SubmittedAnswer {
            item_id: answer.item_id,
            payload: answer.payload,
            time_spent_ms: answer.time_spent_ms.unwrap_or(0),
        })
        .collect();

    let outcome =
        grade_submission(catalog, answers, context.skill, state.grading(), context.per_type);

    let submission = PracticeSubmission {
        id: Uuid::new_v4().to_string(),
        user_id,
        is_anonymous,
        exam_type: context.set.exam_type.clone(),
        skill: context.skill,
        set_id: context.set.id.clone(),
        section_id: context.section_id,
        duration_sec: request.duration_sec.unwrap_or(0).max(0),
        answers: SqlxJson(outcome.answers),
        score: outcome.score,
        total: outcome.total,
        analytics: SqlxJson(outcome.analytics),
        teacher_score: None,
        teacher_feedback: None,
        graded_by: None,
        graded_at: None,
        created_at: primitive_now_utc(),
    };

    repositories::submissions::create(state.db(), &submission)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to persist submission"))?;

    tracing::info!(
        submission_id = %submission.id,
        user_id = %submission.user_id,
        is_anonymous = submission.is_anonymous,
        skill = %submission.skill.as_str(),
        score = submission.score,
        total = submission.total,
        "practice submission graded"
    );

    Ok(SubmissionResponse::from_model(submission))
}

async fn list_submissions(
    State(state): State<AppState>,
    Query(params): Query<ListSubmissionsQuery>,
) -> Result<Json<PaginatedResponse<SubmissionSummaryResponse>>, ApiError> {
    let skip = params.skip.max(0);
    let limit = params.limit.clamp(1, 1000);

    let filter = SubmissionFilter {
        user_id: params.user_id.as_deref(),
        set_id: params.set_id.as_deref(),
        section_id: params.section_id.as_deref(),
        skill: params.skill,
    };

    let total_count = repositories::submissions::count(state.db(), &filter)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count submissions"))?;
    let submissions = repositories::submissions::list(state.db(), &filter, skip, limit)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list submissions"))?;

    let items =
        submissions.into_iter().map(SubmissionSummaryResponse::from_model).collect::<Vec<_>>();

    Ok(Json(PaginatedResponse { items, total_count, skip, limit }))
}

async fn get_latest_submission(
    State(state): State<AppState>,
    Query(params): Query<LatestSubmissionQuery>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    let submission = repositories::submissions::latest_for_user_section(
        state.db(),
        &params.user_id,
        &params.section_id,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to load latest submission"))?
    .ok_or_else(|| ApiError::NotFound("No submission for this user and section".to_string()))?;

    Ok(Json(SubmissionResponse::from_model(submission)))
}

async fn get_progress(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<ProgressEntryResponse>>, ApiError> {
    let rows = repositories::submissions::best_per_set(state.db(), &user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load progress"))?;

    Ok(Json(rows.into_iter().map(ProgressEntryResponse::from_row).collect()))
}

async fn get_submission(
    State(state): State<AppState>,
    Path(submission_id): Path<String>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    let submission = repositories::submissions::find_by_id(state.db(), &submission_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load submission"))?
        .ok_or_else(|| ApiError::NotFound("Submission not found".to_string()))?;

    Ok(Json(SubmissionResponse::from_model(submission)))
}

async fn delete_submission(
    State(state): State<AppState>,
    Path(submission_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let deleted = repositories::submissions::delete_by_id(state.db(), &submission_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete submission"))?;

    if deleted == 0 {
        return Err(ApiError::NotFound("Submission not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

async fn teacher_grade(
    State(state): State<AppState>,
    Path(submission_id): Path<String>,
    Json(payload): Json<TeacherGradeRequest>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let now = primitive_now_utc();
    let submission = repositories::submissions::apply_teacher_grade(
        state.db(),
        &submission_id,
        payload.teacher_score,
        &payload.teacher_feedback,
        &payload.graded_by,
        now,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to grade submission"))?
    .ok_or_else(|| ApiError::NotFound("Submission not found".to_string()))?;

    tracing::info!(
        submission_id = %submission.id,
        graded_by = %payload.graded_by,
        "teacher grade recorded"
    );

    Ok(Json(SubmissionResponse::from_model(submission)))
}
